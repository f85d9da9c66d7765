#[macro_use]
extern crate clap;
#[macro_use]
extern crate log;

use crate::config::{Config, RendererKind};
use crate::game::GameLoop;
use crate::render::{JsonRenderer, Renderer, TextRenderer};
use anyhow::Context;
use blockfall_core::{Event, State};
use futures::future;
use futures::prelude::*;
use std::io;

mod config;
mod game;
mod input;
mod logging;
mod protocol;
mod render;

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let matches = config::app().get_matches();
    let config = Config::from_matches(&matches)?;
    logging::init(config.log_level)?;

    info!("starting with seed {}", config.seed);
    debug!("rules: {:?}", config.rules);

    match config.renderer {
        RendererKind::Text => {
            let renderer = TextRenderer::new(io::stdout(), config.rules.playfield);
            play(&config, renderer)
        }
        RendererKind::Json => play(&config, JsonRenderer::new(io::stdout())),
    }
}

fn play<R>(config: &Config, renderer: R) -> anyhow::Result<()>
where
    R: Renderer + Send + 'static,
{
    let (tx, rx) = input::channel();
    input::spawn_stdin(tx.clone()).context("failed to start input thread")?;

    let (tick, random_tick) = (config.tick, config.random_tick);
    let game = GameLoop::new(State::new(config.rules, config.seed), rx, renderer);

    tokio::run(future::lazy(move || {
        tokio::spawn(input::ticks(tick, Event::GravityTick, tx.clone()));
        tokio::spawn(input::ticks(random_tick, Event::RandomTick, tx));
        game.map(|state| {
            info!(
                "finished with score {} at level {} (high score {})",
                state.score(),
                state.level(),
                state.high_score().max(state.score())
            );
        })
    }));
    Ok(())
}
