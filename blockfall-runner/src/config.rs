//! Command line configuration.

use anyhow::{bail, Context};
use blockfall_core::Rules;
use clap::{App, Arg, ArgMatches};
use log::LevelFilter;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererKind {
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub seed: u32,
    pub tick: Duration,
    pub random_tick: Duration,
    pub rules: Rules,
    pub renderer: RendererKind,
    pub log_level: LevelFilter,
}

pub fn app() -> App<'static, 'static> {
    App::new("blockfall")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Falling-block puzzle game, played one command per line on stdin")
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .takes_value(true)
                .help("Seed for the piece sequence (random if not set)"),
        )
        .arg(
            Arg::with_name("tick-ms")
                .long("tick-ms")
                .takes_value(true)
                .default_value("500")
                .help("Gravity interval in milliseconds"),
        )
        .arg(
            Arg::with_name("random-tick-ms")
                .long("random-tick-ms")
                .takes_value(true)
                .default_value("10")
                .help("Interval at which the piece sequence advances, in milliseconds"),
        )
        .arg(
            Arg::with_name("rules")
                .long("rules")
                .takes_value(true)
                .value_name("FILE")
                .help("JSON file overriding the default rules"),
        )
        .arg(
            Arg::with_name("renderer")
                .long("renderer")
                .takes_value(true)
                .possible_values(&["text", "json"])
                .default_value("text"),
        )
        .arg(
            Arg::with_name("log-level")
                .long("log-level")
                .takes_value(true)
                .possible_values(&["off", "error", "warn", "info", "debug", "trace"])
                .default_value("info"),
        )
        .arg(
            Arg::with_name("keep-running")
                .long("keep-running")
                .help("Keep the game running after game over"),
        )
}

fn millis(matches: &ArgMatches, name: &str) -> anyhow::Result<Duration> {
    let ms = value_t!(matches, name, u64)?;
    if ms == 0 {
        bail!("--{} must be greater than zero", name);
    }
    Ok(Duration::from_millis(ms))
}

/// Reads rules from a JSON file. Missing fields keep their defaults.
pub fn load_rules(path: &Path) -> anyhow::Result<Rules> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let rules: Rules = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(rules)
}

impl Config {
    pub fn from_matches(matches: &ArgMatches) -> anyhow::Result<Config> {
        let seed = match matches.value_of("seed") {
            Some(_) => value_t!(matches, "seed", u32)?,
            None => rand::random(),
        };

        let mut rules = match matches.value_of("rules") {
            Some(path) => load_rules(Path::new(path))?,
            None => Rules::default(),
        };
        if matches.is_present("keep-running") {
            rules.halt_on_game_over = false;
        }
        rules.validate().context("invalid rules")?;

        let renderer = match matches.value_of("renderer") {
            Some("json") => RendererKind::Json,
            _ => RendererKind::Text,
        };

        Ok(Config {
            seed,
            tick: millis(matches, "tick-ms")?,
            random_tick: millis(matches, "random-tick-ms")?,
            rules,
            renderer,
            log_level: value_t!(matches, "log-level", LevelFilter)?,
        })
    }
}

#[cfg(test)]
fn parse(args: &[&str]) -> anyhow::Result<Config> {
    let mut argv = vec!["blockfall"];
    argv.extend_from_slice(args);
    let matches = app().get_matches_from_safe(argv)?;
    Config::from_matches(&matches)
}

#[test]
fn defaults() {
    let config = parse(&["--seed", "42"]).unwrap();
    assert_eq!(config.seed, 42);
    assert_eq!(config.tick, Duration::from_millis(500));
    assert_eq!(config.random_tick, Duration::from_millis(10));
    assert_eq!(config.rules, Rules::default());
    assert_eq!(config.renderer, RendererKind::Text);
    assert_eq!(config.log_level, LevelFilter::Info);
}

#[test]
fn flags_override_defaults() {
    let config = parse(&[
        "--seed",
        "1",
        "--tick-ms",
        "100",
        "--renderer",
        "json",
        "--log-level",
        "debug",
        "--keep-running",
    ])
    .unwrap();
    assert_eq!(config.tick, Duration::from_millis(100));
    assert_eq!(config.renderer, RendererKind::Json);
    assert_eq!(config.log_level, LevelFilter::Debug);
    assert!(!config.rules.halt_on_game_over);
}

#[test]
fn rejects_bad_values() {
    assert!(parse(&["--tick-ms", "0"]).is_err());
    assert!(parse(&["--seed", "minus one"]).is_err());
    assert!(parse(&["--renderer", "svg"]).is_err());
}

#[test]
fn missing_rules_file_names_path() {
    let err = parse(&["--rules", "/nonexistent/rules.json"]).unwrap_err();
    assert!(format!("{:#}", err).contains("/nonexistent/rules.json"));
}

#[test]
fn partial_rules_file() {
    let path = std::env::temp_dir().join(format!("blockfall-rules-{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "bedrock_cadence": 3, "clear_row_score": 250 }"#).unwrap();
    let rules = load_rules(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(rules.bedrock_cadence, 3);
    assert_eq!(rules.clear_row_score, 250);
    assert_eq!(rules.max_level, Rules::default().max_level);
}
