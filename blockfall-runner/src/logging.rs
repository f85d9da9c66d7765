//! Log output on stderr, so that stdout only carries rendered frames.

use anyhow::Context;
use log::LevelFilter;

pub fn init(level: LevelFilter) -> anyhow::Result<()> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}: {}",
                time::now().rfc3339(),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
        .context("failed to install logger")
}
