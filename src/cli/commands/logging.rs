use clap::{builder::ValueParser, Arg, ArgAction, Command};
use tracing::Level;

pub const ARG_VERBOSITY: &str = "verbosity";

/// Log levels by verbosity. `-v` counts and `VORTIX_LOG_LEVEL` names both
/// index into this table; index 0 keeps the subscriber default.
const LEVELS: [(&str, Level); 5] = [
    ("error", Level::ERROR),
    ("warn", Level::WARN),
    ("info", Level::INFO),
    ("debug", Level::DEBUG),
    ("trace", Level::TRACE),
];

fn parse_verbosity(value: &str) -> Result<u8, String> {
    let value = value.trim();
    let index = value.parse::<usize>().ok().or_else(|| {
        LEVELS
            .iter()
            .position(|(name, _)| name.eq_ignore_ascii_case(value))
    });

    index
        .filter(|index| *index < LEVELS.len())
        .and_then(|index| u8::try_from(index).ok())
        .ok_or_else(|| format!("invalid log level `{value}`, expected one of error|warn|info|debug|trace or 0-4"))
}

/// Tracing level for a verbosity count; repeats past `trace` stay at `trace`.
#[must_use]
pub fn level_for(verbosity: u8) -> Option<Level> {
    match usize::from(verbosity) {
        0 => None,
        index => Some(LEVELS[index.min(LEVELS.len() - 1)].1),
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
            .env("VORTIX_LOG_LEVEL")
            .global(true)
            .action(ArgAction::Count)
            .value_parser(ValueParser::new(parse_verbosity)),
    )
}
