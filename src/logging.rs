use log::{info, LevelFilter};

/// Environment variable that selects the log level
pub const LOG_LEVEL_ENV: &str = "SPF_PLAYER_LOG_LEVEL";

/// Map a level name to a filter; unknown names fall back to `Info`
pub fn parse_level(level: &str) -> LevelFilter {
    match level.trim().to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" | "warning" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

/// Initialize logging, reading the level from `SPF_PLAYER_LOG_LEVEL`
pub fn init(default_level: &str) -> Result<(), log::SetLoggerError> {
    let log_level = std::env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| default_level.to_string());

    let mut builder = env_logger::Builder::new();
    builder.format(|buf, record| {
        use std::io::Write;
        writeln!(
            buf,
            "{} [{}] [{}:{}] {}",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.file().unwrap_or("unknown"),
            record.line().unwrap_or(0),
            record.args()
        )
    });
    builder.filter_level(parse_level(&log_level));
    builder.try_init()?;

    info!("Logging initialized with level: {}", log_level);
    Ok(())
}
