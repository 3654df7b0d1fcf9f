//! Example service resolving layered configuration at startup.
//!
//! Defaults ship as an embedded JSON document; operators override them with
//! `APP_`-prefixed environment variables or `--config:` arguments, for
//! example:
//!
//! ```text
//! APP_SERVER_PORT=9090 service_config --config:server.host=0.0.0.0
//! ```

use std::io::{self, Write};

use serde::Deserialize;
use strata_config::{
    CommandLineSource, ConfigManager, EnvSource, JsonSource, StrataResult, partition_args,
};

const DEFAULTS: &[u8] = br#"{
    "server": {"host": "localhost", "port": 8080},
    "log_level": "info"
}"#;

#[derive(Debug, Deserialize)]
struct ServerConfig {
    host: String,
    port: u16,
}

#[derive(Debug, Deserialize)]
struct AppConfig {
    server: ServerConfig,
    log_level: String,
    tags: Vec<String>,
}

static CONFIG: ConfigManager<AppConfig> = ConfigManager::new();

fn bootstrap(config_args: Vec<String>) -> StrataResult<&'static AppConfig> {
    let defaults = JsonSource::new(DEFAULTS.to_vec());
    let env = EnvSource::from_env().with_prefix("APP");
    let cli = CommandLineSource::with_args(config_args);
    CONFIG.bootstrap(&[&defaults, &env, &cli])?;
    CONFIG.global()
}

fn report(config: &AppConfig, remaining: &[String]) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "listening on {}:{}", config.server.host, config.server.port)?;
    writeln!(stdout, "log level: {}", config.log_level)?;
    if !config.tags.is_empty() {
        writeln!(stdout, "tags: {}", config.tags.join(", "))?;
    }
    if !remaining.is_empty() {
        writeln!(stdout, "passing through: {}", remaining.join(" "))?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (config_args, remaining) = partition_args(std::env::args().skip(1), "--config:");
    let config = bootstrap(config_args)?;
    report(config, &remaining)?;
    Ok(())
}
