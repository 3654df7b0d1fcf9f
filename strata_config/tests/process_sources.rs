//! Sources backed by real process state: environment variables and files.

use std::io::Write;

use anyhow::{Result, ensure};
use serde::Deserialize;
use serial_test::serial;
use strata_config::{ConfigSource, EnvSource, JsonSource, Value, resolve};

#[derive(Debug, Deserialize, PartialEq)]
struct ProbeConfig {
    endpoint: String,
    interval: u32,
}

#[test]
#[serial]
fn env_source_reads_the_process_environment() -> Result<()> {
    let _lock = test_helpers::env::lock();
    let _endpoint = test_helpers::env::set_var("STRATA_IT_ENDPOINT", "https://example.test");
    let _interval = test_helpers::env::set_var("STRATA_IT_INTERVAL", "30");

    let source = EnvSource::from_env().with_prefix("STRATA_IT");
    let config: ProbeConfig = resolve(&[&source])?;
    ensure!(
        config
            == ProbeConfig {
                endpoint: "https://example.test".to_owned(),
                interval: 30,
            },
        "unexpected config: {config:?}",
    );
    Ok(())
}

#[test]
#[serial]
fn unprefixed_variables_are_dropped() -> Result<()> {
    let _lock = test_helpers::env::lock();
    let _inside = test_helpers::env::set_var("STRATA_IT_KEPT", "yes");
    let _outside = test_helpers::env::set_var("ELSEWHERE_DROPPED", "no");

    let tree = EnvSource::from_env().with_prefix("STRATA_IT").get_config()?;
    ensure!(tree.get("kept") == Some(&Value::from("yes")), "kept key missing");
    ensure!(!tree.contains_key("dropped"), "prefix not stripped from foreign key");
    ensure!(!tree.contains_key("elsewhere_dropped"), "foreign key not filtered");
    Ok(())
}

#[test]
fn json_source_reads_a_file_lazily() -> Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(br#"{"endpoint": "file://probe", "interval": 5}"#)?;

    let path = camino::Utf8PathBuf::try_from(file.path().to_path_buf())?;
    let config: ProbeConfig = resolve(&[&JsonSource::from_file(&path)])?;
    ensure!(config.endpoint == "file://probe", "wrong endpoint: {}", config.endpoint);
    ensure!(config.interval == 5, "wrong interval: {}", config.interval);
    Ok(())
}
