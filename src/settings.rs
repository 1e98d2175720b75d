use crate::factors::DEFAULT_FACTOR_FEED_URL;
use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, ConfigError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;

const LISTEN_IP_FIELD: &str = "listen_ip";
const PORT_FIELD: &str = "port";
const FACTOR_FEED_URL_FIELD: &str = "factor_feed_url";
const DATA_DIR_FIELD: &str = "data_dir";

#[derive(Serialize, Deserialize)]
pub struct Settings {
    pub listen_ip: String,
    pub port: u16,
    pub factor_feed_url: String,
    pub data_dir: String,
}

impl Settings {
    /// Socket address the API binds to.
    pub fn socket_address(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.listen_ip, self.port).parse()
    }
}

pub fn map_from_environment_variables() -> HashMap<String, String> {
    let mut map = HashMap::<String, String>::new();
    for (key, value) in env::vars() {
        map.insert(key, value);
    }
    map
}

pub fn make_settings_file_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "Gridcarbon")
        .expect("system should have a home directory")
        .preference_dir()
        .join("settings.toml")
}

fn make_config_builder(
    environment_variables: &HashMap<String, String>,
) -> ConfigBuilder<DefaultState> {
    let config = Config::builder()
        .set_default(LISTEN_IP_FIELD, "0.0.0.0")
        .expect("key should be convertible to string")
        .set_default(PORT_FIELD, 8080)
        .expect("key should be convertible to string")
        .set_default(FACTOR_FEED_URL_FIELD, DEFAULT_FACTOR_FEED_URL)
        .expect("key should be convertible to string");
    let data_dir = environment_variables
        .get("GRIDCARBON_DATA_DIR")
        .cloned()
        .unwrap_or_else(|| String::from("data"));
    config
        .set_default(DATA_DIR_FIELD, data_dir)
        .expect("key should be convertible to string")
}

pub fn make_settings(
    environment_variables: &HashMap<String, String>,
    settings_file_path: &PathBuf,
) -> Result<Settings, ConfigError> {
    let builder = make_config_builder(environment_variables);
    let builder = builder.add_source(
        config::File::new(
            settings_file_path
                .to_str()
                .expect("file path should be convertible to string"),
            config::FileFormat::Toml,
        )
        .required(false),
    );
    let config = builder.build()?;
    config.try_deserialize::<Settings>()
}
