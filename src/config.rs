//! Front-end configuration.
//!
//! Priority: environment (`POLYQL_*`) > config file > defaults.

use std::path::Path;

use config::{Config, Environment, File};
use serde::Deserialize;
use tracing::debug;

use crate::types::ConfigError;

const CONFIG_PATHS: [&str; 2] = ["./polyql.toml", "/etc/polyql/polyql.toml"];

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FrontendConfig {
    /// Substring of a native rejection that asks for an explicit scan permission
    pub filtering_marker: String,
    /// Substrings of a native rejection meaning the operation cannot run natively
    pub unsupported_markers: Vec<String>,
    /// Inserted into query text at the reported error position
    pub position_marker: String,
    /// Index class used for FULLTEXT indexes without a USING clause
    pub fulltext_index_class: String,
    /// Most steps a DELETE with `IN` lists is expanded into when planning
    pub max_plan_steps: usize,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            filtering_marker: "ALLOW FILTERING".to_string(),
            unsupported_markers: vec![
                "not supported".to_string(),
                "Unsupported operation".to_string(),
            ],
            position_marker: "^".to_string(),
            fulltext_index_class: "com.stratio.cassandra.index.RowIndex".to_string(),
            max_plan_steps: 256,
        }
    }
}

impl FrontendConfig {
    /// Loads the configuration from `path`, or from the first default location that exists.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        match path {
            Some(path) => {
                builder = builder.add_source(File::from(path));
                debug!("Loaded config from: {}", path.display());
            }
            None => {
                for candidate in &CONFIG_PATHS {
                    if Path::new(candidate).exists() {
                        builder = builder.add_source(File::with_name(candidate));
                        debug!("Loaded config from: {}", candidate);
                        break;
                    }
                }
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("POLYQL")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("unsupported_markers"),
        );

        let config = builder.build()?.try_deserialize::<Self>()?;
        Ok(config)
    }

    #[must_use]
    pub fn is_filtering_rejection(&self, message: &str) -> bool {
        !self.filtering_marker.is_empty() && message.contains(&self.filtering_marker)
    }

    #[must_use]
    pub fn is_unsupported_rejection(&self, message: &str) -> bool {
        self.unsupported_markers
            .iter()
            .any(|m| !m.is_empty() && message.contains(m.as_str()))
    }
}
