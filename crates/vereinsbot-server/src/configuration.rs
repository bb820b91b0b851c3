use crate::error::{to_env_var, ConfigError};
use config::{Config, Environment};
use serde::Deserialize;
use std::net::SocketAddr;
use vereinsbot::providers::configs::{
    OpenAiAssistantsConfig, OpenAiResponsesConfig, ProviderConfig,
};

#[derive(Debug, Default, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerSettings {
    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Failed to parse socket address")
    }
}

/// Upstream protocol strategy, selected via `VEREINSBOT_PROVIDER__TYPE`.
/// `responses` is the default; `assistants` keeps the older multi-step run
/// protocol available.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase", tag = "type")]
pub enum ProviderSettings {
    Responses {
        #[serde(default = "default_openai_host")]
        host: String,
        #[serde(default)]
        api_key: Option<String>,
        #[serde(default = "default_model")]
        model: String,
        #[serde(default = "default_vector_store_id")]
        vector_store_id: String,
    },
    Assistants {
        #[serde(default = "default_openai_host")]
        host: String,
        #[serde(default)]
        api_key: Option<String>,
        #[serde(default = "default_model")]
        model: String,
        #[serde(default = "default_vector_store_id")]
        vector_store_id: String,
    },
}

impl ProviderSettings {
    /// Convert to the vereinsbot ProviderConfig. `None` when no API key is
    /// configured; the chat route surfaces that per request instead of
    /// failing at startup.
    pub fn into_config(self) -> Option<ProviderConfig> {
        match self {
            ProviderSettings::Responses {
                host,
                api_key,
                model,
                vector_store_id,
            } => api_key.filter(|key| !key.is_empty()).map(|api_key| {
                ProviderConfig::Responses(OpenAiResponsesConfig {
                    host,
                    api_key,
                    model,
                    vector_store_id,
                })
            }),
            ProviderSettings::Assistants {
                host,
                api_key,
                model,
                vector_store_id,
            } => api_key.filter(|key| !key.is_empty()).map(|api_key| {
                ProviderConfig::Assistants(OpenAiAssistantsConfig {
                    host,
                    api_key,
                    model,
                    vector_store_id,
                })
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CorsSettings {
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub provider: ProviderSettings,
    #[serde(default)]
    pub cors: CorsSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load_and_validate()
    }

    fn load_and_validate() -> Result<Self, ConfigError> {
        // Start with default configuration
        let config = Config::builder()
            // Server defaults
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port())?
            // Provider defaults
            .set_default("provider.type", "responses")?
            // Layer on the environment variables
            .add_source(
                Environment::with_prefix("VEREINSBOT")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            )
            .build()?;

        // Try to deserialize the configuration
        let result: Result<Self, config::ConfigError> = config.try_deserialize();

        // Handle missing field errors specially
        match result {
            Ok(settings) => Ok(settings),
            Err(err) => {
                tracing::debug!("Configuration error: {:?}", &err);

                // Handle both NotFound and missing field message variants
                let error_str = err.to_string();
                if error_str.starts_with("missing field") {
                    // Extract field name from error message "missing field `type`"
                    let field = error_str
                        .trim_start_matches("missing field `")
                        .trim_end_matches("`");
                    let env_var = to_env_var(field);
                    Err(ConfigError::MissingEnvVar { env_var })
                } else if let config::ConfigError::NotFound(field) = &err {
                    let env_var = to_env_var(field);
                    Err(ConfigError::MissingEnvVar { env_var })
                } else {
                    Err(ConfigError::Other(err))
                }
            }
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_model() -> String {
    "gpt-4.1-mini".to_string()
}

fn default_openai_host() -> String {
    "https://api.openai.com".to_string()
}

fn default_vector_store_id() -> String {
    "vs_68c4739fd58481919479080b69780dfa".to_string()
}

/// One authoritative allow-list for both club sites, with and without TLS,
/// plus the local widget dev server.
fn default_allowed_origins() -> Vec<String> {
    [
        "https://www.tsv-griedel.de",
        "https://tsv-griedel.de",
        "http://www.tsv-griedel.de",
        "http://tsv-griedel.de",
        "https://www.floorballgriedel.de",
        "https://floorballgriedel.de",
        "http://www.floorballgriedel.de",
        "http://floorballgriedel.de",
        "http://localhost:3000",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
