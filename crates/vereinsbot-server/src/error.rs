use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {env_var}")]
    MissingEnvVar { env_var: String },

    #[error(transparent)]
    Other(#[from] config::ConfigError),
}

/// Map a config field path like `provider.api_key` back to the environment
/// variable the operator has to set.
pub fn to_env_var(field: &str) -> String {
    format!("VEREINSBOT_{}", field.replace('.', "__").to_uppercase())
}
