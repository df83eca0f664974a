use std::{str::FromStr, time::Duration};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Env {
    Dev,
    Staging,
    Production,
}

impl Env {
    pub fn from_env() -> Self {
        match var("ENVIRONMENT") {
            Ok(Some(env)) => match env.as_str() {
                "dev" => Env::Dev,
                "staging" => Env::Staging,
                "production" => Env::Production,
                _ => {
                    tracing::warn!("Unknown environment `{env}`, falling back to dev");
                    Env::Dev
                }
            },
            _ => Env::Dev,
        }
    }
}

pub struct ServerConfig {
    pub env: Env,
    pub listen_addr: String,
    pub database_url: String,
    pub database_max_connections: usize,
    pub jwt_secret: String,
    /// Coalescing window of the per-request comment loader.
    pub comment_batch_delay: Duration,
}

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: usize = 10;
const DEFAULT_BATCH_DELAY_MS: u64 = 100;

fn var(key: &str) -> Result<Option<String>, String> {
    match std::env::var(key) {
        Ok(env) => Ok(Some(env)),
        Err(e) => match e {
            std::env::VarError::NotPresent => Ok(None),
            std::env::VarError::NotUnicode(_) => Err(format!(
                "Could not get the environment variable `{key}` due to unicode error"
            )),
        },
    }
}

fn required_var(key: &str) -> String {
    let val = var(key);
    match val {
        Ok(val) => match val {
            Some(val) => val,
            None => {
                tracing::error!("Environment variable `{key}` is required");
                std::process::exit(1)
            }
        },
        Err(e) => {
            tracing::error!(
                "Environment variable `{key}` is required, but could not retrieve: {e}"
            );
            std::process::exit(1)
        }
    }
}

/// Parses an optional variable, using `default` when it is absent or invalid.
fn parsed_var<T: FromStr>(key: &str, default: T) -> T {
    match var(key) {
        Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid value `{raw}` for environment variable `{key}`, using default");
            default
        }),
        Ok(None) => default,
        Err(e) => {
            tracing::warn!("{e}, using default");
            default
        }
    }
}

impl ServerConfig {
    pub fn new_from_env() -> Self {
        ServerConfig {
            env: Env::from_env(),
            listen_addr: var("LISTEN_ADDR")
                .ok()
                .flatten()
                .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.into()),
            database_url: required_var("DATABASE_URL"),
            database_max_connections: parsed_var(
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_MAX_CONNECTIONS,
            ),
            jwt_secret: required_var("JWT_SECRET"),
            comment_batch_delay: Duration::from_millis(parsed_var(
                "COMMENT_BATCH_DELAY_MS",
                DEFAULT_BATCH_DELAY_MS,
            )),
        }
    }
}
