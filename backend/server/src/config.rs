use std::{env, fmt::Display, fs::read_to_string, str::FromStr};

use tracing::{info, warn};

pub const DEFAULT_OS_TOKEN_URL: &str = "https://api.os.uk/oauth2/token/v1";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "development" | "test" | "" => Ok(Self::Development),
            other => Err(format!("unknown environment '{other}'")),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub environment: Environment,
    pub gridwalk_api: String,
    pub tile_server_url: String,
    pub aws_region: String,
    pub s3_bucket: String,
    pub dynamodb_landing_table: String,
    pub dynamodb_table: String,
    pub os_token_url: String,
    pub os_project_api_key: Option<String>,
    pub os_project_api_secret: Option<String>,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("RUST_PORT", "3001"),
            environment: try_load("NODE_ENV", "development"),
            gridwalk_api: trim_base(try_load("GRIDWALK_API", "http://localhost:3000")),
            tile_server_url: trim_base(try_load("TILE_SERVER_URL", "http://localhost:3000/tiles")),
            aws_region: try_load("AWS_REGION", "eu-west-2"),
            s3_bucket: try_load("S3_BUCKET", "gridwalk-uploads"),
            dynamodb_landing_table: try_load("DYNAMODB_LANDING_TABLE", "gridwalk-landing"),
            dynamodb_table: try_load("DYNAMODB_TABLE", "gridwalk"),
            os_token_url: try_load("OS_TOKEN_URL", DEFAULT_OS_TOKEN_URL),
            os_project_api_key: var("OS_PROJECT_API_KEY").ok(),
            os_project_api_secret: read_secret("OS_PROJECT_API_SECRET"),
        }
    }

    pub fn secure_cookies(&self) -> bool {
        self.environment == Environment::Production
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

/// Secrets come from the environment first, then from a docker secret file.
fn read_secret(secret_name: &str) -> Option<String> {
    if let Ok(value) = env::var(secret_name) {
        return Some(value);
    }

    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            warn!("Failed to read {secret_name} from file: {e}");
        })
        .ok()
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parse() {
        assert_eq!("production".parse::<Environment>(), Ok(Environment::Production));
        assert_eq!("Production".parse::<Environment>(), Ok(Environment::Production));
        assert_eq!("development".parse::<Environment>(), Ok(Environment::Development));
        assert_eq!("".parse::<Environment>(), Ok(Environment::Development));
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_trim_base() {
        assert_eq!(trim_base("http://api/".to_string()), "http://api");
        assert_eq!(trim_base("http://api".to_string()), "http://api");
    }
}
