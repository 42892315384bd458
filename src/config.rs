use std::env;
use std::fmt;
use dotenv::dotenv;

const DEFAULT_DATABASE_URL: &str = "sqlite://taskboard.db?mode=rwc";
const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_TOKEN_EXPIRE_MINUTES: i64 = 30;

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub server_address: String,
    pub max_connections: u32,
    pub access_token_expire_minutes: i64,
    pub bcrypt_cost: u32,
}

#[derive(Debug)]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid value for {}: {:?}", self.key, self.value)
    }
}

impl std::error::Error for ConfigError {}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            server_address: DEFAULT_SERVER_ADDRESS.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            access_token_expire_minutes: DEFAULT_TOKEN_EXPIRE_MINUTES,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl Settings {
    /// Loads `.env` (if present) and reads settings from the environment,
    /// falling back to defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();
        Ok(Settings {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            server_address: lookup("SERVER_ADDRESS").unwrap_or(defaults.server_address),
            max_connections: parse_or("DATABASE_MAX_CONNECTIONS", &lookup, defaults.max_connections)?,
            access_token_expire_minutes: parse_or(
                "ACCESS_TOKEN_EXPIRE_MINUTES",
                &lookup,
                defaults.access_token_expire_minutes,
            )?,
            bcrypt_cost: parse_or("BCRYPT_COST", &lookup, defaults.bcrypt_cost)?,
        })
    }
}

fn parse_or<T, F>(key: &'static str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError { key, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn unset_variables_fall_back_to_defaults() {
        let settings = Settings::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(settings.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(settings.server_address, DEFAULT_SERVER_ADDRESS);
        assert_eq!(settings.access_token_expire_minutes, 30);
        assert_eq!(settings.bcrypt_cost, bcrypt::DEFAULT_COST);
    }

    #[test]
    fn values_are_read_from_lookup() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("ACCESS_TOKEN_EXPIRE_MINUTES", "5"),
            ("BCRYPT_COST", "4"),
        ]))
        .unwrap();
        assert_eq!(settings.database_url, "sqlite::memory:");
        assert_eq!(settings.access_token_expire_minutes, 5);
        assert_eq!(settings.bcrypt_cost, 4);
    }

    #[test]
    fn bad_number_is_reported() {
        let err = Settings::from_lookup(lookup_from(&[("DATABASE_MAX_CONNECTIONS", "many")]))
            .unwrap_err();
        assert_eq!(err.key, "DATABASE_MAX_CONNECTIONS");
        assert_eq!(err.value, "many");
    }
}
