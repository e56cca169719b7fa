use std::env;

/// Runtime configuration, read once at startup from the environment
/// (a local `.env` file is honored in development).
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the hosted row store
    pub store_url: String,
    /// API key sent with every store request
    pub store_key: String,
    /// Daily calorie target shown in the day summary
    pub calorie_goal: i64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            store_url: required("DIET_STORE_URL")?,
            store_key: required("DIET_STORE_KEY")?,
            calorie_goal: env::var("DIET_CALORIE_GOAL")
                .unwrap_or_else(|_| "2000".into())
                .parse()?,
        })
    }

    /// Configuration for `--demo` runs: no remote store involved, so
    /// only the calorie goal matters.
    pub fn demo() -> Self {
        Self {
            store_url: String::new(),
            store_key: String::new(),
            calorie_goal: env::var("DIET_CALORIE_GOAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2000),
        }
    }
}

fn required(key: &str) -> anyhow::Result<String> {
    env::var(key).map_err(|_| anyhow::anyhow!("Missing required env var: {}", key))
}
