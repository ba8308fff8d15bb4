use std::env;

/// Default polling interval: 30 minutes.
pub const DEFAULT_POLL_INTERVAL_MILLIS: u64 = 1_800_000;

#[derive(Debug, Clone)]
pub struct Config {
    pub gaps_base_url: String,
    pub poll_interval_millis: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let gaps_base_url =
            env::var("GAPS_BASE_URL").map_err(|_| "GAPS_BASE_URL is required")?;

        let poll_interval_millis = match env::var("POLL_INTERVAL_MILLIS") {
            Ok(value) => value
                .parse::<u64>()
                .map_err(|_| "POLL_INTERVAL_MILLIS must be a valid number")?,
            Err(_) => DEFAULT_POLL_INTERVAL_MILLIS,
        };

        Ok(Self {
            gaps_base_url,
            poll_interval_millis,
        })
    }
}
