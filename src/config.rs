use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

use crate::services::http_store::DEFAULT_BASE_URL;

pub const DEFAULT_TEST_ACCOUNTS: [&str; 4] = [
    "employee@test.tld",
    "admin@test.tld",
    "employee@company.tld",
    "admin@company.tld",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Status only, as used by automated runs.
    StatusOnly,
    /// Status plus exclusion of test accounts and the admin's own bills.
    Live,
}

impl FromStr for FilterMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "live" => Ok(FilterMode::Live),
            "status-only" | "status_only" | "test" => Ok(FilterMode::StatusOnly),
            other => Err(format!("unknown filter mode {other:?}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub storage_path: String,
    pub filter_mode: FilterMode,
    pub test_accounts: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: DEFAULT_BASE_URL.to_string(),
            storage_path: "billed.sqlite".to_string(),
            filter_mode: FilterMode::Live,
            test_accounts: DEFAULT_TEST_ACCOUNTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Config {
    pub fn load() -> Self {
        let defaults = Config::default();
        Self {
            api_url: try_load("BILLED_API_URL", defaults.api_url),
            storage_path: try_load("BILLED_STORAGE_PATH", defaults.storage_path),
            filter_mode: try_load("BILLED_FILTER", defaults.filter_mode),
            test_accounts: var("BILLED_TEST_ACCOUNTS")
                .map(|raw| parse_accounts(&raw))
                .unwrap_or(defaults.test_accounts),
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Debug,
    T::Err: Display,
{
    match var(key) {
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value: {e}, using default: {default:?}");
            default
        }),
        None => {
            info!("{key} not set, using default: {default:?}");
            default
        }
    }
}

pub fn parse_accounts(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
