//! Seed tool configuration loaded from environment variables.

use std::path::PathBuf;

/// Default remote demo API.
pub const DEFAULT_REMOTE_API: &str = "https://api.crm.refine.dev/graphql";

/// Where to fetch from, who to sign in as, and where to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedConfig {
    /// Remote GraphQL endpoint (`CRM_REMOTE_API`).
    pub remote_api: String,
    /// Email used to sign in (`CRM_SEED_EMAIL`).
    pub email: String,
    /// Output fixture path (`CRM_FIXTURE_PATH`).
    pub fixture_path: PathBuf,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            remote_api: String::from(DEFAULT_REMOTE_API),
            email: String::from("john@refine.dev"),
            fixture_path: PathBuf::from("./demo-data.json"),
        }
    }
}

impl SeedConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup. Unset or
    /// blank variables keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        Self {
            remote_api: var("CRM_REMOTE_API").unwrap_or(defaults.remote_api),
            email: var("CRM_SEED_EMAIL").unwrap_or(defaults.email),
            fixture_path: var("CRM_FIXTURE_PATH").map_or(defaults.fixture_path, PathBuf::from),
        }
    }
}
