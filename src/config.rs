use crate::error::CastorError;
use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_TABLE_NAME: &str = "oauth2_token";
pub const DEFAULT_GC_INTERVAL_SECS: u64 = 600;

/// Store configuration. Every field has a usable default; `from_env`
/// overlays `CASTOR_*` environment variables on top.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub database_url: String,
    pub table_name: String,
    /// Sweep cadence in seconds; 0 selects the default.
    pub gc_interval_secs: u64,
    pub max_connections: u32,
    pub min_connections: u32,
    pub max_lifetime_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:oauth2_token.db".to_string(),
            table_name: DEFAULT_TABLE_NAME.to_string(),
            gc_interval_secs: DEFAULT_GC_INTERVAL_SECS,
            max_connections: 50,
            min_connections: 25,
            max_lifetime_secs: 2 * 3600,
        }
    }
}

impl StoreConfig {
    /// Defaults merged with `CASTOR_`-prefixed environment variables.
    /// A `.env` file is honored when present.
    pub fn from_env() -> Result<Self, CastorError> {
        dotenvy::dotenv().ok();

        let cfg = Figment::from(Serialized::defaults(Self::default()))
            .merge(Env::prefixed("CASTOR_"))
            .extract()?;
        Ok(cfg)
    }

    pub fn gc_interval(&self) -> Duration {
        if self.gc_interval_secs == 0 {
            Duration::from_secs(DEFAULT_GC_INTERVAL_SECS)
        } else {
            Duration::from_secs(self.gc_interval_secs)
        }
    }

    pub fn max_lifetime(&self) -> Duration {
        Duration::from_secs(self.max_lifetime_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_gc_interval_selects_default() {
        let cfg = StoreConfig {
            gc_interval_secs: 0,
            ..Default::default()
        };
        assert_eq!(cfg.gc_interval(), Duration::from_secs(600));
    }
}
