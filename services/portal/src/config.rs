//! Portal configuration sourced from environment variables with an optional
//! YAML override file.
//!
//! The presence of `HOA_POSTGRES_URL` (or `postgres.url` in the override file)
//! selects remote mode; without it the gateway runs on fixture data.
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::time::Duration;

const DEFAULT_READ_TIMEOUT_MS: u64 = 15_000;
const DEFAULT_WRITE_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub postgres: Option<PostgresConfig>,
    pub read_timeout_ms: u64,
    pub write_timeout_ms: u64,
    /// Keep only records belonging to this community when fetching.
    pub community_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_ms: u64,
    pub acquire_timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
struct PortalConfigOverride {
    postgres: Option<PostgresConfigOverride>,
    read_timeout_ms: Option<u64>,
    write_timeout_ms: Option<u64>,
    community_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PostgresConfigOverride {
    url: Option<String>,
    max_connections: Option<u32>,
    connect_timeout_ms: Option<u64>,
    acquire_timeout_ms: Option<u64>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            postgres: None,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            write_timeout_ms: DEFAULT_WRITE_TIMEOUT_MS,
            community_id: None,
        }
    }
}

impl PostgresConfig {
    fn with_url(url: String) -> Self {
        Self {
            url,
            max_connections: 5,
            connect_timeout_ms: 5_000,
            acquire_timeout_ms: 5_000,
        }
    }
}

fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(value) => value.parse().with_context(|| format!("parse {key}")),
        Err(_) => Ok(default),
    }
}

impl PortalConfig {
    pub fn from_env() -> Result<Self> {
        let postgres = match std::env::var("HOA_POSTGRES_URL") {
            Ok(url) if !url.trim().is_empty() => {
                let defaults = PostgresConfig::with_url(url);
                Some(PostgresConfig {
                    max_connections: env_parse(
                        "HOA_POSTGRES_MAX_CONNECTIONS",
                        defaults.max_connections,
                    )?,
                    connect_timeout_ms: env_parse(
                        "HOA_POSTGRES_CONNECT_TIMEOUT_MS",
                        defaults.connect_timeout_ms,
                    )?,
                    acquire_timeout_ms: env_parse(
                        "HOA_POSTGRES_ACQUIRE_TIMEOUT_MS",
                        defaults.acquire_timeout_ms,
                    )?,
                    ..defaults
                })
            }
            _ => None,
        };
        let community_id = std::env::var("HOA_COMMUNITY_ID")
            .ok()
            .filter(|value| !value.trim().is_empty());
        Ok(Self {
            postgres,
            read_timeout_ms: env_parse("HOA_READ_TIMEOUT_MS", DEFAULT_READ_TIMEOUT_MS)?,
            write_timeout_ms: env_parse("HOA_WRITE_TIMEOUT_MS", DEFAULT_WRITE_TIMEOUT_MS)?,
            community_id,
        })
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("HOA_PORTAL_CONFIG") {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("read HOA_PORTAL_CONFIG: {path}"))?;
            let override_cfg: PortalConfigOverride =
                serde_yaml::from_str(&contents).with_context(|| "parse portal config yaml")?;
            config.apply(override_cfg)?;
        }
        Ok(config)
    }

    fn apply(&mut self, override_cfg: PortalConfigOverride) -> Result<()> {
        if let Some(pg) = override_cfg.postgres {
            let mut postgres = match (self.postgres.take(), pg.url) {
                (Some(existing), Some(url)) => PostgresConfig { url, ..existing },
                (None, Some(url)) => PostgresConfig::with_url(url),
                (Some(existing), None) => existing,
                (None, None) => anyhow::bail!("postgres override requires a url"),
            };
            if let Some(value) = pg.max_connections {
                postgres.max_connections = value;
            }
            if let Some(value) = pg.connect_timeout_ms {
                postgres.connect_timeout_ms = value;
            }
            if let Some(value) = pg.acquire_timeout_ms {
                postgres.acquire_timeout_ms = value;
            }
            self.postgres = Some(postgres);
        }
        if let Some(value) = override_cfg.read_timeout_ms {
            self.read_timeout_ms = value;
        }
        if let Some(value) = override_cfg.write_timeout_ms {
            self.write_timeout_ms = value;
        }
        if let Some(value) = override_cfg.community_id {
            self.community_id = Some(value);
        }
        Ok(())
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    const KEYS: [&str; 8] = [
        "HOA_POSTGRES_URL",
        "HOA_POSTGRES_MAX_CONNECTIONS",
        "HOA_POSTGRES_CONNECT_TIMEOUT_MS",
        "HOA_POSTGRES_ACQUIRE_TIMEOUT_MS",
        "HOA_READ_TIMEOUT_MS",
        "HOA_WRITE_TIMEOUT_MS",
        "HOA_COMMUNITY_ID",
        "HOA_PORTAL_CONFIG",
    ];

    struct EnvGuard {
        saved: Vec<(&'static str, Option<String>)>,
    }

    impl EnvGuard {
        fn clean() -> Self {
            let saved = KEYS
                .iter()
                .map(|key| (*key, std::env::var(key).ok()))
                .collect();
            for key in KEYS {
                unsafe {
                    std::env::remove_var(key);
                }
            }
            Self { saved }
        }

        fn set(&self, key: &'static str, value: &str) {
            unsafe {
                std::env::set_var(key, value);
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, prev) in &self.saved {
                match prev {
                    Some(value) => unsafe {
                        std::env::set_var(key, value);
                    },
                    None => unsafe {
                        std::env::remove_var(key);
                    },
                }
            }
        }
    }

    #[test]
    #[serial]
    fn defaults_select_mock_mode() {
        let _env = EnvGuard::clean();
        let config = PortalConfig::from_env().expect("config");
        assert!(config.postgres.is_none());
        assert_eq!(config.read_timeout(), Duration::from_secs(15));
        assert_eq!(config.write_timeout(), Duration::from_secs(10));
        assert_eq!(config.community_id, None);
    }

    #[test]
    #[serial]
    fn postgres_url_selects_remote_mode() {
        let env = EnvGuard::clean();
        env.set("HOA_POSTGRES_URL", "postgres://portal@localhost/hoa");
        env.set("HOA_POSTGRES_MAX_CONNECTIONS", "9");
        env.set("HOA_READ_TIMEOUT_MS", "2500");
        env.set("HOA_COMMUNITY_ID", "C001");
        let config = PortalConfig::from_env().expect("config");
        let pg = config.postgres.expect("postgres");
        assert_eq!(pg.max_connections, 9);
        assert_eq!(pg.acquire_timeout_ms, 5_000);
        assert_eq!(config.read_timeout_ms, 2_500);
        assert_eq!(config.community_id.as_deref(), Some("C001"));
    }

    #[test]
    #[serial]
    fn invalid_number_is_reported() {
        let env = EnvGuard::clean();
        env.set("HOA_WRITE_TIMEOUT_MS", "soon");
        let err = PortalConfig::from_env().expect_err("invalid");
        assert!(err.to_string().contains("HOA_WRITE_TIMEOUT_MS"));
    }

    #[test]
    #[serial]
    fn yaml_override_wins_over_env() {
        let env = EnvGuard::clean();
        let path = std::env::temp_dir().join(format!("hoa-portal-{}.yaml", std::process::id()));
        let mut file = std::fs::File::create(&path).expect("create yaml");
        writeln!(
            file,
            "postgres:\n  url: postgres://yaml@db/hoa\n  max_connections: 3\nwrite_timeout_ms: 4000\ncommunity_id: C777"
        )
        .expect("write yaml");
        env.set("HOA_WRITE_TIMEOUT_MS", "9000");
        env.set("HOA_PORTAL_CONFIG", path.to_str().expect("utf-8 path"));

        let config = PortalConfig::from_env_or_yaml().expect("config");
        let pg = config.postgres.expect("postgres");
        assert_eq!(pg.url, "postgres://yaml@db/hoa");
        assert_eq!(pg.max_connections, 3);
        assert_eq!(config.write_timeout_ms, 4_000);
        assert_eq!(config.community_id.as_deref(), Some("C777"));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    #[serial]
    fn postgres_override_without_url_is_rejected() {
        let mut config = PortalConfig::default();
        let err = config
            .apply(PortalConfigOverride {
                postgres: Some(PostgresConfigOverride {
                    url: None,
                    max_connections: Some(2),
                    connect_timeout_ms: None,
                    acquire_timeout_ms: None,
                }),
                read_timeout_ms: None,
                write_timeout_ms: None,
                community_id: None,
            })
            .expect_err("missing url");
        assert!(err.to_string().contains("url"));
    }
}
