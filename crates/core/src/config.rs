//! Startup configuration: database connection and batch run tuning.
//!
//! Loaded once from the environment and validated before any connection is opened.

use std::fmt;
use std::time::Duration;

use crate::constants::{
    DEFAULT_GROUP_TIMEOUT_SECS, DEFAULT_PG_PORT, DEFAULT_PROGRESS_EVERY, GROUP_TIMEOUT_ENV,
    PROGRESS_EVERY_ENV,
};
use crate::env_config::parse_with_default;
use crate::error::ConfigError;

/// Where and how to reach the job store.
#[derive(Clone, PartialEq, Eq)]
pub enum ConnectionSettings {
    /// A full `postgres://` URL taken verbatim from `DATABASE_URL`.
    Url(String),
    /// Discrete libpq-style parameters.
    Params {
        host: String,
        port: u16,
        database: String,
        user: String,
        password: Option<String>,
        ssl_mode: Option<String>,
    },
}

impl ConnectionSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Resolve settings from an arbitrary key lookup.
    ///
    /// `DATABASE_URL` wins when present and non-empty. Otherwise `PGHOST`, `PGDATABASE` and
    /// `PGUSER` are required; `PGPORT`, `PGPASSWORD` and `PGSSLMODE` are optional.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty("DATABASE_URL") {
            if !(url.starts_with("postgres://") || url.starts_with("postgresql://")) {
                return Err(ConfigError::Invalid { var: "DATABASE_URL", value: redact_url(&url) });
            }
            return Ok(Self::Url(url));
        }

        let host = non_empty("PGHOST").ok_or(ConfigError::Missing("PGHOST"))?;
        let database = non_empty("PGDATABASE").ok_or(ConfigError::Missing("PGDATABASE"))?;
        let user = non_empty("PGUSER").ok_or(ConfigError::Missing("PGUSER"))?;
        let port = match non_empty("PGPORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .ok()
                .filter(|p| *p != 0)
                .ok_or(ConfigError::Invalid { var: "PGPORT", value: raw })?,
            None => DEFAULT_PG_PORT,
        };

        Ok(Self::Params {
            host,
            port,
            database,
            user,
            password: lookup("PGPASSWORD"),
            ssl_mode: non_empty("PGSSLMODE"),
        })
    }

    /// Human-readable target with credentials stripped, for logs.
    pub fn describe(&self) -> String {
        match self {
            Self::Url(url) => redact_url(url),
            Self::Params { host, port, database, user, .. } => {
                format!("postgres://{user}@{host}:{port}/{database}")
            },
        }
    }
}

impl fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ConnectionSettings").field(&self.describe()).finish()
    }
}

/// Mask every password a connection URL can carry: the userinfo part and any
/// `password`-like query parameter. Anything `Url` cannot parse is replaced wholesale.
fn redact_url(raw: &str) -> String {
    let Ok(mut url) = url::Url::parse(raw.trim()) else {
        return "<unparsable url>".to_owned();
    };
    if url.password().is_some() {
        let _ = url.set_password(Some("***"));
    }
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            let value = if key.to_ascii_lowercase().contains("password") {
                "***".to_owned()
            } else {
                value.into_owned()
            };
            (key.into_owned(), value)
        })
        .collect();
    if !pairs.is_empty() {
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }
    url.to_string()
}

/// Tuning knobs for the batch driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSettings {
    /// Emit a progress checkpoint every this many processed groups.
    pub progress_every: usize,
    /// Per-group ceiling; exceeding it fails the group.
    pub group_timeout: Duration,
    /// Only process the first `limit` groups.
    pub limit: Option<usize>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            progress_every: DEFAULT_PROGRESS_EVERY,
            group_timeout: Duration::from_secs(DEFAULT_GROUP_TIMEOUT_SECS),
            limit: None,
        }
    }
}

impl RunSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let progress_every =
            parse_with_default(&lookup, PROGRESS_EVERY_ENV, DEFAULT_PROGRESS_EVERY).max(1);
        let timeout_secs =
            parse_with_default(&lookup, GROUP_TIMEOUT_ENV, DEFAULT_GROUP_TIMEOUT_SECS).max(1);
        Self { progress_every, group_timeout: Duration::from_secs(timeout_secs), limit: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| pairs.iter().find(|(k, _)| *k == key).map(|(_, v)| (*v).to_owned())
    }

    #[test]
    fn database_url_takes_precedence() {
        let settings = ConnectionSettings::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://u:secret@db:5432/jobs"),
            ("PGHOST", "ignored"),
        ]))
        .unwrap();
        assert_eq!(settings, ConnectionSettings::Url("postgres://u:secret@db:5432/jobs".into()));
    }

    #[test]
    fn rejects_non_postgres_url() {
        let err =
            ConnectionSettings::from_lookup(lookup_from(&[("DATABASE_URL", "mysql://u:p@h/db")]))
                .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid { var: "DATABASE_URL", value: "mysql://u:***@h/db".into() }
        );
    }

    #[test]
    fn builds_params_with_default_port() {
        let settings = ConnectionSettings::from_lookup(lookup_from(&[
            ("PGHOST", "db.internal"),
            ("PGDATABASE", "jobs"),
            ("PGUSER", "admin"),
            ("PGPASSWORD", "pw"),
        ]))
        .unwrap();
        assert_eq!(
            settings,
            ConnectionSettings::Params {
                host: "db.internal".into(),
                port: 5432,
                database: "jobs".into(),
                user: "admin".into(),
                password: Some("pw".into()),
                ssl_mode: None,
            }
        );
    }

    #[test]
    fn missing_host_is_reported() {
        let err = ConnectionSettings::from_lookup(lookup_from(&[
            ("PGDATABASE", "jobs"),
            ("PGUSER", "admin"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing("PGHOST"));
    }

    #[test]
    fn empty_database_url_falls_through_to_params() {
        let err = ConnectionSettings::from_lookup(lookup_from(&[("DATABASE_URL", "  ")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Missing("PGHOST"));
    }

    #[test]
    fn invalid_port_is_reported() {
        let err = ConnectionSettings::from_lookup(lookup_from(&[
            ("PGHOST", "h"),
            ("PGDATABASE", "d"),
            ("PGUSER", "u"),
            ("PGPORT", "fifty"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Invalid { var: "PGPORT", value: "fifty".into() });
    }

    #[test]
    fn debug_output_hides_password() {
        let url = ConnectionSettings::Url("postgres://admin:hunter2@db/jobs".into());
        let rendered = format!("{url:?}");
        assert!(!rendered.contains("hunter2"), "{rendered}");
        assert!(rendered.contains("admin:***@db/jobs"));

        let params = ConnectionSettings::Params {
            host: "db".into(),
            port: 5432,
            database: "jobs".into(),
            user: "admin".into(),
            password: Some("hunter2".into()),
            ssl_mode: None,
        };
        assert!(!format!("{params:?}").contains("hunter2"));
    }

    #[test]
    fn query_string_password_is_masked() {
        let settings = ConnectionSettings::from_lookup(lookup_from(&[(
            "DATABASE_URL",
            "postgres://db/jobs?user=admin&password=hunter2&sslmode=require",
        )]))
        .unwrap();

        let described = settings.describe();
        assert!(!described.contains("hunter2"), "password leaked: {described}");
        assert_eq!(described, "postgres://db/jobs?user=admin&password=***&sslmode=require");
        assert!(!format!("{settings:?}").contains("hunter2"));
    }

    #[test]
    fn rejected_url_never_echoes_password() {
        let err = ConnectionSettings::from_lookup(lookup_from(&[(
            "DATABASE_URL",
            "mysql://root:hunter2@db/jobs?sslpassword=hunter3",
        )]))
        .unwrap_err();
        let rendered = err.to_string();
        assert!(!rendered.contains("hunter2") && !rendered.contains("hunter3"), "{rendered}");
    }

    #[test]
    fn unparsable_url_is_replaced() {
        assert_eq!(redact_url("postgres://admin:hunter2@[::1/jobs"), "<unparsable url>");
    }

    #[test]
    fn run_settings_defaults() {
        let settings = RunSettings::from_lookup(lookup_from(&[]));
        assert_eq!(settings, RunSettings::default());
        assert_eq!(settings.progress_every, 100);
        assert_eq!(settings.group_timeout, Duration::from_secs(300));
    }

    #[test]
    fn run_settings_overrides_and_clamps() {
        let settings = RunSettings::from_lookup(lookup_from(&[
            (PROGRESS_EVERY_ENV, "0"),
            (GROUP_TIMEOUT_ENV, "45"),
        ]));
        assert_eq!(settings.progress_every, 1);
        assert_eq!(settings.group_timeout, Duration::from_secs(45));
    }
}
