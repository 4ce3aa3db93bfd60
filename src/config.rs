use anyhow::{Context, Result};
use clap::Parser;
use std::env;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub uploads_dir: String,
    pub database_url: String,
    /// Origin prefixed to `/public/{filename}` in responses.
    pub base_url: String,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Article CRUD service with image uploads")]
pub struct Args {
    /// Host to bind to (overrides ARTICLE_SERVICE_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides ARTICLE_SERVICE_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory uploaded images are written to and served from (overrides ARTICLE_SERVICE_UPLOADS_DIR)
    #[arg(long)]
    pub uploads_dir: Option<String>,

    /// Database URL (overrides ARTICLE_SERVICE_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Public base URL used in image links (overrides ARTICLE_SERVICE_BASE_URL)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Apply the database schema and exit
    #[arg(long)]
    pub migrate: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and migrate flag.
    pub fn from_env_and_args() -> Result<(Self, bool)> {
        let args = Args::parse();
        let migrate = args.migrate;
        Ok((Self::merge(args, |key| env::var(key))?, migrate))
    }

    /// CLI value, then environment, then default.
    fn merge<F>(args: Args, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|_| default.to_string());

        let env_port = match lookup("ARTICLE_SERVICE_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing ARTICLE_SERVICE_PORT value `{}`", value))?,
            Err(env::VarError::NotPresent) => 3000,
            Err(err) => return Err(err).context("reading ARTICLE_SERVICE_PORT"),
        };

        let base_url = args
            .base_url
            .unwrap_or_else(|| var("ARTICLE_SERVICE_BASE_URL", "http://localhost:3000"));

        Ok(Self {
            host: args
                .host
                .unwrap_or_else(|| var("ARTICLE_SERVICE_HOST", "0.0.0.0")),
            port: args.port.unwrap_or(env_port),
            uploads_dir: args
                .uploads_dir
                .unwrap_or_else(|| var("ARTICLE_SERVICE_UPLOADS_DIR", "./public")),
            database_url: args
                .database_url
                .unwrap_or_else(|| var("ARTICLE_SERVICE_DATABASE_URL", "sqlite://./data/articles.db")),
            base_url,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Result<String, env::VarError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned().ok_or(env::VarError::NotPresent)
    }

    #[test]
    fn defaults_apply_without_env_or_flags() {
        let cfg = AppConfig::merge(Args::default(), lookup(&[])).unwrap();
        assert_eq!(cfg.addr(), "0.0.0.0:3000");
        assert_eq!(cfg.uploads_dir, "./public");
        assert_eq!(cfg.base_url, "http://localhost:3000");
    }

    #[test]
    fn flags_override_env() {
        let args = Args {
            port: Some(8080),
            base_url: Some("http://34.101.92.86:3000/".into()),
            ..Args::default()
        };
        let cfg = AppConfig::merge(
            args,
            lookup(&[
                ("ARTICLE_SERVICE_PORT", "9000"),
                ("ARTICLE_SERVICE_HOST", "127.0.0.1"),
            ]),
        )
        .unwrap();

        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.base_url, "http://34.101.92.86:3000/");
    }

    #[test]
    fn bad_port_is_reported() {
        let err = AppConfig::merge(Args::default(), lookup(&[("ARTICLE_SERVICE_PORT", "http")]))
            .unwrap_err();
        assert!(format!("{err:#}").contains("ARTICLE_SERVICE_PORT"));
    }
}
