use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Config file picked up from the working directory when none is given.
const DEFAULT_CONFIG_FILE: &str = "config.yaml";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Address to bind
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Base URL of the fact-check backend
    #[arg(long, env = "BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Backend request timeout in seconds
    #[arg(long, env = "BACKEND_TIMEOUT_SECS")]
    pub backend_timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub backend: BackendConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl BackendConfig {
    /// Parsed base URL; must be absolute `http` or `https`.
    pub fn url(&self) -> Result<Url, config::ConfigError> {
        let url = Url::parse(self.base_url.trim()).map_err(|e| {
            config::ConfigError::Message(format!("backend.base_url is invalid: {e}"))
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(config::ConfigError::Message(format!(
                "backend.base_url must use http or https, got {other}"
            ))),
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    /// Priority: CLI flag > CLI env var > `FACTCHAT_` env > config file > defaults.
    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder()
            .set_default("server.port", 3000)?
            .set_default("server.host", "127.0.0.1")?
            .set_default("backend.timeout_secs", 30)?;

        match &cli.config {
            Some(path) => builder = builder.add_source(File::from(Path::new(path))),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                builder = builder.add_source(File::from(Path::new(DEFAULT_CONFIG_FILE)));
            }
            None => {}
        }

        // E.g. FACTCHAT_SERVER__PORT=8000
        builder = builder.add_source(
            Environment::with_prefix("FACTCHAT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(host) = cli.host {
            builder = builder.set_override("server.host", host)?;
        }
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", port)?;
        }
        if let Some(url) = cli.backend_url {
            builder = builder.set_override("backend.base_url", url)?;
        }
        if let Some(secs) = cli.backend_timeout_secs {
            builder = builder.set_override("backend.timeout_secs", secs)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.backend.url()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(url: &str) -> BackendConfig {
        BackendConfig {
            base_url: url.to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_backend_url_validation() {
        assert!(backend("http://localhost:8000").url().is_ok());
        assert!(backend(" https://api.example.com/ ").url().is_ok());
        assert!(backend("ftp://example.com").url().is_err());
        assert!(backend("not a url").url().is_err());
        assert_eq!(backend("http://x").timeout(), Duration::from_secs(5));
    }
}
