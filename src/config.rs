use crate::llm::{DEFAULT_BASE_URL, DEFAULT_MODEL, LlmSettings};
use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Config file picked up from the working directory when present.
const CWD_CONFIG_FILE: &str = "config.yaml";

/// Prefix of environment variables read by the config layer.
const ENV_PREFIX: &str = "VAYAMA";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Address to bind
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub timing: TimingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub static_dir: String,
    pub request_timeout_secs: u64,
    /// Idle time after which a browser's shell is dropped.
    pub client_idle_secs: u64,
    /// How often idle shells are swept.
    pub client_sweep_secs: u64,
}

impl ServerConfig {
    #[must_use]
    pub fn client_idle(&self) -> Duration {
        Duration::from_secs(self.client_idle_secs)
    }

    #[must_use]
    pub fn client_sweep(&self) -> Duration {
        Duration::from_secs(self.client_sweep_secs.max(1))
    }
}

#[derive(Deserialize, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

impl From<&LlmConfig> for LlmSettings {
    fn from(cfg: &LlmConfig) -> Self {
        Self {
            base_url: cfg.base_url.clone(),
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
            request_timeout_secs: cfg.request_timeout_secs,
            connect_timeout_secs: cfg.connect_timeout_secs,
        }
    }
}

/// Delays of the simulated, time-driven UI effects.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct TimingConfig {
    pub notification_ms: u64,
    pub payment_delay_ms: u64,
    pub story_ms: u64,
    pub read_receipt_ms: u64,
    pub reply_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            notification_ms: 4000,
            payment_delay_ms: 1500,
            story_ms: 5000,
            read_receipt_ms: 800,
            reply_delay_ms: 1500,
        }
    }
}

impl TimingConfig {
    /// All delays zero, for tests.
    #[must_use]
    pub fn instant() -> Self {
        Self {
            notification_ms: 0,
            payment_delay_ms: 0,
            story_ms: 0,
            read_receipt_ms: 0,
            reply_delay_ms: 0,
        }
    }

    #[must_use]
    pub fn notification(&self) -> Duration {
        Duration::from_millis(self.notification_ms)
    }

    #[must_use]
    pub fn payment_delay(&self) -> Duration {
        Duration::from_millis(self.payment_delay_ms)
    }

    #[must_use]
    pub fn story(&self) -> Duration {
        Duration::from_millis(self.story_ms)
    }

    #[must_use]
    pub fn read_receipt(&self) -> Duration {
        Duration::from_millis(self.read_receipt_ms)
    }

    #[must_use]
    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub json: bool,
    pub filter: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let timing = TimingConfig::default();
        let mut builder = Config::builder();

        // 1. Defaults
        builder = builder
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.static_dir", "static")?
            .set_default("server.request_timeout_secs", 30)?
            .set_default("server.client_idle_secs", 1800)?
            .set_default("server.client_sweep_secs", 60)?
            .set_default("llm.base_url", DEFAULT_BASE_URL)?
            .set_default("llm.model", DEFAULT_MODEL)?
            .set_default("llm.request_timeout_secs", 60)?
            .set_default("llm.connect_timeout_secs", 10)?
            .set_default("timing.notification_ms", timing.notification_ms)?
            .set_default("timing.payment_delay_ms", timing.payment_delay_ms)?
            .set_default("timing.story_ms", timing.story_ms)?
            .set_default("timing.read_receipt_ms", timing.read_receipt_ms)?
            .set_default("timing.reply_delay_ms", timing.reply_delay_ms)?
            .set_default("logging.json", false)?
            .set_default("logging.filter", "info")?;

        // 2. ./config.yaml, then the explicitly named file
        builder = builder.add_source(File::with_name(CWD_CONFIG_FILE).required(false));
        if let Some(path) = &cli.config {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // 3. VAYAMA_-prefixed environment, e.g. VAYAMA_SERVER__PORT=8000
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // 4. CLI overrides (clap also fills these from PORT / HOST)
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", port)?;
        }
        if let Some(host) = &cli.host {
            builder = builder.set_override("server.host", host.as_str())?;
        }
        if cli.log_json {
            builder = builder.set_override("logging.json", true)?;
        }

        let mut cfg: Self = builder.build()?.try_deserialize()?;

        // Conventional key variables, used only when nothing else set one.
        if cfg.llm.api_key.as_deref().is_none_or(|k| k.trim().is_empty()) {
            cfg.llm.api_key = ["GEMINI_API_KEY", "API_KEY"]
                .into_iter()
                .filter_map(|name| env::var(name).ok())
                .find(|k| !k.trim().is_empty());
        }

        Ok(cfg)
    }

    /// Settings for the planner's LLM driver.
    #[must_use]
    pub fn llm_settings(&self) -> LlmSettings {
        LlmSettings::from(&self.llm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_defaults() {
        let timing = TimingConfig::default();
        assert_eq!(timing.notification(), Duration::from_secs(4));
        assert_eq!(timing.payment_delay(), Duration::from_millis(1500));
        assert_eq!(timing.story(), Duration::from_secs(5));
        assert_eq!(timing.read_receipt(), Duration::from_millis(800));
        assert_eq!(timing.reply_delay(), Duration::from_millis(1500));
    }

    #[test]
    fn test_llm_config_debug_redacts_key() {
        let cfg = LlmConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: Some("AIza-secret".to_string()),
            request_timeout_secs: 60,
            connect_timeout_secs: 10,
        };
        assert!(!format!("{cfg:?}").contains("AIza-secret"));
        assert_eq!(LlmSettings::from(&cfg).api_key.as_deref(), Some("AIza-secret"));
    }
}
