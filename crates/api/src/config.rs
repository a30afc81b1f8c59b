use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    pub session: SessionConfig,
    pub limits: LimitsConfig,
    /// Generative draft service configuration
    pub generation: GenerationConfig,
    /// Finalized report email configuration
    #[serde(default)]
    pub email: EmailConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Applies to every route except draft generation and corrections.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Upper bound for one request body, evidence uploads included.
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_secs: u64,
}

impl From<&DatabaseConfig> for persistence::db::DatabaseConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections,
            min_connections: config.min_connections,
            connect_timeout_secs: config.connect_timeout_secs,
            idle_timeout_secs: config.idle_timeout_secs,
            busy_timeout_secs: config.busy_timeout_secs,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Failed and successful login attempts allowed per badge per minute.
    /// Zero disables throttling.
    #[serde(default = "default_login_attempts")]
    pub login_attempts_per_minute: u32,

    #[serde(default)]
    pub hsts_enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Sessions untouched for this long are discarded on next access.
    #[serde(default = "default_session_idle_timeout")]
    pub idle_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_max_evidence_files")]
    pub max_evidence_files: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    /// API key for the generative service. Required.
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_generation_model")]
    pub model: String,

    #[serde(default = "default_generation_base_url")]
    pub base_url: String,

    /// Bounds the whole generate call, uploads and polling included.
    #[serde(default = "default_generation_timeout")]
    pub timeout_secs: u64,

    /// Delay between file state checks while staged files are processing.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_max_body_size() -> usize {
    268_435_456 // 256 MiB, room for body-camera video
}
fn default_max_connections() -> u32 {
    5
}
fn default_min_connections() -> u32 {
    1
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_idle_timeout() -> u64 {
    600
}
fn default_busy_timeout() -> u64 {
    5
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_login_attempts() -> u32 {
    10
}
fn default_session_idle_timeout() -> u64 {
    28_800 // 8 hours, one shift
}
fn default_max_evidence_files() -> usize {
    20
}
fn default_generation_model() -> String {
    "gemini-1.5-flash".to_string()
}
fn default_generation_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}
fn default_generation_timeout() -> u64 {
    300
}
fn default_poll_interval_ms() -> u64 {
    2000
}
fn default_max_poll_attempts() -> u32 {
    90
}

/// Email configuration for finalized report copies.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Email provider: smtp, or console (for development)
    #[serde(default = "default_email_provider")]
    pub provider: String,

    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,

    /// STARTTLS submission port
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// SMTP username, also used as the sender address
    #[serde(default)]
    pub smtp_username: String,

    #[serde(default)]
    pub smtp_password: String,

    /// Sender name (From header)
    #[serde(default = "default_sender_name")]
    pub sender_name: String,

    /// Upper bound on one delivery attempt, reported as a failed outcome
    #[serde(default = "default_send_timeout")]
    pub send_timeout_secs: u64,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            provider: default_email_provider(),
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            sender_name: default_sender_name(),
            send_timeout_secs: default_send_timeout(),
        }
    }
}

impl EmailConfig {
    /// Both halves of the SMTP login are present.
    pub fn has_credentials(&self) -> bool {
        !self.smtp_username.trim().is_empty() && !self.smtp_password.is_empty()
    }
}

fn default_email_provider() -> String {
    "smtp".to_string()
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_sender_name() -> String {
    "Report Assistant".to_string()
}

fn default_send_timeout() -> u64 {
    20
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with RA__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("RA").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// Builds the config from embedded defaults plus overrides, without
    /// touching config files or the environment. Validation is skipped.
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "127.0.0.1"
            port = 8080
            request_timeout_secs = 30
            max_body_size = 268435456

            [database]
            url = "sqlite::memory:"
            max_connections = 1
            min_connections = 1

            [logging]
            level = "info"
            format = "json"

            [security]
            cors_origins = []
            login_attempts_per_minute = 10

            [session]
            idle_timeout_secs = 28800

            [limits]
            max_evidence_files = 20

            [generation]
            api_key = "test-api-key"
            model = "gemini-1.5-flash"
            timeout_secs = 5

            [email]
            provider = "console"
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.database.url.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "RA__DATABASE__URL environment variable must be set".to_string(),
            ));
        }

        // Drafting is impossible without the generative service.
        if self.generation.api_key.trim().is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "RA__GENERATION__API_KEY environment variable must be set".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigValidationError::InvalidValue(
                "min_connections cannot exceed max_connections".to_string(),
            ));
        }

        if self.limits.max_evidence_files == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "max_evidence_files must be at least 1".to_string(),
            ));
        }

        if self.email.send_timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "email send_timeout_secs must be at least 1".to_string(),
            ));
        }

        if !matches!(self.email.provider.as_str(), "smtp" | "console") {
            return Err(ConfigValidationError::InvalidValue(format!(
                "Unknown email provider '{}'",
                self.email.provider
            )));
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }
}
