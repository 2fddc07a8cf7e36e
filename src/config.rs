use std::env;
use std::fmt;
use url::Url;

const DEFAULT_TOKEN_SIZE: usize = 32;

/// Settings of the code-flow endpoints (authentication request, callback, logout).
#[derive(Clone, Debug)]
pub struct OidcSettings {
    pub authorization_endpoint: Url,
    pub client_id: String,
    /// Base used to absolutify the callback path.
    pub site_url: Url,
    pub state_size: usize,
    pub nonce_size: usize,
    pub use_nonce: bool,
    pub redirect_field_name: String,
    pub login_redirect_url: String,
    pub login_redirect_url_failure: String,
    pub logout_redirect_url: String,
}

impl OidcSettings {
    /// Required settings, everything else at its default.
    pub fn new(
        authorization_endpoint: &str,
        client_id: &str,
        site_url: &str,
    ) -> Result<Self, ConfigError> {
        if client_id.is_empty() {
            return Err(ConfigError::MissingClientId);
        }

        Ok(Self {
            authorization_endpoint: parse_url(
                "OIDC_OP_AUTHORIZATION_ENDPOINT",
                authorization_endpoint,
            )?,
            client_id: client_id.to_string(),
            site_url: parse_url("SITE_URL", site_url)?,
            state_size: DEFAULT_TOKEN_SIZE,
            nonce_size: DEFAULT_TOKEN_SIZE,
            use_nonce: true,
            redirect_field_name: "next".to_string(),
            login_redirect_url: "/".to_string(),
            login_redirect_url_failure: "/".to_string(),
            logout_redirect_url: "/".to_string(),
        })
    }
}

/// Settings of the simplified authorization endpoints. Kept apart from
/// [`OidcSettings`] so both variants can talk to different clients.
#[derive(Clone, Debug)]
pub struct AuthorizationSettings {
    pub authorization_endpoint: Url,
    pub client_id: String,
}

/// Identity provider settings used by the code-exchange backend.
#[derive(Clone)]
pub struct ProviderSettings {
    pub issuer_url: String,
    pub client_secret: String,
}

impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("issuer_url", &self.issuer_url)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionBackend {
    Memory,
    Sqlite,
}

#[derive(Clone, Debug)]
pub struct SessionSettings {
    pub cookie_name: String,
    pub duration_hours: i64,
    pub backend: SessionBackend,
    pub database_url: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            cookie_name: "sessionid".to_string(),
            duration_hours: 9,
            backend: SessionBackend::Memory,
            database_url: "sqlite://oidc_sessions.db?mode=rwc".to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub oidc: OidcSettings,
    pub authorization: Option<AuthorizationSettings>,
    pub provider: Option<ProviderSettings>,
    pub session: SessionSettings,
    pub server_host: String,
    pub server_port: u16,
    pub otel_exporter_endpoint: Option<String>,
    pub service_name: String,
    pub metrics_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let authorization_endpoint = lookup("OIDC_OP_AUTHORIZATION_ENDPOINT")
            .ok_or(ConfigError::MissingAuthorizationEndpoint)?;
        let client_id = lookup("OIDC_RP_CLIENT_ID").ok_or(ConfigError::MissingClientId)?;
        let site_url = lookup("SITE_URL").ok_or(ConfigError::MissingSiteUrl)?;

        let mut oidc = OidcSettings::new(&authorization_endpoint, &client_id, &site_url)?;
        if let Some(size) = lookup("OIDC_STATE_SIZE") {
            oidc.state_size = parse_size("OIDC_STATE_SIZE", &size)?;
        }
        if let Some(size) = lookup("OIDC_NONCE_SIZE") {
            oidc.nonce_size = parse_size("OIDC_NONCE_SIZE", &size)?;
        }
        if let Some(flag) = lookup("OIDC_USE_NONCE") {
            oidc.use_nonce = parse_bool("OIDC_USE_NONCE", &flag)?;
        }
        if let Some(name) = lookup("OIDC_REDIRECT_FIELD_NAME") {
            oidc.redirect_field_name = name;
        }
        if let Some(url) = lookup("LOGIN_REDIRECT_URL") {
            oidc.login_redirect_url = url;
        }
        if let Some(url) = lookup("LOGIN_REDIRECT_URL_FAILURE") {
            oidc.login_redirect_url_failure = url;
        }
        if let Some(url) = lookup("LOGOUT_REDIRECT_URL") {
            oidc.logout_redirect_url = url;
        }

        let authorization = match (
            lookup("OIDC_AUTHORIZATION_ENDPOINT"),
            lookup("OIDC_AUTHORIZATION_CLIENT_ID"),
        ) {
            (Some(endpoint), Some(client_id)) if !client_id.is_empty() => {
                Some(AuthorizationSettings {
                    authorization_endpoint: parse_url("OIDC_AUTHORIZATION_ENDPOINT", &endpoint)?,
                    client_id,
                })
            }
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteAuthorizationSettings),
        };

        let provider = match (lookup("OIDC_OP_ISSUER_URL"), lookup("OIDC_RP_CLIENT_SECRET")) {
            (Some(issuer_url), Some(client_secret)) => Some(ProviderSettings {
                issuer_url,
                client_secret,
            }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteProviderSettings),
        };

        let mut session = SessionSettings::default();
        if let Some(name) = lookup("SESSION_COOKIE_NAME") {
            session.cookie_name = name;
        }
        session.duration_hours = lookup("SESSION_DURATION_HOURS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(session.duration_hours);
        session.backend = match lookup("SESSION_BACKEND").as_deref() {
            None | Some("memory") => SessionBackend::Memory,
            Some("sqlite") => SessionBackend::Sqlite,
            Some(other) => return Err(ConfigError::UnknownSessionBackend(other.to_string())),
        };
        if let Some(url) = lookup("DATABASE_URL") {
            session.database_url = url;
        }

        let server_host = lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let server_port = lookup("SERVER_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let otel_exporter_endpoint = lookup("OTEL_EXPORTER_OTLP_ENDPOINT");

        let service_name = lookup("SERVICE_NAME").unwrap_or_else(|| "oidc-rp".to_string());

        let metrics_port = lookup("METRICS_PORT")
            .unwrap_or_else(|| "9000".to_string())
            .parse()
            .unwrap_or(9000);

        Ok(Config {
            oidc,
            authorization,
            provider,
            session,
            server_host,
            server_port,
            otel_exporter_endpoint,
            service_name,
            metrics_port,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_url(name: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidUrl(name, e.to_string()))
}

fn parse_size(name: &'static str, value: &str) -> Result<usize, ConfigError> {
    match value.parse::<usize>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(ConfigError::InvalidSize(name)),
    }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag(name)),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("OIDC_OP_AUTHORIZATION_ENDPOINT environment variable not set")]
    MissingAuthorizationEndpoint,

    #[error("OIDC_RP_CLIENT_ID environment variable not set")]
    MissingClientId,

    #[error("SITE_URL environment variable not set")]
    MissingSiteUrl,

    #[error("OIDC_AUTHORIZATION_ENDPOINT and OIDC_AUTHORIZATION_CLIENT_ID must be set together")]
    IncompleteAuthorizationSettings,

    #[error("OIDC_OP_ISSUER_URL and OIDC_RP_CLIENT_SECRET must be set together")]
    IncompleteProviderSettings,

    #[error("{0} is not a valid URL: {1}")]
    InvalidUrl(&'static str, String),

    #[error("{0} must be a positive integer")]
    InvalidSize(&'static str),

    #[error("{0} must be a boolean")]
    InvalidFlag(&'static str),

    #[error("Unknown session backend: {0}")]
    UnknownSessionBackend(String),

    #[error("Invalid port number")]
    InvalidPort,
}
