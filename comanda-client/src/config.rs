//! Client configuration

use std::path::PathBuf;
use std::time::Duration;

/// Order list auto-refresh period on the management view
pub const ORDER_REFRESH_INTERVAL_SECS: u64 = 10;
/// New-order notification check period
pub const NEW_ORDER_CHECK_INTERVAL_SECS: u64 = 5;
/// Delivery fee used until an override is stored
pub const DEFAULT_DELIVERY_PRICE: f64 = 3000.0;

/// Client configuration for connecting to the ordering API
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | COMANDA_API_URL | http://localhost:3000 | API base URL |
/// | COMANDA_TIMEOUT_SECS | 30 | Request timeout |
/// | COMANDA_DATA_DIR | ./comanda-data | Local state directory |
/// | COMANDA_ORDER_REFRESH_SECS | 10 | Order list refresh period |
/// | COMANDA_NEW_ORDER_CHECK_SECS | 5 | New-order check period |
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "https://pedidos.example.com"), fixed for the
    /// lifetime of the client
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Directory for local state (delivery price override)
    pub data_dir: PathBuf,

    /// Order list refresh period in seconds
    pub order_refresh_secs: u64,

    /// New-order check period in seconds
    pub new_order_check_secs: u64,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: 30,
            data_dir: PathBuf::from("./comanda-data"),
            order_refresh_secs: ORDER_REFRESH_INTERVAL_SECS,
            new_order_check_secs: NEW_ORDER_CHECK_INTERVAL_SECS,
        }
    }

    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("COMANDA_API_URL").unwrap_or(defaults.base_url),
            timeout: env_parse("COMANDA_TIMEOUT_SECS").unwrap_or(defaults.timeout),
            data_dir: std::env::var("COMANDA_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            order_refresh_secs: env_parse("COMANDA_ORDER_REFRESH_SECS")
                .unwrap_or(defaults.order_refresh_secs),
            new_order_check_secs: env_parse("COMANDA_NEW_ORDER_CHECK_SECS")
                .unwrap_or(defaults.new_order_check_secs),
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the local state directory
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Set both polling periods
    pub fn with_poll_intervals(mut self, order_refresh_secs: u64, new_order_check_secs: u64) -> Self {
        self.order_refresh_secs = order_refresh_secs;
        self.new_order_check_secs = new_order_check_secs;
        self
    }

    pub fn order_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.order_refresh_secs.max(1))
    }

    pub fn new_order_check_interval(&self) -> Duration {
        Duration::from_secs(self.new_order_check_secs.max(1))
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> crate::ClientResult<crate::HttpClient> {
        crate::HttpClient::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:3000")
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
