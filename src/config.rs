use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub inventory: InventoryConfig,
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Where uploaded videos live and how they are exposed over HTTP
#[derive(Debug, Clone, Deserialize)]
pub struct InventoryConfig {
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    #[serde(default = "default_served_prefix")]
    pub served_prefix: String,
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_web_root")]
    pub root: String,
}

/// Settings for the terminal polling client
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_single_flight")]
    pub single_flight: bool,
}

// Default values
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_upload_dir() -> String {
    "uploaded_videos".to_string()
}

fn default_served_prefix() -> String {
    "uploaded_videos".to_string()
}

fn default_extension() -> String {
    ".mp4".to_string()
}

fn default_queue_capacity() -> u32 {
    10
}

fn default_web_root() -> String {
    "web".to_string()
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_interval_ms() -> u64 {
    1000
}

fn default_single_flight() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            served_prefix: default_served_prefix(),
            extension: default_extension(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            root: default_web_root(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            interval_ms: default_interval_ms(),
            single_flight: default_single_flight(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            inventory: InventoryConfig::default(),
            web: WebConfig::default(),
            client: ClientConfig::default(),
        }
    }
}

impl InventoryConfig {
    /// URL path under which uploaded files are served, e.g. `/uploaded_videos`
    pub fn url_prefix(&self) -> String {
        format!("/{}", self.served_prefix)
    }
}

impl Config {
    /// Load configuration from file and environment variables
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load_path(path)?,
            None => Self::load_from_file()?,
        };
        config.apply_overrides(|key| env::var(key).ok());
        config.normalize();
        tracing::info!(
            "Inventory config: upload_dir={}, served_prefix={}, extension={}",
            config.inventory.upload_dir,
            config.inventory.served_prefix,
            config.inventory.extension
        );
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let mut config: Config = toml::from_str(content)?;
        config.normalize();
        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    fn load_path(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load configuration from the first config file found on the search path
    fn load_from_file() -> anyhow::Result<Self> {
        let config_paths = ["vidboard.toml", "config.toml", "data/vidboard.toml"];

        for path in config_paths {
            if Path::new(path).exists() {
                return Self::load_path(Path::new(path));
            }
        }

        tracing::info!("No configuration file found, using defaults");
        Ok(Config::default())
    }

    /// Apply overrides looked up by key
    /// Format: VB_CONF_<SECTION>_<KEY>
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server overrides
        if let Some(val) = lookup("VB_CONF_SERVER_HOST") {
            self.server.host = val;
        }
        if let Some(port) = lookup("VB_CONF_SERVER_PORT").and_then(|v| v.parse().ok()) {
            self.server.port = port;
        }

        // Inventory overrides
        if let Some(val) = lookup("VB_CONF_INVENTORY_UPLOAD_DIR") {
            self.inventory.upload_dir = val;
        }
        if let Some(val) = lookup("VB_CONF_INVENTORY_SERVED_PREFIX") {
            self.inventory.served_prefix = val;
        }
        if let Some(val) = lookup("VB_CONF_INVENTORY_EXTENSION") {
            if !val.trim().is_empty() {
                self.inventory.extension = val;
            }
        }
        if let Some(cap) = lookup("VB_CONF_INVENTORY_QUEUE_CAPACITY").and_then(|v| v.parse().ok()) {
            self.inventory.queue_capacity = cap;
        }

        // Web overrides
        if let Some(val) = lookup("VB_CONF_WEB_ROOT") {
            self.web.root = val;
        }

        // Client overrides
        if let Some(val) = lookup("VB_CONF_CLIENT_BASE_URL") {
            self.client.base_url = val;
        }
        if let Some(ms) = lookup("VB_CONF_CLIENT_INTERVAL_MS").and_then(|v| v.parse().ok()) {
            self.client.interval_ms = ms;
        }
        if let Some(v) = lookup("VB_CONF_CLIENT_SINGLE_FLIGHT").and_then(|v| v.parse().ok()) {
            self.client.single_flight = v;
        }
    }

    fn normalize(&mut self) {
        let prefix = self.inventory.served_prefix.trim().trim_matches('/');
        self.inventory.served_prefix = if prefix.is_empty() || prefix == "api" {
            default_served_prefix()
        } else {
            prefix.to_string()
        };
        if self.inventory.extension.trim().is_empty() {
            self.inventory.extension = default_extension();
        }
        self.client.base_url = self.client.base_url.trim_end_matches('/').to_string();
        if self.client.interval_ms == 0 {
            self.client.interval_ms = default_interval_ms();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_match_reference_layout() {
        let config = Config::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.inventory.url_prefix(), "/uploaded_videos");
        assert_eq!(config.inventory.extension, ".mp4");
        assert_eq!(config.client.interval_ms, 1000);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [server]
            port = 9000

            [inventory]
            served_prefix = "/media/"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.inventory.url_prefix(), "/media");
        assert_eq!(config.inventory.upload_dir, "uploaded_videos");
        assert_eq!(config.web.root, "web");
    }

    #[test]
    fn test_empty_prefix_falls_back() {
        let config = Config::from_toml_str("[inventory]\nserved_prefix = \"/\"\n").unwrap();
        assert_eq!(config.inventory.served_prefix, "uploaded_videos");
    }

    #[test]
    fn test_empty_extension_falls_back() {
        let config = Config::from_toml_str("[inventory]\nextension = \"  \"\n").unwrap();
        assert_eq!(config.inventory.extension, ".mp4");
    }

    #[tokio::test]
    async fn test_empty_extension_does_not_list_every_file() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"hi").unwrap();

        let mut config = Config::from_toml_str("[inventory]\nextension = \"\"\n").unwrap();
        config.inventory.upload_dir = dir.path().to_string_lossy().into_owned();

        let uploads = crate::storage::UploadDirectory::from_config(&config.inventory);
        assert!(uploads.list_names().await.unwrap().is_empty());
    }

    #[test]
    fn test_overrides_ignore_unparseable_values() {
        let vars: HashMap<&str, &str> = [
            ("VB_CONF_SERVER_PORT", "not-a-port"),
            ("VB_CONF_INVENTORY_UPLOAD_DIR", "/srv/videos"),
            ("VB_CONF_CLIENT_INTERVAL_MS", "250"),
            ("VB_CONF_CLIENT_SINGLE_FLIGHT", "false"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.inventory.upload_dir, "/srv/videos");
        assert_eq!(config.client.interval_ms, 250);
        assert!(!config.client.single_flight);
    }
}
