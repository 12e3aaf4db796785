use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Configuration {
    #[serde(default)]
    pub server: ServerConfiguration,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfiguration {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_token_ttl")]
    pub token_ttl_seconds: u64,
}

impl Default for ServerConfiguration {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            token_ttl_seconds: default_token_ttl(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

// 15 days
fn default_token_ttl() -> u64 {
    15 * 24 * 3600
}

impl Configuration {
    pub fn new() -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        if std::path::Path::new("dev-server.toml").exists() {
            builder = builder.add_source(config::File::with_name("dev-server"));
        }

        builder =
            builder.add_source(config::Environment::with_prefix("COINVERSE_DEV").separator("__"));

        builder.build()?.try_deserialize()
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
