use serde::Deserialize;

const ENV_PREFIX: &str = "TASKS";
const CONFIG_FILE: &str = "config/config";

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    pub database: DatabaseConfig,
    /// Cache endpoint. Loaded for completeness, nothing reads it yet.
    #[serde(default)]
    pub redis: RedisConfig,
    /// Signing secret. Loaded for completeness, no route is authenticated.
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Deserialize, Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    #[serde(default = "default_database_port")]
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database_name: String,
}

impl DatabaseConfig {
    /// Connection URL understood by `sea_orm::Database::connect`.
    pub fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database_name
        )
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct RedisConfig {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct AuthConfig {
    #[serde(default)]
    pub secret: String,
}

impl Config {
    /// Loads configuration from `config/config.*` (optional) overlaid with
    /// `TASKS_`-prefixed environment variables, e.g. `TASKS_DATABASE__HOST`.
    pub fn load() -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: Config = settings.try_deserialize()?;
        Ok(config)
    }
}

fn default_port() -> u16 {
    8080
}

fn default_database_port() -> u16 {
    5432
}
