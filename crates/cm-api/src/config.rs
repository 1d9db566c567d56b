use serde::Deserialize;

/// Deployment environment, selects logging format and security headers
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ApiConfig {
    pub database_url: String,
    pub jwt_secret: String,
    #[serde(default)]
    pub env: Environment,
    /// Comma separated list of origins allowed by CORS
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: String,
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,
    #[serde(default = "default_port")]
    pub port: u16,
    /// How many times a completion upsert is retried after losing a uniqueness race
    #[serde(default = "default_conflict_retries")]
    pub conflict_retries: u32,
}

fn default_allowed_origins() -> String {
    "http://localhost:5173".to_string()
}

const fn default_db_max_connections() -> u32 {
    10
}

const fn default_port() -> u16 {
    3000
}

const fn default_conflict_retries() -> u32 {
    1
}

impl ApiConfig {
    /// Load the configuration from the process environment (after `.env`, if any).
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Build the configuration from an explicit list of variables.
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars)
    }

    pub fn parsed_allowed_origins(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }
}
