use serde::Deserialize;
use wl_srs::SchedulerPolicy;

/// Deployment environment
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
    pub environment: Environment,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,
    /// Streak length at which a word counts as mastered
    #[serde(default = "default_mastery_threshold")]
    pub mastery_threshold: i32,
    /// Width of the rolling "studied today" window
    #[serde(default = "default_today_window_hours")]
    pub today_window_hours: i64,
    /// Ceiling for review intervals
    #[serde(default = "default_max_interval_days")]
    pub max_interval_days: i64,
    /// How many times a lost optimistic write is retried before giving up
    #[serde(default = "default_write_retries")]
    pub write_retries: u32,
}

fn default_port() -> u16 {
    3000
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:8080".to_string()]
}

fn default_db_max_connections() -> u32 {
    10
}

fn default_mastery_threshold() -> i32 {
    wl_srs::policy::DEFAULT_MASTERY_THRESHOLD
}

fn default_today_window_hours() -> i64 {
    wl_srs::policy::DEFAULT_TODAY_WINDOW_HOURS
}

fn default_max_interval_days() -> i64 {
    wl_srs::policy::DEFAULT_MAX_INTERVAL_DAYS
}

fn default_write_retries() -> u32 {
    5
}

impl ApiConfig {
    /// Load configuration from the process environment, reading `.env` first if present.
    ///
    /// Variable names are the upper-case field names, e.g. `DATABASE_URL`, `JWT_SECRET`,
    /// `ALLOWED_ORIGINS=http://a,http://b`.
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Same as [`from_env`](Self::from_env) but from explicit key/value pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars)
    }

    pub fn scheduler_policy(&self) -> SchedulerPolicy {
        SchedulerPolicy::new(
            self.mastery_threshold,
            self.today_window_hours,
            self.max_interval_days,
        )
    }
}
