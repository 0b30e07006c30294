use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub storage: StorageConfig,
    pub reports: ReportsConfig,
    pub notifications: NotificationConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

/// Where the persisted user and session records live
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ReportsConfig {
    /// Seed the repository with the built-in sample reports
    pub seed_mock_reports: bool,
    /// Artificial delay applied before a submission is accepted
    pub submission_delay: Duration,
}

#[derive(Debug, Clone)]
pub struct NotificationConfig {
    /// Used when a toast is created without a duration (or with 0)
    pub default_duration: Duration,
    /// Duration of the status toast raised when a report is opened
    pub status_toast_duration: Duration,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            storage: StorageConfig::from_env()?,
            reports: ReportsConfig::from_env()?,
            notifications: NotificationConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 1024 * 1024; // 1MB

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_request_body_size = env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUEST_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_REQUEST_BODY_SIZE must be a valid number".to_string())?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl StorageConfig {
    pub fn from_env() -> Result<Self, String> {
        let data_dir = env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string());
        if data_dir.trim().is_empty() {
            return Err("DATA_DIR must not be empty".to_string());
        }

        Ok(Self {
            data_dir: PathBuf::from(data_dir),
        })
    }
}

impl ReportsConfig {
    const DEFAULT_SUBMISSION_DELAY_MS: u64 = 500;

    pub fn from_env() -> Result<Self, String> {
        let seed_mock_reports = env::var("SEED_MOCK_REPORTS")
            .unwrap_or_else(|_| "true".to_string())
            .parse::<bool>()
            .map_err(|_| "SEED_MOCK_REPORTS must be true or false".to_string())?;

        let submission_delay_ms = env::var("REPORT_SUBMISSION_DELAY_MS")
            .unwrap_or_else(|_| Self::DEFAULT_SUBMISSION_DELAY_MS.to_string())
            .parse::<u64>()
            .map_err(|_| "REPORT_SUBMISSION_DELAY_MS must be a valid number".to_string())?;

        Ok(Self {
            seed_mock_reports,
            submission_delay: Duration::from_millis(submission_delay_ms),
        })
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            default_duration: Duration::from_millis(Self::DEFAULT_DURATION_MS),
            status_toast_duration: Duration::from_millis(Self::DEFAULT_STATUS_DURATION_MS),
        }
    }
}

impl NotificationConfig {
    const DEFAULT_DURATION_MS: u64 = 5000;
    const DEFAULT_STATUS_DURATION_MS: u64 = 6000;

    pub fn from_env() -> Result<Self, String> {
        let default_ms = env::var("NOTIFICATION_DEFAULT_DURATION_MS")
            .unwrap_or_else(|_| Self::DEFAULT_DURATION_MS.to_string())
            .parse::<u64>()
            .map_err(|_| "NOTIFICATION_DEFAULT_DURATION_MS must be a valid number".to_string())?;

        if default_ms == 0 {
            return Err("NOTIFICATION_DEFAULT_DURATION_MS must be greater than 0".to_string());
        }

        let status_ms = env::var("NOTIFICATION_STATUS_DURATION_MS")
            .unwrap_or_else(|_| Self::DEFAULT_STATUS_DURATION_MS.to_string())
            .parse::<u64>()
            .map_err(|_| "NOTIFICATION_STATUS_DURATION_MS must be a valid number".to_string())?;

        Ok(Self {
            default_duration: Duration::from_millis(default_ms),
            status_toast_duration: Duration::from_millis(status_ms),
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title =
            env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Campus Outage API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "API documentation for the campus outage reporter".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}
