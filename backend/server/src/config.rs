use std::{env, fmt::Display, fs::read_to_string, str::FromStr};

use anyhow::{Context, Result, anyhow};
use records::models::GradeColumns;
use tracing::{info, warn};

const DEFAULT_ORIGINS: &str = "https://luisbastosgit.github.io";

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub spreadsheet_id: String,
    pub student_sheet: String,
    pub login_sheet: String,
    pub allowed_origins: Vec<String>,
    pub token_ttl_hours: i64,
    pub upstream_timeout_secs: u64,
    pub jwt_secret: String,
    pub google_credentials: String,
    pub grade_columns: GradeColumns,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            spreadsheet_id: String::new(),
            student_sheet: "Página1".to_string(),
            login_sheet: "Login".to_string(),
            allowed_origins: split_origins(DEFAULT_ORIGINS),
            token_ttl_hours: 8,
            upstream_timeout_secs: 10,
            jwt_secret: String::new(),
            google_credentials: String::new(),
            grade_columns: GradeColumns::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            port: try_load("RUST_PORT", defaults.port)?,
            spreadsheet_id: var("SPREADSHEET_ID")
                .map_err(|_| anyhow!("SPREADSHEET_ID must be set"))?,
            student_sheet: try_load("STUDENT_SHEET", defaults.student_sheet)?,
            login_sheet: try_load("LOGIN_SHEET", defaults.login_sheet)?,
            allowed_origins: split_origins(&try_load(
                "ALLOWED_ORIGINS",
                DEFAULT_ORIGINS.to_string(),
            )?),
            token_ttl_hours: try_load("TOKEN_TTL_HOURS", defaults.token_ttl_hours)?,
            upstream_timeout_secs: try_load(
                "UPSTREAM_TIMEOUT_SECS",
                defaults.upstream_timeout_secs,
            )?,
            jwt_secret: read_secret("JWT_SECRET")?,
            google_credentials: read_secret("GOOGLE_CREDENTIALS")?,
            grade_columns: defaults.grade_columns,
        })
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found");
    })
}

fn try_load<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match var(key) {
        Ok(raw) => raw.parse().map_err(|e| {
            warn!("Invalid {key} value: {e}");
            anyhow!("Environment misconfigured: {key}")
        }),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

/// Docker secret first, then an environment variable of the same name.
fn read_secret(secret_name: &str) -> Result<String> {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .or_else(|e| {
            warn!("Failed to read {secret_name} from file: {e}");
            var(secret_name)
        })
        .map_err(|_| anyhow!("Secret {secret_name} not found"))
        .context("Secrets misconfigured!")
}
