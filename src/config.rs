use std::env;

use crate::{error::{Result, SetupError}, report::ReportFormat, schema::DEFAULT_DB_NAME};

#[derive(Debug, Clone)]
pub struct Settings {
    pub mongodb_uri: String,
    pub mongodb_db: String,

    pub dry_run: bool,
    pub report_format: ReportFormat,
}

pub fn load() -> Result<Settings> {
    // Loads .env if present (no crash if missing)
    dotenvy::dotenv().ok();

    let mongodb_uri = env::var("MONGODB_URI")
        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

    let mongodb_db = env::var("MONGODB_DB")
        .unwrap_or_else(|_| DEFAULT_DB_NAME.to_string());

    let dry_run = match env::var("SCHEMA_DRY_RUN") {
        Ok(v) => parse_bool("SCHEMA_DRY_RUN", &v)?,
        Err(_) => false,
    };

    let report_format = match env::var("SCHEMA_REPORT_FORMAT") {
        Ok(v) => v.parse()?,
        Err(_) => ReportFormat::default(),
    };

    Ok(Settings {
        mongodb_uri,
        mongodb_db,
        dry_run,
        report_format,
    })
}

fn parse_bool(var: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(SetupError::Config(format!("{var}: expected a boolean, got {other:?}"))),
    }
}
