use std::path::Path;

use crate::app::error::AppError;

const ADB_ENV: &str = "ADB";

pub fn normalize_command_path(value: &str) -> String {
    let trimmed = value.trim();
    if let Some(inner) = trimmed
        .strip_prefix('"')
        .and_then(|candidate| candidate.strip_suffix('"'))
    {
        return inner.trim().to_string();
    }
    if let Some(inner) = trimmed
        .strip_prefix('\'')
        .and_then(|candidate| candidate.strip_suffix('\''))
    {
        return inner.trim().to_string();
    }
    trimmed.to_string()
}

/// Configured path wins, then the ADB environment variable common in
/// Android lab scripts, then plain `adb` from PATH.
pub fn resolve_adb_program(config_command_path: &str) -> String {
    let env_override = std::env::var(ADB_ENV).ok();
    resolve_from(config_command_path, env_override.as_deref())
}

fn resolve_from(config_command_path: &str, env_override: Option<&str>) -> String {
    let configured = normalize_command_path(config_command_path);
    if !configured.is_empty() {
        return configured;
    }
    if let Some(candidate) = env_override.map(normalize_command_path) {
        if !candidate.is_empty() {
            return candidate;
        }
    }
    "adb".to_string()
}

pub fn validate_adb_program(program: &str, trace_id: &str) -> Result<(), AppError> {
    if program.trim().is_empty() {
        return Err(AppError::validation("ADB command is empty", trace_id));
    }
    if program == "adb" {
        return Ok(());
    }
    let path = Path::new(program);
    if path.is_dir() {
        return Err(AppError::validation(
            "ADB path must point to an executable file",
            trace_id,
        ));
    }
    if !path.exists() {
        return Err(AppError::dependency(
            "ADB executable not found at the configured path",
            trace_id,
        ));
    }
    Ok(())
}
