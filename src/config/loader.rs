//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::InserterConfig;
use super::secret::secret_string;
use crate::domain::errors::InserterError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into InserterConfig
/// 4. Applies environment variable overrides (INSERTER_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`InserterError::Configuration`] if the file is missing or
/// unreadable, a referenced variable is unset, parsing fails, or
/// validation rejects the result.
///
/// # Examples
///
/// ```no_run
/// use inserter::config::loader::load_config;
///
/// let config = load_config("inserter.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<InserterConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(InserterError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        InserterError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: InserterConfig = toml::from_str(&contents)
        .map_err(|e| InserterError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        InserterError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    tracing::debug!(
        path = %path.display(),
        store_target = ?config.store_target,
        "Configuration loaded"
    );

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied through untouched. Every missing variable is
/// reported in a single error.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| InserterError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&cap[0], &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(InserterError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn parse_override<T: std::str::FromStr>(name: &str, value: &str) -> Option<T> {
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!(variable = name, value, "Ignoring unparsable override");
            None
        }
    }
}

/// Applies environment variable overrides using the INSERTER_* prefix
///
/// Names follow `INSERTER_<SECTION>_<KEY>`, e.g. `INSERTER_MONGODB_DATABASE_NAME`.
/// Backend overrides only apply when that backend's section is present.
fn apply_env_overrides(config: &mut InserterConfig) {
    if let Ok(val) = std::env::var("INSERTER_STORE_TARGET") {
        match val.to_ascii_lowercase().as_str() {
            "mongodb" => config.store_target = super::StoreTarget::MongoDB,
            "memory" => config.store_target = super::StoreTarget::Memory,
            _ => tracing::warn!(value = %val, "Ignoring unknown INSERTER_STORE_TARGET"),
        }
    }

    if let Ok(val) = std::env::var("INSERTER_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Some(ref mut mongo) = config.mongodb {
        if let Ok(val) = std::env::var("INSERTER_MONGODB_CONNECTION_STRING") {
            mongo.connection_string = secret_string(val);
        }
        if let Ok(val) = std::env::var("INSERTER_MONGODB_DATABASE_NAME") {
            mongo.database_name = val;
        }
        if let Ok(val) = std::env::var("INSERTER_MONGODB_APP_NAME") {
            mongo.app_name = val;
        }
        if let Ok(val) = std::env::var("INSERTER_MONGODB_CONNECT_TIMEOUT_SECONDS") {
            if let Some(secs) = parse_override("INSERTER_MONGODB_CONNECT_TIMEOUT_SECONDS", &val) {
                mongo.connect_timeout_seconds = secs;
            }
        }
        if let Ok(val) = std::env::var("INSERTER_MONGODB_SERVER_SELECTION_TIMEOUT_SECONDS") {
            if let Some(secs) =
                parse_override("INSERTER_MONGODB_SERVER_SELECTION_TIMEOUT_SECONDS", &val)
            {
                mongo.server_selection_timeout_seconds = secs;
            }
        }
    }

    if let Some(ref mut memory) = config.memory {
        if let Ok(val) = std::env::var("INSERTER_MEMORY_DATABASE_NAME") {
            memory.database_name = val;
        }
    }

    if let Ok(val) = std::env::var("INSERTER_LOGGING_LOCAL_ENABLED") {
        if let Some(enabled) = parse_override("INSERTER_LOGGING_LOCAL_ENABLED", &val) {
            config.logging.local_enabled = enabled;
        }
    }
    if let Ok(val) = std::env::var("INSERTER_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("INSERTER_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("INSERTER_LOADER_TEST_VAR", "mongodb://h:1");
        let input = "connection_string = \"${INSERTER_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result.trim_end(), "connection_string = \"mongodb://h:1\"");
        std::env::remove_var("INSERTER_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing_lists_all() {
        std::env::remove_var("INSERTER_MISSING_A");
        std::env::remove_var("INSERTER_MISSING_B");
        let input = "a = \"${INSERTER_MISSING_A}\"\nb = \"${INSERTER_MISSING_B}\"";
        let err = substitute_env_vars(input).unwrap_err().to_string();
        assert!(err.contains("INSERTER_MISSING_A"));
        assert!(err.contains("INSERTER_MISSING_B"));
    }

    #[test]
    fn test_substitute_skips_comments() {
        std::env::remove_var("INSERTER_COMMENTED_OUT");
        let input = "# key = \"${INSERTER_COMMENTED_OUT}\"\nstore_target = \"memory\"";
        let result = substitute_env_vars(input).unwrap();
        assert!(result.contains("${INSERTER_COMMENTED_OUT}"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent-inserter.toml");
        assert!(matches!(result, Err(InserterError::Configuration(_))));
    }

    #[test]
    fn test_load_config_memory() {
        let toml_content = r#"
store_target = "memory"

[application]
log_level = "debug"

[memory]
database_name = "scratch"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.store_target, crate::config::StoreTarget::Memory);
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.database_name(), "scratch");
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"store_target = [").unwrap();
        temp_file.flush().unwrap();

        let err = load_config(temp_file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse TOML"));
    }
}
