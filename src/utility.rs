use approx::assert_relative_eq;
use config::{Config, ConfigError, File, FileFormat};
use std::path::Path;

/// Get the configuation from the file.
///
/// # Parameters
/// * `filepath` - Path to the config file.
/// * `format` - Format of the config file.
///
/// # Returns
/// The configuration or the error if the file can not be read or parsed.
pub fn get_config(filepath: &Path, format: FileFormat) -> Result<Config, ConfigError> {
    Config::builder()
        .add_source(File::from(filepath).format(format).required(true))
        .build()
}

/// Get the optional string parameter from the configuration.
///
/// # Parameters
/// * `config` - Configuration.
/// * `key` - Key to find the parameter.
///
/// # Returns
/// The parameter. None if the key does not exist.
pub fn get_optional_string(config: &Config, key: &str) -> Result<Option<String>, ConfigError> {
    match config.get_string(key) {
        Ok(value) => Ok(Some(value.trim().to_string())),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(error) => Err(error),
    }
}

/// Assert that two vectors are equal within a relative tolerance.
///
/// # Parameters
/// * `v1` - First vector.
/// * `v2` - Second vector.
/// * `epsilon` - Relative tolerance.
///
/// # Panics
/// If the two vectors are not equal within the relative tolerance.
pub fn assert_relative_eq_vector(v1: &[f64], v2: &[f64], epsilon: f64) {
    assert_eq!(v1.len(), v2.len());
    for (a, b) in v1.iter().zip(v2.iter()) {
        assert_relative_eq!(a, b, epsilon = epsilon);
    }
}
