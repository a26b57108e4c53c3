use crate::domain::ports::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(EtlError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// A bare file name, written inside the output directory.
pub fn validate_file_name(field_name: &str, name: &str) -> Result<()> {
    validate_path(field_name, name)?;

    if name.contains('/') || name.contains('\\') {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: "Must be a file name, not a path".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Checks shared by every configuration source.
pub fn validate_settings<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validate_url("films_endpoint", config.films_endpoint())?;
    if config.publish_enabled() {
        validate_url("upload_endpoint", config.upload_endpoint())?;
        validate_non_empty_string("upload_field", config.upload_field())?;
    }

    validate_path("output_path", config.output_path())?;
    validate_file_name("artifact_name", config.artifact_name())?;
    if let Some(snapshot) = config.snapshot_name() {
        validate_file_name("snapshot_name", snapshot)?;
        if snapshot == config.artifact_name() {
            return Err(EtlError::InvalidConfigValueError {
                field: "snapshot_name".to_string(),
                value: snapshot.to_string(),
                reason: "Must differ from artifact_name".to_string(),
            });
        }
    }

    validate_positive_number("top_n", config.top_n(), 1)?;
    validate_positive_number("concurrent_requests", config.concurrent_requests(), 1)?;
    validate_range("timeout_seconds", config.timeout_seconds(), 1, 600)?;

    if let Some(fallback) = config.species_fallback() {
        validate_non_empty_string("species_fallback", fallback)?;
    }

    Ok(())
}
