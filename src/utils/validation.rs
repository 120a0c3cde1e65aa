use crate::utils::error::{AdvisorError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(AdvisorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(AdvisorError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(AdvisorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AdvisorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(AdvisorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
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
    // NaN 與任何值比較皆為 false，需明確排除
    if !(value >= min && value <= max) {
        return Err(AdvisorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// 引擎前置條件：數值必須有限
pub fn require_finite(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(AdvisorError::validation(format!(
            "{} must be a finite number, got {}",
            field_name, value
        )));
    }
    Ok(())
}

pub fn require_non_negative(field_name: &str, value: f64) -> Result<()> {
    require_finite(field_name, value)?;
    if value < 0.0 {
        return Err(AdvisorError::validation(format!(
            "{} cannot be negative, got {}",
            field_name, value
        )));
    }
    Ok(())
}

pub fn require_positive(field_name: &str, value: f64) -> Result<()> {
    require_finite(field_name, value)?;
    if value <= 0.0 {
        return Err(AdvisorError::validation(format!(
            "{} must be greater than 0, got {}",
            field_name, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("llm.endpoint", "https://example.com").is_ok());
        assert!(validate_url("llm.endpoint", "http://localhost:8080/v1").is_ok());
        assert!(validate_url("llm.endpoint", "").is_err());
        assert!(validate_url("llm.endpoint", "invalid-url").is_err());
        assert!(validate_url("llm.endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("weight_kg", 70.0, 40.0, 150.0).is_ok());
        assert!(validate_range("weight_kg", 40.0, 40.0, 150.0).is_ok());
        assert!(validate_range("weight_kg", 150.0, 40.0, 150.0).is_ok());
        assert!(validate_range("weight_kg", 39.9, 40.0, 150.0).is_err());
        assert!(validate_range("weight_kg", f64::NAN, 40.0, 150.0).is_err());
    }

    #[test]
    fn test_require_positive() {
        assert!(require_positive("weight_kg", 0.1).is_ok());
        assert!(require_positive("weight_kg", 0.0).is_err());
        assert!(require_positive("weight_kg", -3.0).is_err());
        assert!(require_positive("weight_kg", f64::INFINITY).is_err());
    }

    #[test]
    fn test_require_non_negative() {
        assert!(require_non_negative("hours_elapsed", 0.0).is_ok());
        assert!(require_non_negative("hours_elapsed", -0.5).is_err());
        assert!(require_non_negative("hours_elapsed", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("llm.timeout_seconds", 30, 1).is_ok());
        assert!(validate_positive_number("llm.timeout_seconds", 0, 1).is_err());
    }
}
