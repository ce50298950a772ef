use crate::utils::error::{MarketError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(MarketError::ValidationError {
            field: field_name.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(MarketError::ValidationError {
            field: field_name.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// A bare file name: no directory separators, so it always lands inside the
/// data directory.
pub fn validate_file_name(field_name: &str, name: &str) -> Result<()> {
    validate_path(field_name, name)?;

    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(MarketError::ValidationError {
            field: field_name.to_string(),
            reason: format!("'{}' must be a plain file name", name),
        });
    }

    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(MarketError::ValidationError {
            field: field_name.to_string(),
            reason: format!("'{}' is not one of: {}", value, allowed.join(", ")),
        });
    }
    Ok(())
}

pub fn validate_ordered<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    min: Option<T>,
    max: Option<T>,
) -> Result<()> {
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(MarketError::ValidationError {
                field: field_name.to_string(),
                reason: format!("Lower bound {} is greater than upper bound {}", min, max),
            });
        }
    }
    Ok(())
}
