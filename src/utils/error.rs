use crate::domain::model::{FlatId, UserId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarketError {
    #[error("Username '{0}' is already taken")]
    UsernameTaken(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found. ID: {0}")]
    UserNotFound(UserId),

    #[error("Flat is already sold. ID: {0}")]
    ItemAlreadySold(FlatId),

    #[error("Flat not found. ID: {0}")]
    FlatNotFound(FlatId),

    #[error("User {user_id} is not the owner of flat {flat_id}")]
    NotAnOwnerError { user_id: UserId, flat_id: FlatId },

    #[error("Not enough money on the balance: {balance} < {price}")]
    NotEnoughMoney { balance: u64, price: u64 },

    #[error("Invalid username")]
    InvalidUsername,

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Balance overflow for user {0}")]
    BalanceOverflow(UserId),

    #[error("Operation is not implemented by this repository: {0}")]
    NotImplemented(&'static str),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Validation error in '{field}': {reason}")]
    ValidationError { field: String, reason: String },
}

impl MarketError {
    /// True for conditions raised by marketplace rules rather than by the
    /// storage or configuration layers.
    pub fn is_business_rule(&self) -> bool {
        !matches!(
            self,
            MarketError::CsvError(_)
                | MarketError::IoError(_)
                | MarketError::SerializationError(_)
                | MarketError::ConfigError { .. }
                | MarketError::NotImplemented(_)
        )
    }

    /// Message suitable for showing to an end user. Infrastructure failures
    /// collapse into a generic notice.
    pub fn user_friendly_message(&self) -> String {
        match self {
            MarketError::UsernameTaken(_) => "This username is not available".to_string(),
            MarketError::InvalidCredentials => "Wrong username or password".to_string(),
            MarketError::UserNotFound(_) => "User account does not exist".to_string(),
            MarketError::ItemAlreadySold(_) => "This flat has already been sold".to_string(),
            MarketError::FlatNotFound(_) => "This flat does not exist".to_string(),
            MarketError::NotAnOwnerError { .. } => "You do not own this flat".to_string(),
            MarketError::NotEnoughMoney { .. } => {
                "Not enough money on the balance to buy this flat".to_string()
            }
            MarketError::InvalidUsername => {
                "Username may contain only letters and digits".to_string()
            }
            MarketError::InvalidPassword => {
                "Password must be 8 to 20 characters long and contain only letters, digits and !@#$%^&*()_+-=".to_string()
            }
            MarketError::BalanceOverflow(_) => "The balance cannot grow that large".to_string(),
            MarketError::ValidationError { field, reason } => format!("{}: {}", field, reason),
            _ => "An unexpected error occurred, please try again later".to_string(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_business_rule() {
            2
        } else {
            1
        }
    }
}

pub type Result<T> = std::result::Result<T, MarketError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_errors_have_specific_messages() {
        let err = MarketError::ItemAlreadySold(FlatId(3));
        assert!(err.is_business_rule());
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.user_friendly_message(), "This flat has already been sold");
    }

    #[test]
    fn test_infrastructure_errors_collapse_to_generic_notice() {
        let err = MarketError::IoError(std::io::Error::other("disk on fire"));
        assert!(!err.is_business_rule());
        assert_eq!(err.exit_code(), 1);
        assert!(err.user_friendly_message().contains("unexpected error"));
        assert!(!err.user_friendly_message().contains("disk on fire"));
    }

    #[test]
    fn test_display_keeps_identifiers() {
        let err = MarketError::NotAnOwnerError {
            user_id: UserId(1),
            flat_id: FlatId(9),
        };
        assert_eq!(err.to_string(), "User 1 is not the owner of flat 9");
    }
}
