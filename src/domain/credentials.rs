use crate::utils::error::{MarketError, Result};

const SPECIAL_SYMBOLS: &str = "!@#$%^&*()_+-=";
const PASSWORD_MIN_LEN: usize = 8;
const PASSWORD_MAX_LEN: usize = 20;

/// Username/password pair as typed by the user. The username is lowercased
/// on creation; nothing is validated until one of the `check_*` methods is
/// called.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn create(username: &str, password: &str) -> Self {
        Self {
            username: username.to_lowercase(),
            password: password.to_string(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn check_username(&self) -> Result<()> {
        if self.username.is_empty() || !self.username.chars().all(char::is_alphanumeric) {
            return Err(MarketError::InvalidUsername);
        }
        Ok(())
    }

    pub fn check_password(&self) -> Result<()> {
        let length = self.password.chars().count();
        let length_correct = (PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&length);
        let all_in_alphabet = self
            .password
            .chars()
            .all(|c| c.is_alphanumeric() || SPECIAL_SYMBOLS.contains(c));

        if !(length_correct && all_in_alphabet) {
            return Err(MarketError::InvalidPassword);
        }
        Ok(())
    }

    pub fn check(&self) -> Result<()> {
        self.check_username()?;
        self.check_password()
    }
}

// Keeps the raw password out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}
