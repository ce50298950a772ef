use crate::core::{PasswordHasher, Result, Session, User, UserRepository};
use crate::domain::credentials::Credentials;
use std::sync::Arc;

pub struct Register<U: UserRepository, H: PasswordHasher> {
    users: Arc<U>,
    hasher: Arc<H>,
}

impl<U: UserRepository, H: PasswordHasher> Register<U, H> {
    pub fn new(users: Arc<U>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }

    pub async fn execute(&self, username: &str, password: &str) -> Result<User> {
        let credentials = Credentials::create(username, password);
        credentials.check()?;

        let password_hash = self.hasher.hash(credentials.password());
        let user = self
            .users
            .register(credentials.username(), &password_hash)
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user)
    }
}

pub struct Login<U: UserRepository, H: PasswordHasher> {
    users: Arc<U>,
    hasher: Arc<H>,
}

impl<U: UserRepository, H: PasswordHasher> Login<U, H> {
    pub fn new(users: Arc<U>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }

    pub async fn execute(&self, username: &str, password: &str) -> Result<Session> {
        let credentials = Credentials::create(username, password);

        let password_hash = self.hasher.hash(credentials.password());
        let user_id = self
            .users
            .login(credentials.username(), &password_hash)
            .await?;

        tracing::info!(user_id = %user_id, "User logged in");
        Ok(Session::new(user_id))
    }
}
