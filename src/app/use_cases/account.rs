use crate::core::{
    PasswordHasher, ProfileUpdate, Result, Session, User, UserId, UserProperty, UserRepository,
};
use crate::domain::credentials::Credentials;
use std::sync::Arc;

pub struct GetUser<U: UserRepository> {
    users: Arc<U>,
}

impl<U: UserRepository> GetUser<U> {
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    pub async fn execute(&self, user_id: UserId) -> Result<User> {
        self.users.get_user(user_id).await
    }
}

pub struct GetUserProperty<U: UserRepository> {
    users: Arc<U>,
}

impl<U: UserRepository> GetUserProperty<U> {
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    pub async fn execute(&self, user_id: UserId) -> Result<UserProperty> {
        self.users.get_property(user_id).await
    }
}

pub struct AddMoney<U: UserRepository> {
    users: Arc<U>,
}

impl<U: UserRepository> AddMoney<U> {
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    pub async fn execute(&self, session: &Session, amount: u64) -> Result<User> {
        let mut user = self.users.get_user(session.user_id).await?;
        user.deposit(amount)?;

        let stored = self.users.add_money(user.id, amount).await?;
        if stored != user {
            tracing::warn!(user_id = %user.id, "Balance changed while depositing");
        }

        tracing::info!(user_id = %stored.id, amount, balance = stored.balance, "Money deposited");
        Ok(stored)
    }
}

pub struct EditProfile<U: UserRepository, H: PasswordHasher> {
    users: Arc<U>,
    hasher: Arc<H>,
}

impl<U: UserRepository, H: PasswordHasher> EditProfile<U, H> {
    pub fn new(users: Arc<U>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }

    /// Empty `new_username` or `new_password` leaves that field unchanged.
    pub async fn execute(
        &self,
        session: &Session,
        new_username: &str,
        new_password: &str,
    ) -> Result<User> {
        let mut user = self.users.get_user(session.user_id).await?;
        let credentials = Credentials::create(new_username, new_password);

        let mut update = ProfileUpdate::default();
        if !new_username.is_empty() {
            credentials.check_username()?;
            update.username = Some(credentials.username().to_string());
        }
        if !new_password.is_empty() {
            credentials.check_password()?;
            update.password_hash = Some(self.hasher.hash(credentials.password()));
        }

        if update.is_empty() {
            return Ok(user);
        }

        if let Some(username) = &update.username {
            user.rename(username.as_str());
        }

        let stored = self.users.edit_profile(user.id, &update).await?;
        if stored != user {
            tracing::warn!(user_id = %user.id, "Profile changed while editing");
        }

        tracing::info!(
            user_id = %stored.id,
            renamed = update.username.is_some(),
            password_changed = update.password_hash.is_some(),
            "Profile updated"
        );
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::use_cases::auth::{Login, Register};
    use crate::app::use_cases::test_support::fixture;
    use crate::core::FlatId;
    use crate::domain::ports::MarketRepository;
    use crate::utils::error::MarketError;
    use async_trait::async_trait;

    #[tokio::test]
    async fn test_get_user_not_found() {
        let f = fixture();
        let err = GetUser::new(f.users.clone())
            .execute(UserId(99))
            .await
            .unwrap_err();
        assert!(matches!(err, MarketError::UserNotFound(UserId(99))));
    }

    #[tokio::test]
    async fn test_add_money_persists() {
        let f = fixture();
        let session = f.funded_session("alice", 0).await;

        let user = AddMoney::new(f.users.clone())
            .execute(&session, 250_000)
            .await
            .unwrap();
        assert_eq!(user.balance, 250_000);

        let user = AddMoney::new(f.users.clone())
            .execute(&session, 250_000)
            .await
            .unwrap();
        assert_eq!(user.balance, 500_000);

        let stored = GetUser::new(f.users.clone())
            .execute(session.user_id)
            .await
            .unwrap();
        assert_eq!(stored.balance, 500_000);
    }

    #[tokio::test]
    async fn test_add_money_overflow_is_not_persisted() {
        let f = fixture();
        let session = f.funded_session("alice", u64::MAX).await;

        let err = AddMoney::new(f.users.clone())
            .execute(&session, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, MarketError::BalanceOverflow(_)));
        assert_eq!(f.store.snapshot().await.users[0].balance, u64::MAX);
    }

    #[tokio::test]
    async fn test_get_user_property_lists_owned_flats() {
        let f = fixture();
        let session = f.funded_session("alice", 1_000_000).await;
        f.market.purchase_flat(session.user_id, FlatId(2)).await.unwrap();

        let property = GetUserProperty::new(f.users.clone())
            .execute(session.user_id)
            .await
            .unwrap();
        assert_eq!(property.user_id, session.user_id);
        assert_eq!(property.properties.len(), 1);
        assert_eq!(property.properties[0].id, FlatId(2));
        assert!(!property.properties[0].is_available);
    }

    #[tokio::test]
    async fn test_edit_profile_renames_and_changes_password() {
        let f = fixture();
        let user = Register::new(f.users.clone(), f.hasher.clone())
            .execute("alice", "ValidPass1!")
            .await
            .unwrap();
        let session = Session::new(user.id);

        let edited = EditProfile::new(f.users.clone(), f.hasher.clone())
            .execute(&session, "Alicia", "NewPass22#")
            .await
            .unwrap();
        assert_eq!(edited.username, "alicia");

        let login = Login::new(f.users.clone(), f.hasher.clone());
        assert!(login.execute("alice", "ValidPass1!").await.is_err());
        assert_eq!(
            login.execute("alicia", "NewPass22#").await.unwrap(),
            session
        );
    }

    #[tokio::test]
    async fn test_edit_profile_empty_fields_are_unchanged() {
        let f = fixture();
        let user = Register::new(f.users.clone(), f.hasher.clone())
            .execute("alice", "ValidPass1!")
            .await
            .unwrap();
        let session = Session::new(user.id);
        let edit = EditProfile::new(f.users.clone(), f.hasher.clone());

        let unchanged = edit.execute(&session, "", "").await.unwrap();
        assert_eq!(unchanged, user);

        let renamed = edit.execute(&session, "alice2", "").await.unwrap();
        assert_eq!(renamed.username, "alice2");
        let session_again = Login::new(f.users.clone(), f.hasher.clone())
            .execute("alice2", "ValidPass1!")
            .await
            .unwrap();
        assert_eq!(session_again, session);
    }

    #[tokio::test]
    async fn test_edit_profile_rejects_taken_and_invalid_values() {
        let f = fixture();
        let register = Register::new(f.users.clone(), f.hasher.clone());
        let alice = register.execute("alice", "ValidPass1!").await.unwrap();
        register.execute("bob", "ValidPass1!").await.unwrap();
        let session = Session::new(alice.id);
        let edit = EditProfile::new(f.users.clone(), f.hasher.clone());

        assert!(matches!(
            edit.execute(&session, "BOB", "").await,
            Err(MarketError::UsernameTaken(_))
        ));
        assert!(matches!(
            edit.execute(&session, "no spaces", "").await,
            Err(MarketError::InvalidUsername)
        ));
        assert!(matches!(
            edit.execute(&session, "", "short").await,
            Err(MarketError::InvalidPassword)
        ));
        // Keeping one's own name is not a conflict.
        assert!(edit.execute(&session, "Alice", "").await.is_ok());
    }

    /// A user store that predates balance and profile writes.
    struct ReadOnlyUsers;

    #[async_trait]
    impl UserRepository for ReadOnlyUsers {
        async fn register(&self, _username: &str, _password_hash: &str) -> Result<User> {
            Err(MarketError::NotImplemented("register"))
        }

        async fn login(&self, _username: &str, _password_hash: &str) -> Result<UserId> {
            Err(MarketError::InvalidCredentials)
        }

        async fn get_user(&self, user_id: UserId) -> Result<User> {
            Ok(User::new(user_id, "alice"))
        }

        async fn get_property(&self, user_id: UserId) -> Result<UserProperty> {
            Ok(UserProperty {
                user_id,
                properties: vec![],
            })
        }
    }

    #[tokio::test]
    async fn test_unsupported_writes_surface_as_not_implemented() {
        let users = Arc::new(ReadOnlyUsers);
        let f = fixture();
        let session = Session::new(UserId(1));

        assert!(matches!(
            AddMoney::new(users.clone()).execute(&session, 10).await,
            Err(MarketError::NotImplemented("add_money"))
        ));
        assert!(matches!(
            EditProfile::new(users, f.hasher.clone())
                .execute(&session, "bob", "")
                .await,
            Err(MarketError::NotImplemented("edit_profile"))
        ));
    }
}
