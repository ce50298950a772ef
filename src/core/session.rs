use crate::domain::model::UserId;
use serde::{Deserialize, Serialize};

/// The signed-in user. Handed to every use case that acts on behalf of the
/// current user instead of being kept as global state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
}

impl Session {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}
