use crate::error::{ApiError, Result};

/// Identity of the signed-in user, passed explicitly to every backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    user_id: String,
}

impl Session {
    pub fn new(token: impl Into<String>, user_id: impl Into<String>) -> Result<Session> {
        let token = token.into().trim().to_string();
        let user_id = user_id.into().trim().to_string();
        if token.is_empty() || user_id.is_empty() {
            return Err(ApiError::MissingSession);
        }
        Ok(Session { token, user_id })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}
