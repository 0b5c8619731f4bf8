use crate::model::UserId;

/// Identity of the logged-in user, cached by the gateway after login.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub email: String,
    pub id: UserId,
    pub access_token: String,
    pub is_authenticated: bool,
}

impl User {
    #[must_use]
    pub fn authenticated(email: impl Into<String>, id: UserId, access_token: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            id,
            access_token: access_token.into(),
            is_authenticated: true,
        }
    }
}

// The token stays out of logs.
impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("email", &self.email)
            .field("id", &self.id)
            .field("is_authenticated", &self.is_authenticated)
            .finish_non_exhaustive()
    }
}
