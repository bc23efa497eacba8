pub mod middleware;
pub mod policy;
pub mod token;
pub mod users;

pub use middleware::{SESSION_COOKIE, require_session};
pub use policy::{Access, AccessPolicy, Role};
pub use token::{SessionClaims, SessionKeys};
pub use users::UserRecord;

use crate::config::AuthConfig;

/// Everything the login handler and the session middleware share.
#[derive(Clone)]
pub struct AuthService {
    pub keys: SessionKeys,
    pub users: Vec<UserRecord>,
    pub policy: AccessPolicy,
    pub cookie_secure: bool,
}

impl AuthService {
    pub fn new(secret: &str, users: Vec<UserRecord>, cookie_secure: bool) -> Self {
        Self {
            keys: SessionKeys::new(secret),
            users,
            policy: AccessPolicy::default(),
            cookie_secure,
        }
    }

    /// `None` when no signing secret is configured.
    pub fn from_config(config: &AuthConfig) -> Option<Self> {
        config
            .secret
            .as_deref()
            .map(|secret| Self::new(secret, config.users.clone(), config.cookie_secure))
    }

    pub fn authenticate(&self, login: &str, password: &str) -> Option<&UserRecord> {
        users::authenticate(&self.users, login, password)
    }
}
