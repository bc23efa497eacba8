use serde::Deserialize;
use tracing::warn;

use super::policy::Role;

/// One entry of the static user list.
#[derive(Clone, Deserialize)]
pub struct UserRecord {
    pub login: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

/// Parses the `AUTH_USERS` JSON array. Anything unreadable means no users.
pub fn parse_users(raw: &str) -> Vec<UserRecord> {
    match serde_json::from_str::<Vec<UserRecord>>(raw) {
        Ok(users) => users,
        Err(e) => {
            warn!(error = %e, "AUTH_USERS is not a valid user list");
            Vec::new()
        }
    }
}

/// Equal-length comparison that does not stop at the first mismatch.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Looks up `login` and checks `password`. `None` on any mismatch.
pub fn authenticate<'a>(users: &'a [UserRecord], login: &str, password: &str) -> Option<&'a UserRecord> {
    users
        .iter()
        .find(|u| u.login == login)
        .filter(|u| constant_time_eq(&u.password, password))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_users_and_defaults_role() {
        let users = parse_users(r#"[{"login":"ann","password":"pw","role":"admin"},{"login":"bob","password":"x"}]"#);
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].role, Role::Admin);
        assert_eq!(users[1].role, Role::Viewer);
    }

    #[test]
    fn invalid_json_means_no_users() {
        assert!(parse_users("not json").is_empty());
        assert!(parse_users(r#"{"login":"ann"}"#).is_empty());
    }

    #[test]
    fn authenticate_checks_password() {
        let users = parse_users(r#"[{"login":"ann","password":"secret","role":"manager"}]"#);
        assert!(authenticate(&users, "ann", "secret").is_some());
        assert!(authenticate(&users, "ann", "secreT").is_none());
        assert!(authenticate(&users, "ann", "secret2").is_none());
        assert!(authenticate(&users, "bob", "secret").is_none());
    }
}
