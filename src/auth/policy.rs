use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Viewer,
    Manager,
    Admin,
}

impl Role {
    pub fn rank(&self) -> u8 {
        match self {
            Role::Viewer => 1,
            Role::Manager => 2,
            Role::Admin => 3,
        }
    }

    pub fn satisfies(&self, required: Role) -> bool {
        self.rank() >= required.rank()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Viewer => "viewer",
            Role::Manager => "manager",
            Role::Admin => "admin",
        }
    }
}

/// Unknown role names fall back to the least privileged role.
impl From<&str> for Role {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Role::Admin,
            "manager" => Role::Manager,
            _ => Role::Viewer,
        }
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Role::from(raw.as_str()))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    AtLeast(Role),
}

/// Ordered prefix rules; the first prefix that matches decides.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    rules: Vec<(String, Access)>,
}

impl AccessPolicy {
    pub fn new(rules: Vec<(String, Access)>) -> Self {
        Self { rules }
    }

    /// Paths matching no rule are public.
    pub fn required_access(&self, path: &str) -> Access {
        self.rules
            .iter()
            .find(|(prefix, _)| path.starts_with(prefix.as_str()))
            .map(|(_, access)| *access)
            .unwrap_or(Access::Public)
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        use Access::{AtLeast, Public};

        let rules = [
            ("/api/auth/", Public),
            ("/api/months", AtLeast(Role::Viewer)),
            ("/api/dashboard", AtLeast(Role::Viewer)),
            ("/api/reports_list", AtLeast(Role::Viewer)),
            ("/api/report_get", AtLeast(Role::Viewer)),
            ("/api/ping", AtLeast(Role::Viewer)),
            // Everything else under /api/report*, including generation
            ("/api/report", AtLeast(Role::Manager)),
            ("/api/import", AtLeast(Role::Admin)),
            ("/api/sync", AtLeast(Role::Admin)),
            ("/api/", AtLeast(Role::Viewer)),
        ];

        Self::new(rules.into_iter().map(|(p, a)| (p.to_string(), a)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_ranks() {
        assert!(Role::Admin.satisfies(Role::Manager));
        assert!(Role::Manager.satisfies(Role::Manager));
        assert!(!Role::Viewer.satisfies(Role::Manager));
        assert_eq!(Role::from("ADMIN"), Role::Admin);
        assert_eq!(Role::from("owner"), Role::Viewer);
    }

    #[test]
    fn first_matching_prefix_wins() {
        let policy = AccessPolicy::default();
        assert_eq!(policy.required_access("/api/reports_list"), Access::AtLeast(Role::Viewer));
        assert_eq!(policy.required_access("/api/report_get"), Access::AtLeast(Role::Viewer));
        assert_eq!(policy.required_access("/api/report"), Access::AtLeast(Role::Manager));
        assert_eq!(policy.required_access("/api/report_by_id"), Access::AtLeast(Role::Manager));
        assert_eq!(policy.required_access("/api/import"), Access::AtLeast(Role::Admin));
        assert_eq!(policy.required_access("/api/sync_ping"), Access::AtLeast(Role::Admin));
        assert_eq!(policy.required_access("/api/anything"), Access::AtLeast(Role::Viewer));
    }

    #[test]
    fn login_and_health_are_public() {
        let policy = AccessPolicy::default();
        assert_eq!(policy.required_access("/api/auth/login"), Access::Public);
        assert_eq!(policy.required_access("/health"), Access::Public);
    }

    #[test]
    fn custom_tables_are_honoured() {
        let policy = AccessPolicy::new(vec![("/admin".to_string(), Access::AtLeast(Role::Admin))]);
        assert_eq!(policy.required_access("/admin/users"), Access::AtLeast(Role::Admin));
        assert_eq!(policy.required_access("/api/months"), Access::Public);
    }
}
