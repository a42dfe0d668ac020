use std::fmt;

/// Ordinary authenticated user, reconstructed from a verified access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessIdentity {
    pub login: String,
    pub email: String,
    pub role: String,
}

/// Elevated identity, reconstructed from a verified admin token.
///
/// Carries no email or role: once a caller holds an admin token the role
/// check has already happened at issuance time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    pub login: String,
}

/// Caller identity established by the authentication middleware and attached
/// to the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Access(AccessIdentity),
    Admin(AdminIdentity),
}

impl Identity {
    /// Display name of the caller, used to annotate request logs.
    pub fn login(&self) -> &str {
        match self {
            Identity::Access(identity) => &identity.login,
            Identity::Admin(identity) => &identity.login,
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.login())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_for_both_variants() {
        let access = Identity::Access(AccessIdentity {
            login: "alice".to_string(),
            email: "a@x.com".to_string(),
            role: "user".to_string(),
        });
        let admin = Identity::Admin(AdminIdentity {
            login: "bob".to_string(),
        });

        assert_eq!(access.login(), "alice");
        assert_eq!(admin.login(), "bob");
        assert_eq!(admin.to_string(), "bob");
    }
}
