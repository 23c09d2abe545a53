//! Identity resolution from a configured token table.

use async_trait::async_trait;
use shared_types::identity::{AdminCaller, RoleSet};

use crate::domain::{AuthConfig, StaticUser};
use crate::ports::IdentityResolver;

/// Resolves bearer tokens against users loaded from configuration.
pub struct StaticTokenResolver {
    users: Vec<StaticUser>,
    privileged_group: String,
}

impl StaticTokenResolver {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            users: config.users.clone(),
            privileged_group: config.privileged_group.clone(),
        }
    }

    fn caller(&self, user: &StaticUser) -> AdminCaller {
        let groups: RoleSet = user.groups.iter().cloned().collect();
        AdminCaller {
            id: user.id.clone(),
            name: user.name.clone(),
            privileged: groups.contains(&self.privileged_group),
            groups,
        }
    }
}

#[async_trait]
impl IdentityResolver for StaticTokenResolver {
    async fn resolve(&self, token: &str) -> Option<AdminCaller> {
        // Compare against every entry so lookup time does not depend on
        // which user matched.
        let mut found = None;
        for user in &self.users {
            if constant_time_compare(token, &user.token) && found.is_none() {
                found = Some(self.caller(user));
            }
        }
        found
    }
}

/// Constant-time string comparison.
///
/// Shorter input is padded with a different byte so unequal lengths never
/// compare equal, and the length check itself is constant time.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    use subtle::ConstantTimeEq;

    let max_len = a.len().max(b.len());
    let mut a_padded = vec![0u8; max_len];
    let mut b_padded = vec![0xFFu8; max_len];
    a_padded[..a.len()].copy_from_slice(a.as_bytes());
    b_padded[..b.len()].copy_from_slice(b.as_bytes());

    let lengths_equal = a.len().ct_eq(&b.len());
    let contents_equal = a_padded.ct_eq(&b_padded);
    (lengths_equal & contents_equal).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AuthConfig {
        AuthConfig {
            privileged_group: "admin".into(),
            users: vec![
                StaticUser {
                    token: "root-token".into(),
                    id: "u-root".into(),
                    name: "Root".into(),
                    groups: vec!["admin".into()],
                },
                StaticUser {
                    token: "viewer-token".into(),
                    id: "u-viewer".into(),
                    name: "Viewer".into(),
                    groups: vec!["group1".into()],
                },
            ],
        }
    }

    #[tokio::test]
    async fn test_resolves_known_tokens() {
        let resolver = StaticTokenResolver::new(&config());

        let root = resolver.resolve("root-token").await.unwrap();
        assert!(root.privileged);
        assert_eq!(root.name, "Root");

        let viewer = resolver.resolve("viewer-token").await.unwrap();
        assert!(!viewer.privileged);
        assert!(viewer.groups.contains("group1"));
    }

    #[tokio::test]
    async fn test_unknown_token() {
        let resolver = StaticTokenResolver::new(&config());
        assert!(resolver.resolve("root-token-x").await.is_none());
        assert!(resolver.resolve("").await.is_none());
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc", "abc"));
        assert!(!constant_time_compare("abc", "abd"));
        assert!(!constant_time_compare("abc", "abcd"));
        assert!(!constant_time_compare("", "a"));
    }
}
