//! # Caller Identities
//!
//! Role tokens and the two kinds of caller this core sees: clients sending
//! transactions through a channel, and administrators using the REST surface.
//! Credential verification happens elsewhere; these types only carry the
//! resolved result.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A set of role / client tokens.
///
/// Used both as a channel allow-list and as a caller's resolved roles, so
/// authorization is a set intersection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleSet(BTreeSet<String>);

impl RoleSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, token: impl Into<String>) -> bool {
        self.0.insert(token.into())
    }

    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.0.contains(token)
    }

    /// True when at least one token is shared.
    #[must_use]
    pub fn intersects(&self, other: &RoleSet) -> bool {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.0.iter().any(|t| large.0.contains(t))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for RoleSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// A client whose credentials were verified by the identity resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientIdentity {
    pub client_id: String,
    pub roles: RoleSet,
}

impl ClientIdentity {
    pub fn new(client_id: impl Into<String>, roles: RoleSet) -> Self {
        Self {
            client_id: client_id.into(),
            roles,
        }
    }

    /// `roles ∪ {client_id}`, the tokens tested against a channel allow-list.
    #[must_use]
    pub fn tokens(&self) -> RoleSet {
        let mut tokens = self.roles.clone();
        tokens.insert(self.client_id.clone());
        tokens
    }
}

/// An authenticated user of the administrative surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminCaller {
    pub id: String,
    pub name: String,
    pub groups: RoleSet,
    /// Privileged callers see and mutate everything.
    pub privileged: bool,
}

impl AdminCaller {
    #[must_use]
    pub fn updated_by(&self) -> crate::entities::UpdatedBy {
        crate::entities::UpdatedBy::new(self.id.clone(), self.name.clone())
    }
}
