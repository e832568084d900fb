//! Actor Identity
//!
//! The identity/role context of the party requesting a translation view
//! or edit. Supplied by the authentication layer and treated as untrusted:
//! every field is optional and checked before use.

use serde::{Deserialize, Serialize};

/// Roles an actor may carry
///
/// A closed set; unrecognized role strings fail deserialization instead
/// of minting new roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full administrative access
    Admin,
    /// Content editing across locales
    Editor,
    /// Locale-scoped translation editing
    Translator,
    /// Approval workflow participant
    Reviewer,
}

impl Role {
    /// Stable label for logging and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Editor => "editor",
            Role::Translator => "translator",
            Role::Reviewer => "reviewer",
        }
    }
}

/// The requesting party
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Actor {
    /// Opaque identifier; absent for anonymous requests
    pub id: Option<String>,

    /// Granted role, if any
    pub role: Option<Role>,

    /// Locales a translator may edit; only meaningful for translators
    pub assigned_locales: Option<Vec<String>>,
}

impl Actor {
    /// An unauthenticated actor
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// An authenticated actor with a role
    pub fn with_role(id: &str, role: Role) -> Self {
        Self {
            id: Some(id.to_string()),
            role: Some(role),
            assigned_locales: None,
        }
    }

    /// A translator scoped to the given locales
    pub fn translator<I, S>(id: &str, locales: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: Some(id.to_string()),
            role: Some(Role::Translator),
            assigned_locales: Some(locales.into_iter().map(Into::into).collect()),
        }
    }

    /// Whether the actor carries a usable identity
    pub fn is_authenticated(&self) -> bool {
        matches!(self.id.as_deref(), Some(id) if !id.is_empty())
    }

    /// Whether the actor holds the given role
    pub fn has_role(&self, role: Role) -> bool {
        self.role == Some(role)
    }

    /// Identifier safe to place in audit logs
    ///
    /// Control characters are stripped and the id truncated; anonymous
    /// actors log as a fixed marker.
    pub fn audit_id(&self) -> String {
        match self.id.as_deref() {
            Some(id) if !id.is_empty() => {
                id.chars().filter(|c| !c.is_control()).take(64).collect()
            }
            _ => "anonymous".to_string(),
        }
    }
}
