//! Policy Configuration
//!
//! The per-resource rules governing who may view or edit translations.
//! A resource may declare no policy at all, declare a policy block with
//! absent kinds, or configure each kind explicitly; the engine gives the
//! three states different defaults.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::actor::Role;

/// The configured rule type for one action category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PolicyKind {
    /// Anyone, including anonymous actors
    Public,

    /// Any actor with a present, non-empty id
    Authenticated,

    /// Actors holding one of the listed roles
    Roles {
        /// Permitted roles
        roles: Vec<Role>,
    },

    /// Per-locale role lists; locales absent from the map are
    /// unrestricted
    LocaleRoles {
        /// Locale to permitted roles
        locales: HashMap<String, Vec<Role>>,
    },

    /// Translators restricted to their assigned locales
    TranslatorScoped,

    /// Defer to a registered decision module
    Custom {
        /// Name of the registered decider
        module: String,
    },
}

/// Approval workflow configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalConfig {
    /// Roles allowed to approve or reject submissions
    pub approvers: Vec<Role>,
}

/// Per-resource policy block
///
/// `None` for a kind means the resource declared the block but left that
/// action unconfigured, which denies. A resource with no block at all is
/// represented by passing `None` to the engine, which falls back to
/// permissive defaults for view and edit only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Rule for view actions
    pub view: Option<PolicyKind>,

    /// Rule for edit actions
    pub edit: Option<PolicyKind>,

    /// Approval workflow rules
    pub approval: Option<ApprovalConfig>,
}

impl PolicyConfig {
    /// An empty block: every category unconfigured, every action denied
    pub fn new() -> Self {
        Self::default()
    }

    /// The defaults applied when a resource declares no policy block
    ///
    /// View is public, edit is restricted to admins, and approval stays
    /// unconfigured — approval never has a permissive fallback.
    pub fn permissive_defaults() -> Self {
        Self {
            view: Some(PolicyKind::Public),
            edit: Some(PolicyKind::Roles {
                roles: vec![Role::Admin],
            }),
            approval: None,
        }
    }

    /// Set the view rule
    pub fn with_view(mut self, kind: PolicyKind) -> Self {
        self.view = Some(kind);
        self
    }

    /// Set the edit rule
    pub fn with_edit(mut self, kind: PolicyKind) -> Self {
        self.edit = Some(kind);
        self
    }

    /// Set the approver roles
    pub fn with_approvers(mut self, approvers: Vec<Role>) -> Self {
        self.approval = Some(ApprovalConfig { approvers });
        self
    }
}
