//! Action Context
//!
//! What the actor is attempting: the action category, the target resource
//! type, and the arguments relevant to the decision (notably `locale` for
//! edit actions). Supplied by the resource-action dispatch layer.

use serde::{Deserialize, Serialize};

/// Category of a translation-related action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionCategory {
    /// Reading a translated value
    View,
    /// Writing a translated value
    Edit,
    /// Submitting a translation for review
    Submit,
    /// Approving a submitted translation
    Approve,
    /// Rejecting a submitted translation
    Reject,
    /// An action name outside the translation policy's concern
    Other,
}

impl ActionCategory {
    /// Map a dispatch-layer action name to a category
    ///
    /// Names this module does not recognize map to `Other`, which the
    /// engine treats as outside its concern.
    pub fn from_name(name: &str) -> Self {
        match name {
            "view" | "show" | "read" | "index" => ActionCategory::View,
            "edit" | "update" | "write" | "translate" => ActionCategory::Edit,
            "submit" | "submit_for_review" => ActionCategory::Submit,
            "approve" => ActionCategory::Approve,
            "reject" => ActionCategory::Reject,
            _ => ActionCategory::Other,
        }
    }

    /// Stable label for logging and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionCategory::View => "view",
            ActionCategory::Edit => "edit",
            ActionCategory::Submit => "submit",
            ActionCategory::Approve => "approve",
            ActionCategory::Reject => "reject",
            ActionCategory::Other => "other",
        }
    }

    /// Whether this is one of the approval workflow categories
    pub fn is_approval(&self) -> bool {
        matches!(
            self,
            ActionCategory::Submit | ActionCategory::Approve | ActionCategory::Reject
        )
    }
}

/// The action under decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionContext {
    /// Dispatch-layer action name, kept for audit logs
    pub name: String,

    /// Decision category derived from the name
    pub category: ActionCategory,

    /// Target resource type
    pub resource_type: String,

    /// Locale argument; required for locale-scoped edit rules
    pub locale: Option<String>,
}

impl ActionContext {
    /// Build a context from a raw action name
    pub fn new(name: &str, resource_type: &str) -> Self {
        Self {
            name: name.to_string(),
            category: ActionCategory::from_name(name),
            resource_type: resource_type.to_string(),
            locale: None,
        }
    }

    /// Attach a locale argument
    pub fn with_locale(mut self, locale: &str) -> Self {
        self.locale = Some(locale.to_string());
        self
    }

    /// A view action against a resource
    pub fn view(resource_type: &str) -> Self {
        Self::new("view", resource_type)
    }

    /// An edit action against a resource in a locale
    pub fn edit(resource_type: &str, locale: &str) -> Self {
        Self::new("edit", resource_type).with_locale(locale)
    }
}
