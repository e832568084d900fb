//! Policy Decision Engine
//!
//! Stateless evaluation of `(actor, action, resource policy)` into an
//! allow/deny decision. The default posture is fail-closed: a declared
//! policy block that leaves an action unconfigured denies it, approval
//! workflow actions deny whenever unconfigured, and malformed actor data
//! denies any rule that depends on it. The one permissive carve-out is a
//! resource that declares no policy block at all, which falls back to
//! public view and admin-only edit.

use super::action::{ActionCategory, ActionContext};
use super::actor::{Actor, Role};
use super::config::{PolicyConfig, PolicyKind};
use super::registry::DeciderRegistry;
use crate::audit;
use crate::metrics;
use crate::validate::validate_locale;

/// Outcome of a policy decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// Whether the action is permitted
    pub allowed: bool,

    /// Short denial reason; absent on allow
    pub reason: Option<String>,
}

impl Decision {
    /// An allowing decision
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    /// A denying decision with a reason
    pub fn deny(reason: &str) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.to_string()),
        }
    }
}

/// Stateless policy decision engine
#[derive(Debug, Default)]
pub struct PolicyEngine {
    registry: DeciderRegistry,
}

impl PolicyEngine {
    /// Create an engine with the given decider registry
    pub fn new(registry: DeciderRegistry) -> Self {
        Self { registry }
    }

    /// Create an engine with no custom deciders
    pub fn without_deciders() -> Self {
        Self::default()
    }

    /// Decide whether the actor may perform the action
    ///
    /// `policy` is the resource's declared policy block; `None` means the
    /// resource declares no block at all. Every decision is reported to
    /// the audit log.
    pub fn decide(
        &self,
        actor: &Actor,
        action: &ActionContext,
        policy: Option<&PolicyConfig>,
    ) -> Decision {
        let decision = self.evaluate(actor, action, policy);

        audit::log_decision(actor, action, &decision);
        metrics::POLICY_DECISIONS_TOTAL
            .with_label_values(&[
                action.category.as_str(),
                if decision.allowed { "allowed" } else { "denied" },
            ])
            .inc();

        decision
    }

    /// Boolean form of [`PolicyEngine::decide`]
    pub fn matches(
        &self,
        actor: &Actor,
        action: &ActionContext,
        policy: Option<&PolicyConfig>,
    ) -> bool {
        self.decide(actor, action, policy).allowed
    }

    fn evaluate(
        &self,
        actor: &Actor,
        action: &ActionContext,
        policy: Option<&PolicyConfig>,
    ) -> Decision {
        match action.category {
            ActionCategory::Submit | ActionCategory::Approve | ActionCategory::Reject => {
                self.evaluate_approval(actor, action, policy)
            }
            // Action names outside the translation policy's concern.
            ActionCategory::Other => Decision::allow(),
            ActionCategory::View | ActionCategory::Edit => {
                // A resource with no policy block at all gets permissive
                // defaults; a declared block with the kind absent denies.
                let defaults;
                let config = match policy {
                    Some(config) => config,
                    None => {
                        defaults = PolicyConfig::permissive_defaults();
                        &defaults
                    }
                };

                let kind = if action.category == ActionCategory::View {
                    config.view.as_ref()
                } else {
                    config.edit.as_ref()
                };

                match kind {
                    Some(kind) => self.evaluate_kind(kind, actor, action),
                    None => Decision::deny("action is not configured for this resource"),
                }
            }
        }
    }

    // Approval is strictly fail-closed: no approval block, no approval
    // actions, regardless of how view/edit fall back.
    fn evaluate_approval(
        &self,
        actor: &Actor,
        action: &ActionContext,
        policy: Option<&PolicyConfig>,
    ) -> Decision {
        let Some(approval) = policy.and_then(|config| config.approval.as_ref()) else {
            return Decision::deny("approval workflow is not configured");
        };

        if action.category == ActionCategory::Submit {
            return if actor.is_authenticated() {
                Decision::allow()
            } else {
                Decision::deny("submission requires an authenticated actor")
            };
        }

        match actor.role {
            Some(role) if approval.approvers.contains(&role) => Decision::allow(),
            _ => Decision::deny("actor is not an approver"),
        }
    }

    fn evaluate_kind(
        &self,
        kind: &PolicyKind,
        actor: &Actor,
        action: &ActionContext,
    ) -> Decision {
        match kind {
            PolicyKind::Public => Decision::allow(),

            PolicyKind::Authenticated => {
                if actor.is_authenticated() {
                    Decision::allow()
                } else {
                    Decision::deny("requires an authenticated actor")
                }
            }

            PolicyKind::Roles { roles } => match actor.role {
                Some(role) if roles.contains(&role) => Decision::allow(),
                _ => Decision::deny("actor role is not permitted"),
            },

            PolicyKind::LocaleRoles { locales } => {
                let Some(locale) = action.locale.as_deref() else {
                    return Decision::deny("action carries no locale");
                };
                if validate_locale(locale).is_err() {
                    return Decision::deny("action locale is malformed");
                }
                match locales.get(locale) {
                    // A locale absent from the map is unrestricted.
                    None => Decision::allow(),
                    Some(roles) => match actor.role {
                        Some(role) if roles.contains(&role) => Decision::allow(),
                        _ => Decision::deny("actor role is not permitted for this locale"),
                    },
                }
            }

            PolicyKind::TranslatorScoped => self.evaluate_translator_scope(actor, action),

            PolicyKind::Custom { module } => match self.registry.lookup(module) {
                None => Decision::deny("decision module is not trusted or not registered"),
                Some(decider) => {
                    if decider.decide(actor, action, &action.resource_type) {
                        Decision::allow()
                    } else {
                        Decision::deny("custom decision module denied the action")
                    }
                }
            },
        }
    }

    // Translator scope requires every input to be present and well
    // formed; any missing or malformed piece denies.
    fn evaluate_translator_scope(&self, actor: &Actor, action: &ActionContext) -> Decision {
        if !actor.has_role(Role::Translator) {
            return Decision::deny("actor is not a translator");
        }
        let Some(assigned) = actor.assigned_locales.as_ref() else {
            return Decision::deny("translator has no assigned locales");
        };
        let Some(locale) = action.locale.as_deref() else {
            return Decision::deny("action carries no locale");
        };
        if validate_locale(locale).is_err() {
            return Decision::deny("action locale is malformed");
        }
        if assigned.iter().any(|l| l == locale) {
            Decision::allow()
        } else {
            Decision::deny("locale is outside the translator's assignment")
        }
    }
}
