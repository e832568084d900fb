//! Shared Input Validation
//!
//! Whitelist-based validation for the untrusted request components that
//! reach the cache and policy engine: field names, resource types, locales,
//! and record ids. Field names are checked against a closed registry of
//! pre-registered symbols rather than accepted as free-form strings, so
//! request data can never mint new identifiers.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use std::sync::RwLock;

/// Maximum byte length of a translatable field name.
pub const MAX_FIELD_NAME_LEN: usize = 64;

/// Maximum byte length of a record id.
pub const MAX_RECORD_ID_LEN: usize = 128;

/// Maximum byte length of a resource type reference.
pub const MAX_RESOURCE_TYPE_LEN: usize = 128;

/// Maximum byte length of a locale (`xx` or `xx_XX`).
pub const MAX_LOCALE_LEN: usize = 5;

/// Error types for key component validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("key component is empty")]
    InvalidKeyStructure,

    #[error("field '{0}' is not a registered translatable field")]
    UnknownField(String),

    #[error("field name exceeds {MAX_FIELD_NAME_LEN} bytes")]
    FieldNameTooLong,

    #[error("resource type '{0}' does not match the type reference pattern")]
    InvalidResourceFormat(String),

    #[error("locale '{0}' does not match the xx or xx_XX pattern")]
    InvalidLocaleFormat(String),

    #[error("record id exceeds {MAX_RECORD_ID_LEN} bytes")]
    RecordIdTooLong,
}

lazy_static! {
    // Constant-style type references, optionally namespaced: `Product`,
    // `Admin::Product`.
    static ref RESOURCE_TYPE_RE: Regex =
        Regex::new(r"^[A-Z][A-Za-z0-9]*(::[A-Z][A-Za-z0-9]*)*$")
            .expect("resource type pattern is valid");

    static ref LOCALE_RE: Regex =
        Regex::new(r"^[a-z]{2}(_[A-Z]{2})?$").expect("locale pattern is valid");

    // Lowercase identifier shape required of registered field names.
    static ref FIELD_NAME_RE: Regex =
        Regex::new(r"^[a-z_][a-z0-9_]*$").expect("field name pattern is valid");
}

/// Closed set of translatable field names.
///
/// Populated at startup from model definitions. Lookups during request
/// handling only ever read the set; nothing on the request path can add
/// to it.
#[derive(Debug, Default)]
pub struct FieldRegistry {
    fields: RwLock<HashSet<String>>,
}

impl FieldRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with the given field names
    ///
    /// Names that fail the field-name shape check are skipped with a
    /// warning rather than aborting startup.
    pub fn with_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let registry = Self::new();
        for field in fields {
            let field = field.into();
            if registry.register(&field).is_err() {
                tracing::warn!(field = %field, "skipping malformed field name at registration");
            }
        }
        registry
    }

    /// Register a translatable field name
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if the name is empty, too long, or not
    /// a lowercase identifier.
    pub fn register(&self, field: &str) -> Result<(), ValidationError> {
        if field.is_empty() {
            return Err(ValidationError::InvalidKeyStructure);
        }
        if field.len() > MAX_FIELD_NAME_LEN {
            return Err(ValidationError::FieldNameTooLong);
        }
        if !FIELD_NAME_RE.is_match(field) {
            return Err(ValidationError::UnknownField(field.to_string()));
        }

        let mut fields = self.fields.write().unwrap();
        fields.insert(field.to_string());
        Ok(())
    }

    /// Check whether a field name has been registered
    pub fn is_registered(&self, field: &str) -> bool {
        let fields = self.fields.read().unwrap();
        fields.contains(field)
    }

    /// Number of registered fields
    pub fn len(&self) -> usize {
        let fields = self.fields.read().unwrap();
        fields.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Validate a field name against the registry
///
/// Length and shape are checked before the registry lookup so oversized
/// input never reaches the set.
pub fn validate_field(field: &str, registry: &FieldRegistry) -> Result<(), ValidationError> {
    if field.is_empty() {
        return Err(ValidationError::InvalidKeyStructure);
    }
    if field.len() > MAX_FIELD_NAME_LEN {
        return Err(ValidationError::FieldNameTooLong);
    }
    if !registry.is_registered(field) {
        return Err(ValidationError::UnknownField(field.to_string()));
    }
    Ok(())
}

/// Validate a resource type reference (`Product`, `Admin::Product`)
pub fn validate_resource_type(resource_type: &str) -> Result<(), ValidationError> {
    if resource_type.is_empty() {
        return Err(ValidationError::InvalidKeyStructure);
    }
    if resource_type.len() > MAX_RESOURCE_TYPE_LEN
        || !RESOURCE_TYPE_RE.is_match(resource_type)
    {
        return Err(ValidationError::InvalidResourceFormat(
            resource_type.to_string(),
        ));
    }
    Ok(())
}

/// Validate a locale (`en`, `en_US`)
///
/// The length bound is checked before the pattern so arbitrarily long
/// input is rejected without a regex pass.
pub fn validate_locale(locale: &str) -> Result<(), ValidationError> {
    if locale.is_empty() {
        return Err(ValidationError::InvalidKeyStructure);
    }
    if locale.len() > MAX_LOCALE_LEN || !LOCALE_RE.is_match(locale) {
        return Err(ValidationError::InvalidLocaleFormat(locale.to_string()));
    }
    Ok(())
}

/// Validate a record id
pub fn validate_record_id(record_id: &str) -> Result<(), ValidationError> {
    if record_id.is_empty() {
        return Err(ValidationError::InvalidKeyStructure);
    }
    if record_id.len() > MAX_RECORD_ID_LEN {
        return Err(ValidationError::RecordIdTooLong);
    }
    Ok(())
}
