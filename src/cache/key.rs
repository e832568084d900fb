//! Cache Key
//!
//! The 4-tuple addressing one computed translation value. A `CacheKey`
//! can only be built through validation, so holding one is proof that
//! every component passed the shared validators — the store never sees an
//! unchecked key on either the put or the get path.

use crate::validate::{
    validate_field, validate_locale, validate_record_id, validate_resource_type, FieldRegistry,
    ValidationError,
};

/// Validated cache key `(resource_type, field, locale, record_id)`
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct CacheKey {
    resource_type: String,
    field: String,
    locale: String,
    record_id: String,
}

impl CacheKey {
    /// Validate the components and build a key
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` encountered: unknown or
    /// oversized field name, malformed resource type, malformed locale,
    /// or oversized record id. No partial key exists on failure.
    pub fn new(
        resource_type: &str,
        field: &str,
        locale: &str,
        record_id: &str,
        registry: &FieldRegistry,
    ) -> Result<Self, ValidationError> {
        validate_resource_type(resource_type)?;
        validate_field(field, registry)?;
        validate_locale(locale)?;
        validate_record_id(record_id)?;

        Ok(Self {
            resource_type: resource_type.to_string(),
            field: field.to_string(),
            locale: locale.to_string(),
            record_id: record_id.to_string(),
        })
    }

    /// The resource type component
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// The field name component
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The locale component
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// The record id component
    pub fn record_id(&self) -> &str {
        &self.record_id
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.resource_type, self.field, self.locale, self.record_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> FieldRegistry {
        FieldRegistry::with_fields(["title", "description"])
    }

    #[test]
    fn test_valid_key() {
        let registry = registry();
        let key = CacheKey::new("Product", "title", "en_US", "123", &registry).unwrap();

        assert_eq!(key.resource_type(), "Product");
        assert_eq!(key.field(), "title");
        assert_eq!(key.locale(), "en_US");
        assert_eq!(key.record_id(), "123");
        assert_eq!(key.to_string(), "Product/title/en_US/123");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let registry = registry();
        let result = CacheKey::new("Product", "arbitrary_unknown_field", "en", "123", &registry);
        assert!(matches!(result, Err(ValidationError::UnknownField(_))));
    }

    #[test]
    fn test_malformed_locale_rejected() {
        let registry = registry();
        let result = CacheKey::new("Product", "title", "xx-not-a-locale", "123", &registry);
        assert!(matches!(result, Err(ValidationError::InvalidLocaleFormat(_))));
    }

    #[test]
    fn test_malformed_resource_rejected() {
        let registry = registry();
        let result = CacheKey::new("product", "title", "en", "123", &registry);
        assert!(matches!(result, Err(ValidationError::InvalidResourceFormat(_))));
    }

    #[test]
    fn test_empty_component_rejected() {
        let registry = registry();
        let result = CacheKey::new("Product", "title", "en", "", &registry);
        assert_eq!(result, Err(ValidationError::InvalidKeyStructure));
    }

    #[test]
    fn test_namespaced_resource_accepted() {
        let registry = registry();
        assert!(CacheKey::new("Admin::Product", "title", "en", "42", &registry).is_ok());
    }
}
