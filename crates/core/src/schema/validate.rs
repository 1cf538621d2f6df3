use super::document::CATEGORY_ATTRIBUTES;
use super::{FieldSpec, SchemaError, TrackerSchema};
use crate::payload::{CUSTOM_EDITION, HYBRID_TYPE};

/// Validate a tracker schema.
/// Currently validates:
/// - `type`, `source` and `resolution` translate to a field with a category table
/// - every translated field is declared as required or optional
/// - enumerated (allowed-values) fields are optional
/// - a required hybrid config has a `hybrid_type` translation
/// - hybrid candidates declare at least one condition
pub fn validate_schema(schema: &TrackerSchema) -> Result<(), SchemaError> {
    if let Some(field) = schema
        .fields
        .iter()
        .find(|f| f.required && matches!(f.spec, FieldSpec::Enumerated(_)))
    {
        return Err(SchemaError::validation(format!(
            "{}: required field '{}' cannot list allowed values",
            schema.acronym, field.name
        )));
    }

    for translation in &schema.translations {
        if CATEGORY_ATTRIBUTES.contains(&translation.attribute.as_str())
            && schema.category_rules(&translation.field).is_none()
        {
            return Err(SchemaError::validation(format!(
                "{}: '{}' translates to '{}' which has no category table",
                schema.acronym, translation.attribute, translation.field
            )));
        }

        // The custom edition target is only written by the edition fallback
        if translation.attribute != CUSTOM_EDITION && schema.field(&translation.field).is_none() {
            return Err(SchemaError::validation(format!(
                "{}: translated field '{}' is neither required nor optional",
                schema.acronym, translation.field
            )));
        }
    }

    if let Some(hybrid) = &schema.hybrid_type {
        if hybrid.required && schema.translated_field(HYBRID_TYPE).is_none() {
            return Err(SchemaError::validation(format!(
                "{}: hybrid type is required but '{}' is not translated",
                schema.acronym, HYBRID_TYPE
            )));
        }
        if let Some(empty) = hybrid.candidates.iter().find(|c| c.conditions.is_empty()) {
            return Err(SchemaError::validation(format!(
                "{}: hybrid candidate '{}' declares no conditions",
                schema.acronym, empty.key
            )));
        }
    }

    Ok(())
}
