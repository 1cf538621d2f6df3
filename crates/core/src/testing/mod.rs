//! Testing utilities for building schemas and attribute snapshots in code.
//!
//! # Example
//!
//! ```rust,ignore
//! use trackerforge_core::schema::Priority;
//! use trackerforge_core::testing::fixtures::{attributes, SchemaBuilder};
//!
//! let schema = SchemaBuilder::new("TST")
//!     .required("source_id", "string")
//!     .translate("source", "source_id")
//!     .category("source_id", "web", &[("web", Priority::SelectOne)])
//!     .build();
//! let attrs = attributes(&[("source_type", "web")]);
//! ```

pub mod fixtures {
    use crate::attributes::AttributeStore;
    use crate::schema::{
        CategoryCandidate, CategoryRules, DataSource, FieldRule, FieldSpec, HybridCandidate,
        HybridCondition, HybridTypeConfig, Priority, SubAttribute, TrackerSchema, Translation,
        ValueTypeTag,
    };

    /// Attribute snapshot from name/value pairs.
    pub fn attributes(pairs: &[(&str, &str)]) -> AttributeStore {
        AttributeStore::builder()
            .extend(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())))
            .build()
    }

    /// Fluent builder for a [`TrackerSchema`] that skips the JSON document.
    pub struct SchemaBuilder {
        schema: TrackerSchema,
    }

    impl SchemaBuilder {
        pub fn new(acronym: &str) -> Self {
            Self {
                schema: TrackerSchema {
                    name: format!("{} test tracker", acronym),
                    acronym: acronym.to_string(),
                    fields: Vec::new(),
                    translations: Vec::new(),
                    categories: Vec::new(),
                    hybrid_type: None,
                    defaults: Vec::new(),
                },
            }
        }

        pub fn required(self, field: &str, tag: &str) -> Self {
            self.typed(field, tag, true)
        }

        pub fn optional(self, field: &str, tag: &str) -> Self {
            self.typed(field, tag, false)
        }

        fn typed(mut self, field: &str, tag: &str, required: bool) -> Self {
            let tag = tag
                .parse::<ValueTypeTag>()
                .unwrap_or_else(|e| panic!("bad value type in fixture: {}", e));
            self.schema.fields.push(FieldRule {
                name: field.to_string(),
                spec: FieldSpec::Typed(tag),
                required,
            });
            self
        }

        /// Optional field restricted to `allowed`.
        pub fn enumerated(mut self, field: &str, allowed: &[&str]) -> Self {
            self.schema.fields.push(FieldRule {
                name: field.to_string(),
                spec: FieldSpec::Enumerated(allowed.iter().map(|s| s.to_string()).collect()),
                required: false,
            });
            self
        }

        pub fn translate(mut self, attribute: &str, field: &str) -> Self {
            self.schema.translations.push(Translation {
                attribute: attribute.to_string(),
                field: field.to_string(),
            });
            self
        }

        /// Append a candidate to the category table of `field`.
        pub fn category(mut self, field: &str, key: &str, subs: &[(&str, Priority)]) -> Self {
            let candidate = CategoryCandidate {
                key: key.to_string(),
                sub_attributes: subs
                    .iter()
                    .map(|(name, priority)| SubAttribute {
                        name: name.to_string(),
                        priority: *priority,
                    })
                    .collect(),
            };

            match self.schema.categories.iter_mut().find(|c| c.field == field) {
                Some(rules) => rules.candidates.push(candidate),
                None => self.schema.categories.push(CategoryRules {
                    field: field.to_string(),
                    candidates: vec![candidate],
                }),
            }
            self
        }

        pub fn hybrid(mut self, required: bool, prerequisite: &[&str]) -> Self {
            self.schema.hybrid_type = Some(HybridTypeConfig {
                required,
                prerequisite: prerequisite.iter().map(|s| s.to_string()).collect(),
                candidates: Vec::new(),
            });
            self
        }

        /// Append a hybrid candidate. Calls [`Self::hybrid`] first if needed.
        pub fn hybrid_candidate(
            mut self,
            key: &str,
            conditions: &[(&str, DataSource, &[&str])],
        ) -> Self {
            let candidate = HybridCandidate {
                key: key.to_string(),
                conditions: conditions
                    .iter()
                    .map(|(name, data_source, values)| HybridCondition {
                        name: name.to_string(),
                        data_source: *data_source,
                        values: values.iter().map(|s| s.to_string()).collect(),
                    })
                    .collect(),
            };
            self.schema
                .hybrid_type
                .get_or_insert_with(|| HybridTypeConfig {
                    required: true,
                    prerequisite: Vec::new(),
                    candidates: Vec::new(),
                })
                .candidates
                .push(candidate);
            self
        }

        pub fn default(mut self, field: &str, value: &str) -> Self {
            self.schema
                .defaults
                .push((field.to_string(), value.to_string()));
            self
        }

        pub fn build(self) -> TrackerSchema {
            self.schema
        }
    }
}
