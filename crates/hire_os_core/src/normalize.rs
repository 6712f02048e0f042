//! Field normalization applied between the store and the typed records.
//!
//! One declared table per collection: legacy renames, nested-field
//! flattening, and default fills. `from_document` constructors run a
//! document through [`normalize_document`] before validating, so every
//! consumer sees one field vocabulary regardless of which upstream writer
//! produced the document.

use serde_json::Value;

use crate::ports::Document;
use crate::types::Collection;

// ── Rule types ────────────────────────────────────────────────

/// Move a legacy field name to its current one. The legacy name wins when a
/// document carries both.
#[derive(Debug, Clone, Copy)]
pub struct Rename {
    pub from: &'static str,
    pub to: &'static str,
}

/// Replace an object-valued field with one of its inner fields. An object
/// without the inner field is dropped; it cannot decode as a scalar.
#[derive(Debug, Clone, Copy)]
pub struct Flatten {
    pub field: &'static str,
    pub inner: &'static str,
}

/// Fill a missing or null field. Fills apply in declaration order; the first
/// one that produces a value wins, so a `FromField` fallback can precede a
/// literal.
#[derive(Debug, Clone, Copy)]
pub struct Fill {
    pub field: &'static str,
    pub value: FillValue,
}

#[derive(Debug, Clone, Copy)]
pub enum FillValue {
    Text(&'static str),
    Int(i64),
    Bool(bool),
    /// Copy another field's value, if that field is present and non-null.
    FromField(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct CollectionRules {
    pub collection: Collection,
    pub renames: &'static [Rename],
    pub flattens: &'static [Flatten],
    pub fills: &'static [Fill],
}

// ── The table ─────────────────────────────────────────────────

pub const NORMALIZATION: &[CollectionRules] = &[
    CollectionRules {
        collection: Collection::Organisations,
        renames: &[
            Rename { from: "company_name", to: "name" },
            Rename { from: "company_size", to: "size" },
            Rename { from: "created_by_user_id", to: "created_by" },
            Rename { from: "timestamp", to: "created_at" },
        ],
        flattens: &[],
        fills: &[],
    },
    CollectionRules {
        collection: Collection::Jobs,
        renames: &[Rename { from: "job_title", to: "title" }],
        flattens: &[Flatten { field: "location", inner: "city" }],
        fills: &[
            Fill { field: "title", value: FillValue::Text("Untitled Job") },
            Fill { field: "department", value: FillValue::FromField("company") },
            Fill { field: "priority", value: FillValue::Text("medium") },
            Fill { field: "total_applicants", value: FillValue::FromField("applicant_count") },
            Fill { field: "total_applicants", value: FillValue::Int(0) },
            Fill { field: "new_applicants", value: FillValue::Int(0) },
        ],
    },
    CollectionRules {
        collection: Collection::Users,
        renames: &[],
        flattens: &[],
        fills: &[Fill { field: "is_onboarded", value: FillValue::Bool(false) }],
    },
    CollectionRules {
        collection: Collection::OnboardingConfig,
        renames: &[Rename { from: "timestamp", to: "created_at" }],
        flattens: &[],
        fills: &[],
    },
    CollectionRules {
        collection: Collection::BasicDetails,
        renames: &[Rename { from: "timestamp", to: "created_at" }],
        flattens: &[],
        fills: &[],
    },
];

pub fn rules_for(collection: Collection) -> Option<&'static CollectionRules> {
    NORMALIZATION.iter().find(|r| r.collection == collection)
}

// ── Application ───────────────────────────────────────────────

/// Apply a collection's normalization rules to one raw document.
/// Non-object documents and collections without rules pass through unchanged.
pub fn normalize_document(collection: Collection, mut doc: Document) -> Document {
    let Some(rules) = rules_for(collection) else {
        return doc;
    };
    let Some(map) = doc.as_object_mut() else {
        return doc;
    };

    for rename in rules.renames {
        if let Some(value) = map.remove(rename.from) {
            map.insert(rename.to.to_string(), value);
        }
    }

    for flatten in rules.flattens {
        let replacement = match map.get(flatten.field) {
            Some(Value::Object(inner)) => Some(inner.get(flatten.inner).cloned()),
            _ => None,
        };
        match replacement {
            Some(Some(value)) => {
                map.insert(flatten.field.to_string(), value);
            }
            Some(None) => {
                map.remove(flatten.field);
            }
            None => {}
        }
    }

    for fill in rules.fills {
        if !matches!(map.get(fill.field), None | Some(Value::Null)) {
            continue;
        }
        let value = match fill.value {
            FillValue::Text(s) => Some(Value::String(s.to_string())),
            FillValue::Int(i) => Some(Value::Number(i.into())),
            FillValue::Bool(b) => Some(Value::Bool(b)),
            FillValue::FromField(src) => map.get(src).filter(|v| !v.is_null()).cloned(),
        };
        if let Some(value) = value {
            map.insert(fill.field.to_string(), value);
        }
    }

    doc
}
