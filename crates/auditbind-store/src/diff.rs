//! Field-level differences between two versions of a record.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde_json::{Map, Value};

use auditbind_entity::FieldChange;

use crate::audit_registry::AuditOptions;

/// Computes tracked changes going from `old` to `new`.
///
/// A missing side is treated as having no fields, so a create yields every
/// field as `null -> value` and a delete every field as `value -> null`.
pub fn model_changes(
    old: Option<&Map<String, Value>>,
    new: Option<&Map<String, Value>>,
    options: &AuditOptions,
) -> BTreeMap<String, FieldChange> {
    let empty = Map::new();
    let old = old.unwrap_or(&empty);
    let new = new.unwrap_or(&empty);

    let fields: BTreeSet<&String> = old.keys().chain(new.keys()).collect();

    fields
        .into_iter()
        .filter(|field| options.tracks(field))
        .filter_map(|field| {
            let before = old.get(field).cloned().unwrap_or(Value::Null);
            let after = new.get(field).cloned().unwrap_or(Value::Null);
            (before != after).then(|| (field.clone(), FieldChange::new(before, after)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_update_reports_only_changed_fields() {
        let old = fields(json!({"title": "old", "body": "same"}));
        let new = fields(json!({"title": "new", "body": "same"}));
        let changes = model_changes(Some(&old), Some(&new), &AuditOptions::default());

        assert_eq!(changes.len(), 1);
        assert_eq!(changes["title"], FieldChange::new(json!("old"), json!("new")));
    }

    #[test]
    fn test_create_and_delete() {
        let record = fields(json!({"title": "hello"}));
        let created = model_changes(None, Some(&record), &AuditOptions::default());
        assert_eq!(created["title"], FieldChange::new(Value::Null, json!("hello")));

        let deleted = model_changes(Some(&record), None, &AuditOptions::default());
        assert_eq!(deleted["title"], FieldChange::new(json!("hello"), Value::Null));
    }

    #[test]
    fn test_excluded_fields_are_skipped() {
        let old = fields(json!({"title": "a", "updated_at": 1}));
        let new = fields(json!({"title": "a", "updated_at": 2}));
        let options = AuditOptions {
            include_fields: Vec::new(),
            exclude_fields: vec!["updated_at".into()],
        };
        assert!(model_changes(Some(&old), Some(&new), &options).is_empty());
    }
}
