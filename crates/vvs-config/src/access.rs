use serde_json::Value;
use vvs_core::User;

use crate::document::{ACCESS_KEY, Document, GROUPS_KEY};
use crate::merge::merge_documents;

/// Fold group and role overrides into `doc`.
///
/// A mapping under `groups` is removed and each mapping entry named after
/// one of the user's groups is merged in, in ascending group-name order. A mapping
/// under `access` is removed; `access.user` applies to any user and
/// `access.admin` to administrators, after `access.user`. Non-mapping
/// documents are returned unchanged.
pub fn apply_user_context(doc: Document, user: Option<&User>) -> Document {
    let mut map = match doc {
        Value::Object(map) => map,
        other => return other,
    };

    let groups = match map.remove(GROUPS_KEY) {
        Some(Value::Object(groups)) => Some(groups),
        Some(other) => {
            map.insert(GROUPS_KEY.to_string(), other);
            None
        }
        None => None,
    };
    let access = match map.remove(ACCESS_KEY) {
        Some(Value::Object(access)) => Some(access),
        Some(other) => {
            map.insert(ACCESS_KEY.to_string(), other);
            None
        }
        None => None,
    };

    let mut doc = Value::Object(map);
    let Some(user) = user else {
        return doc;
    };

    if let Some(mut groups) = groups {
        let mut names: Vec<&String> = user.groups.iter().collect();
        names.sort();
        names.dedup();
        for name in names {
            if let Some(overrides) = groups.remove(name.as_str()).filter(Value::is_object) {
                doc = merge_documents(doc, overrides);
            }
        }
    }

    if let Some(mut access) = access {
        if let Some(overrides) = access.remove("user").filter(Value::is_object) {
            doc = merge_documents(doc, overrides);
        }
        if user.admin
            && let Some(overrides) = access.remove("admin").filter(Value::is_object)
        {
            doc = merge_documents(doc, overrides);
        }
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user(groups: &[&str], admin: bool) -> User {
        User {
            login: "ada".into(),
            groups: groups.iter().map(|g| g.to_string()).collect(),
            admin,
        }
    }

    fn doc() -> Document {
        json!({
            "layout": "1x1",
            "color": "gray",
            "groups": {
                "radiology": {"layout": "2x2", "color": "red"},
                "oncology": {"layout": "3x3"},
                "pathology": {"color": "blue"}
            },
            "access": {
                "user": {"tools": ["ruler"]},
                "admin": {"tools": ["ruler", "paint"], "debug": true}
            }
        })
    }

    #[test]
    fn test_groups_apply_in_ascending_order() {
        // oncology < radiology: radiology wins on layout
        let resolved = apply_user_context(doc(), Some(&user(&["radiology", "oncology"], false)));
        assert_eq!(resolved["layout"], "2x2");
        assert_eq!(resolved["color"], "red");
        assert!(resolved.get("groups").is_none());
    }

    #[test]
    fn test_unrelated_groups_do_nothing() {
        let resolved = apply_user_context(doc(), Some(&user(&["billing"], false)));
        assert_eq!(resolved["layout"], "1x1");
        assert_eq!(resolved["tools"], json!(["ruler"]));
        assert!(resolved.get("debug").is_none());
    }

    #[test]
    fn test_admin_overrides_apply_after_user() {
        let resolved = apply_user_context(doc(), Some(&user(&[], true)));
        assert_eq!(resolved["tools"], json!(["ruler", "paint"]));
        assert_eq!(resolved["debug"], true);
        assert!(resolved.get("access").is_none());
    }

    #[test]
    fn test_anonymous_strips_overrides() {
        let resolved = apply_user_context(doc(), None);
        assert_eq!(resolved, json!({"layout": "1x1", "color": "gray"}));
    }

    #[test]
    fn test_non_mapping_sections_are_left_alone() {
        let resolved = apply_user_context(
            json!({"groups": ["a"], "access": "open"}),
            Some(&user(&["a"], true)),
        );
        assert_eq!(resolved, json!({"groups": ["a"], "access": "open"}));
    }

    #[test]
    fn test_non_mapping_group_entries_are_ignored() {
        let doc = json!({
            "layout": "1x1",
            "groups": {"oncology": 3, "radiology": null}
        });
        let resolved = apply_user_context(doc, Some(&user(&["radiology", "oncology"], false)));
        assert_eq!(resolved, json!({"layout": "1x1"}));
    }

    #[test]
    fn test_empty_yaml_group_entry_keeps_document() {
        let doc =
            crate::document::parse_document(b"layout: 1x1\ngroups:\n  radiology:\n").unwrap();
        let resolved = apply_user_context(doc, Some(&user(&["radiology"], false)));
        assert_eq!(resolved, json!({"layout": "1x1"}));
    }

    #[test]
    fn test_non_mapping_document_unchanged() {
        assert_eq!(apply_user_context(json!([1, 2]), None), json!([1, 2]));
    }
}
