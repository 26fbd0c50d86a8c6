use crate::domain::model::{json_kind, DirectoryPayload};
use crate::utils::error::{CollectorError, Result};
use serde_json::Value;

/// Member keys that identify a person and never reach a snapshot.
pub const SENSITIVE_FIELDS: [&str; 3] = ["profile", "real_name", "name"];

/// Strips sensitive keys from every member record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anonymizer {
    fields: Vec<String>,
}

impl Default for Anonymizer {
    fn default() -> Self {
        Self {
            fields: SENSITIVE_FIELDS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl Anonymizer {
    /// The built-in fields plus `extra`. Duplicates are dropped.
    pub fn with_extra_fields<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut anonymizer = Self::default();
        for field in extra {
            let field = field.into();
            if !anonymizer.fields.contains(&field) {
                anonymizer.fields.push(field);
            }
        }
        anonymizer
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn anonymize(&self, mut payload: DirectoryPayload) -> Result<DirectoryPayload> {
        let members = payload.members_mut()?;

        for (index, member) in members.iter_mut().enumerate() {
            match member {
                Value::Object(record) => {
                    for field in &self.fields {
                        record.remove(field);
                    }
                }
                other => {
                    return Err(CollectorError::invalid_shape(format!(
                        "member {} is {} instead of an object",
                        index,
                        json_kind(other)
                    )))
                }
            }
        }

        tracing::debug!(
            "Removed {:?} from {} members",
            self.fields,
            members.len()
        );
        Ok(payload)
    }
}

/// Remove `profile`, `real_name` and `name` from every member.
pub fn anonymize(payload: DirectoryPayload) -> Result<DirectoryPayload> {
    Anonymizer::default().anonymize(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> DirectoryPayload {
        DirectoryPayload::try_from(value).unwrap()
    }

    fn sensitive_members() -> DirectoryPayload {
        payload(json!({
            "ok": true,
            "members": [
                {
                    "id": "U023BECGF",
                    "name": "bobby",
                    "real_name": "Bobby Tables",
                    "profile": {"email": "bobby@example.com", "phone": "555"},
                    "tz": "America/Los_Angeles",
                    "is_admin": true
                },
                {"id": "U061F7AUR", "deleted": true},
                {"id": "U0C0NS9HN", "name": "rania", "color": "9f69e7"}
            ],
            "response_metadata": {"next_cursor": ""}
        }))
    }

    #[test]
    fn test_sensitive_keys_removed() {
        let cleaned = anonymize(sensitive_members()).unwrap();

        for member in cleaned.members().unwrap() {
            let record = member.as_object().unwrap();
            for key in SENSITIVE_FIELDS {
                assert!(!record.contains_key(key), "{key} left in {record:?}");
            }
        }
    }

    #[test]
    fn test_other_fields_and_top_level_keys_preserved() {
        let cleaned = anonymize(sensitive_members()).unwrap();

        assert_eq!(
            serde_json::to_value(&cleaned).unwrap(),
            json!({
                "ok": true,
                "members": [
                    {"id": "U023BECGF", "tz": "America/Los_Angeles", "is_admin": true},
                    {"id": "U061F7AUR", "deleted": true},
                    {"id": "U0C0NS9HN", "color": "9f69e7"}
                ],
                "response_metadata": {"next_cursor": ""}
            })
        );
    }

    #[test]
    fn test_anonymize_is_idempotent() {
        let once = anonymize(sensitive_members()).unwrap();
        let twice = anonymize(once.clone()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_nested_name_fields_are_not_touched() {
        // Only top-level member keys are sensitive; `enterprise_user.name` is not a member key.
        let cleaned = anonymize(payload(json!({
            "members": [{"id": "U1", "enterprise_user": {"name": "Acme"}}]
        })))
        .unwrap();
        assert_eq!(
            cleaned.members().unwrap()[0],
            json!({"id": "U1", "enterprise_user": {"name": "Acme"}})
        );
    }

    #[test]
    fn test_extra_fields() {
        let anonymizer = Anonymizer::with_extra_fields(["email", "name"]);
        assert_eq!(anonymizer.fields(), ["profile", "real_name", "name", "email"]);

        let cleaned = anonymizer
            .anonymize(payload(json!({
                "members": [{"id": "U1", "email": "a@example.com", "name": "a"}]
            })))
            .unwrap();
        assert_eq!(cleaned.members().unwrap()[0], json!({"id": "U1"}));
    }

    #[test]
    fn test_missing_members_is_invalid_shape() {
        let err = anonymize(payload(json!({"ok": true}))).unwrap_err();
        assert!(matches!(err, CollectorError::InvalidPayloadShape { .. }));

        let err = anonymize(payload(json!({"members": {"id": "U1"}}))).unwrap_err();
        assert!(matches!(err, CollectorError::InvalidPayloadShape { .. }));
    }

    #[test]
    fn test_non_object_member_is_invalid_shape() {
        let err = anonymize(payload(json!({"members": [{"id": "U1"}, "U2"]}))).unwrap_err();
        assert!(err.to_string().contains("member 1"));
    }

    #[test]
    fn test_empty_members_is_not_an_error() {
        let cleaned = anonymize(payload(json!({"members": []}))).unwrap();
        assert_eq!(cleaned.member_count(), 0);
    }
}
