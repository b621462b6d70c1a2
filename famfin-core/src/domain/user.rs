//! User profile domain model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Profile of the signed-in user, as issued by the server.
///
/// The record is treated as opaque: only the fields the client displays are
/// typed, everything else is kept in `extra` so persisting and restoring a
/// profile never drops server data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// Family reference; the server sends either an id or an embedded object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl UserProfile {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Name shown in the dashboard greeting: the family name when the user
    /// belongs to one, otherwise their own name.
    pub fn household_name(&self) -> &str {
        self.family_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_record() {
        let user: UserProfile = serde_json::from_str(r#"{"name":"Ana"}"#).unwrap();
        assert_eq!(user.name, "Ana");
        assert!(user.id.is_none());
        assert!(user.email.is_empty());
        assert!(user.family.is_none());
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let raw = r#"{"_id":"u1","name":"Budi","email":"budi@example.com","familyName":"Santoso","avatarColor":"teal"}"#;
        let user: UserProfile = serde_json::from_str(raw).unwrap();
        assert_eq!(user.id.as_deref(), Some("u1"));
        assert_eq!(user.extra["avatarColor"], "teal");

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["_id"], "u1");
        assert_eq!(json["familyName"], "Santoso");
        assert_eq!(json["avatarColor"], "teal");
    }

    #[test]
    fn test_household_name() {
        let mut user = UserProfile::new("Budi", "budi@example.com");
        assert_eq!(user.household_name(), "Budi");

        user.family_name = Some("Santoso".to_string());
        assert_eq!(user.household_name(), "Santoso");
    }
}
