//! Family group domain model

use serde::{Deserialize, Serialize};

/// Role of a member inside a family group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Owner,
    /// Anything the server does not call "owner"
    #[default]
    #[serde(other)]
    Member,
}

impl MemberRole {
    pub fn label(&self) -> &'static str {
        match self {
            MemberRole::Owner => "Pemilik",
            MemberRole::Member => "Anggota",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyMember {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: MemberRole,
}

/// A family group shares transaction visibility between its members
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Family {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub invite_code: String,
    #[serde(default)]
    pub members: Vec<FamilyMember>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_owner: Option<bool>,
}

impl Family {
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Whether the given user owns this family. Uses the server's `isOwner`
    /// flag when present, otherwise the member list.
    pub fn is_owned_by(&self, user_id: Option<&str>) -> bool {
        if let Some(flag) = self.is_owner {
            return flag;
        }
        let Some(user_id) = user_id else {
            return false;
        };
        self.members
            .iter()
            .any(|m| m.role == MemberRole::Owner && m.id.as_deref() == Some(user_id))
    }
}
