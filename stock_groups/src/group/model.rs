use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, sqlx::FromRow, Debug)]
pub struct Group {
    pub group_id: i32,
    pub name: String,
    pub invite_code: String,
    pub creator_id: String,
    pub created_at: DateTime<Utc>,
}

/// Group header as returned to clients.
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GroupInfo {
    pub group_id: i32,
    pub name: String,
    pub invite_code: String,
}

impl From<&Group> for GroupInfo {
    fn from(group: &Group) -> Self {
        Self {
            group_id: group.group_id,
            name: group.name.clone(),
            invite_code: group.invite_code.clone(),
        }
    }
}
