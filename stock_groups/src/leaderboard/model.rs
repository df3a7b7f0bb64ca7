use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::group::model::GroupInfo;
use crate::member::position::Position;

/// One ranked row of the live leaderboard view. Derived per request,
/// never persisted.
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardRow {
    pub rank: usize,
    pub member_id: i32,
    pub group_id: i32,
    pub user_id: String,
    pub username: String,
    pub positions: Vec<Position>,
    pub total_invested: Decimal,
    pub today_gain: f64,
    pub joined_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Leaderboard {
    pub group: GroupInfo,
    pub members: Vec<LeaderboardRow>,
}
