use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::position::Position;

#[derive(Serialize, Deserialize, sqlx::FromRow, Debug)]
pub struct Member {
    pub member_id: i32,
    pub group_id: i32,
    pub user_id: String,
    pub username: String,
    pub joined_at: DateTime<Utc>,
}

/// Member with the positions snapshot attached, as the leaderboard reads it.
#[derive(Serialize, Deserialize, Debug)]
pub struct MemberWithPositions {
    pub member: Member,
    pub positions: Vec<Position>,
}

impl MemberWithPositions {
    pub fn total_invested(&self) -> Decimal {
        self.positions.iter().map(|p| p.amount_invested).sum()
    }
}
