use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::Postgres;

use super::model::{Member, MemberWithPositions};
use super::position::Position;

#[derive(Clone)]
pub struct MemberRepo {
    pub pool: sqlx::Pool<Postgres>,
}

#[derive(sqlx::FromRow)]
struct PositionRow {
    member_id: i32,
    symbol: String,
    amount_invested: Decimal,
}

impl MemberRepo {
    pub fn new(pool: sqlx::Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert the member row and its positions as one transaction. The
    /// unique index on members.user_id is the authoritative membership
    /// cardinality check.
    pub async fn insert(
        &self,
        group_id: i32,
        user_id: &str,
        username: &str,
        positions: &[Position],
    ) -> Result<i32, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let row: (i32,) = sqlx::query_as(
            r#"INSERT INTO members (group_id, user_id, username, joined_at)
                VALUES ($1, $2, $3, now())
                RETURNING member_id"#,
        )
        .bind(group_id)
        .bind(user_id)
        .bind(username)
        .fetch_one(&mut *tx)
        .await?;
        let member_id = row.0;

        for pos in positions {
            sqlx::query(
                r#"INSERT INTO positions (member_id, symbol, amount_invested)
                    VALUES ($1, $2, $3)"#,
            )
            .bind(member_id)
            .bind(&pos.symbol)
            .bind(pos.amount_invested)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(member_id)
    }

    pub async fn find_by_user(&self, user_id: &str) -> Result<Option<Member>, sqlx::Error> {
        sqlx::query_as::<_, Member>(
            r#"SELECT member_id, group_id, user_id, username, joined_at
                FROM members WHERE user_id = $1"#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Members in deterministic join order; the leaderboard's tie-break
    /// stability is relative to this order.
    pub async fn list_by_group(
        &self,
        group_id: i32,
    ) -> Result<Vec<MemberWithPositions>, sqlx::Error> {
        let members = sqlx::query_as::<_, Member>(
            r#"SELECT member_id, group_id, user_id, username, joined_at
                FROM members WHERE group_id = $1
                ORDER BY joined_at, member_id"#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<i32> = members.iter().map(|m| m.member_id).collect();
        let rows = sqlx::query_as::<_, PositionRow>(
            r#"SELECT member_id, symbol, amount_invested
                FROM positions WHERE member_id = ANY($1)"#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_member: HashMap<i32, Vec<Position>> = HashMap::new();
        for row in rows {
            by_member.entry(row.member_id).or_default().push(Position {
                symbol: row.symbol,
                amount_invested: row.amount_invested,
            });
        }

        Ok(members
            .into_iter()
            .map(|member| {
                let positions = by_member.remove(&member.member_id).unwrap_or_default();
                MemberWithPositions { member, positions }
            })
            .collect())
    }

    pub async fn positions_of(&self, member_id: i32) -> Result<Vec<Position>, sqlx::Error> {
        sqlx::query_as::<_, PositionRow>(
            r#"SELECT member_id, symbol, amount_invested
                FROM positions WHERE member_id = $1
                ORDER BY symbol"#,
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await
        .map(|rows| {
            rows.into_iter()
                .map(|row| Position {
                    symbol: row.symbol,
                    amount_invested: row.amount_invested,
                })
                .collect()
        })
    }

    /// Wholesale replacement of a member's positions.
    pub async fn replace_positions(
        &self,
        member_id: i32,
        positions: &[Position],
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(r#"DELETE FROM positions WHERE member_id = $1"#)
            .bind(member_id)
            .execute(&mut *tx)
            .await?;
        for pos in positions {
            sqlx::query(
                r#"INSERT INTO positions (member_id, symbol, amount_invested)
                    VALUES ($1, $2, $3)"#,
            )
            .bind(member_id)
            .bind(&pos.symbol)
            .bind(pos.amount_invested)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Deletes the member row only; the group persists even when emptied.
    pub async fn delete(&self, group_id: i32, user_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(r#"DELETE FROM members WHERE group_id = $1 AND user_id = $2"#)
            .bind(group_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
