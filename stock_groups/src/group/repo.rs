use sqlx::Postgres;

use super::model::Group;

#[derive(Clone)]
pub struct GroupRepo {
    pub pool: sqlx::Pool<Postgres>,
}

impl GroupRepo {
    pub fn new(pool: sqlx::Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        name: &str,
        invite_code: &str,
        creator_id: &str,
    ) -> Result<Group, sqlx::Error> {
        sqlx::query_as::<_, Group>(
            r#"INSERT INTO groups (name, invite_code, creator_id, created_at)
                VALUES ($1, $2, $3, now())
                RETURNING group_id, name, invite_code, creator_id, created_at"#,
        )
        .bind(name)
        .bind(invite_code)
        .bind(creator_id)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn find_by_id(&self, group_id: i32) -> Result<Option<Group>, sqlx::Error> {
        sqlx::query_as::<_, Group>(
            r#"SELECT group_id, name, invite_code, creator_id, created_at
                FROM groups WHERE group_id = $1"#,
        )
        .bind(group_id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn find_by_invite_code(
        &self,
        invite_code: &str,
    ) -> Result<Option<Group>, sqlx::Error> {
        sqlx::query_as::<_, Group>(
            r#"SELECT group_id, name, invite_code, creator_id, created_at
                FROM groups WHERE invite_code = $1"#,
        )
        .bind(invite_code)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn invite_code_exists(&self, invite_code: &str) -> Result<bool, sqlx::Error> {
        let row: Option<(i32,)> =
            sqlx::query_as(r#"SELECT group_id FROM groups WHERE invite_code = $1"#)
                .bind(invite_code)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.is_some())
    }
}
