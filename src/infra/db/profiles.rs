use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{ProfilesRepo, RepoError},
    domain::entities::{ProfileAccount, ProfileRecord},
};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: i64,
    name: String,
    created_at: OffsetDateTime,
}

impl From<ProfileRow> for ProfileRecord {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ProfileAccountRow {
    id: i64,
    auth_id: Uuid,
    name: String,
    name_change: i32,
    created_at: OffsetDateTime,
}

impl From<ProfileAccountRow> for ProfileAccount {
    fn from(row: ProfileAccountRow) -> Self {
        Self {
            id: row.id,
            auth_id: row.auth_id,
            name: row.name,
            name_change: row.name_change,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl ProfilesRepo for PostgresRepositories {
    async fn list_profiles(&self) -> Result<Vec<ProfileRecord>, RepoError> {
        let rows = sqlx::query_as::<_, ProfileRow>(
            "SELECT id, name, created_at FROM profiles ORDER BY id",
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ProfileRecord::from).collect())
    }

    async fn find_profile(&self, id: i64) -> Result<Option<ProfileRecord>, RepoError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            "SELECT id, name, created_at FROM profiles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(ProfileRecord::from))
    }

    async fn find_by_auth_id(&self, auth_id: Uuid) -> Result<Option<ProfileAccount>, RepoError> {
        let row = sqlx::query_as::<_, ProfileAccountRow>(
            "SELECT id, auth_id, name, name_change, created_at FROM profiles WHERE auth_id = $1",
        )
        .bind(auth_id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(ProfileAccount::from))
    }

    async fn create_profile(&self, name: &str, auth_id: Uuid) -> Result<ProfileRecord, RepoError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            INSERT INTO profiles (name, auth_id)
            VALUES ($1, $2)
            RETURNING id, name, created_at
            "#,
        )
        .bind(name)
        .bind(auth_id)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn rename_profile(
        &self,
        auth_id: Uuid,
        name: &str,
    ) -> Result<Option<ProfileAccount>, RepoError> {
        let row = sqlx::query_as::<_, ProfileAccountRow>(
            r#"
            UPDATE profiles
            SET name = $1, name_change = 0
            WHERE auth_id = $2 AND name_change > 0
            RETURNING id, auth_id, name, name_change, created_at
            "#,
        )
        .bind(name)
        .bind(auth_id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(ProfileAccount::from))
    }

    async fn delete_profile(&self, auth_id: Uuid) -> Result<Option<ProfileAccount>, RepoError> {
        let row = sqlx::query_as::<_, ProfileAccountRow>(
            r#"
            DELETE FROM profiles
            WHERE auth_id = $1
            RETURNING id, auth_id, name, name_change, created_at
            "#,
        )
        .bind(auth_id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(ProfileAccount::from))
    }

    async fn auth_user_exists(&self, auth_id: Uuid) -> Result<bool, RepoError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM auth.users WHERE id = $1)")
            .bind(auth_id)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)
    }

    async fn email_registered(&self, email: &str) -> Result<bool, RepoError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM auth.users WHERE LOWER(email) = LOWER($1))",
        )
        .bind(email)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)
    }
}
