//! Profile repository for database operations

use async_trait::async_trait;
use barter::{
    GatewayError, ProfileGateway,
    models::{ProfileUpsert, UserProfile},
};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use super::gateway_error;

/// Profile repository
#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    /// Create a new profile repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn profile_from_row(row: &PgRow) -> Result<UserProfile, sqlx::Error> {
    Ok(UserProfile {
        id: row.try_get("id")?,
        full_name: row.try_get("full_name")?,
        email: row.try_get("email")?,
        bio: row.try_get("bio")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl ProfileGateway for ProfileRepository {
    async fn find_profile(&self, id: Uuid) -> Result<Option<UserProfile>, GatewayError> {
        let row = sqlx::query(
            r#"
            SELECT id, full_name, email, bio, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(gateway_error)?;

        row.as_ref()
            .map(profile_from_row)
            .transpose()
            .map_err(gateway_error)
    }

    async fn upsert_profile(&self, profile: &ProfileUpsert) -> Result<UserProfile, GatewayError> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (id, full_name, email, bio)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET
            full_name = EXCLUDED.full_name,
            email = EXCLUDED.email,
            bio = EXCLUDED.bio
            RETURNING id, full_name, email, bio, created_at
            "#,
        )
        .bind(profile.id)
        .bind(&profile.full_name)
        .bind(&profile.email)
        .bind(&profile.bio)
        .fetch_one(&self.pool)
        .await
        .map_err(gateway_error)?;

        profile_from_row(&row).map_err(gateway_error)
    }
}
