//! Offer repository for database operations

use async_trait::async_trait;
use barter::{
    GatewayError, OfferGateway,
    models::{Category, NewOffer, Offer, OfferKind, OfferOwner},
};
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::warn;
use uuid::Uuid;

use super::gateway_error;

/// Offer repository
#[derive(Clone)]
pub struct OfferRepository {
    pool: PgPool,
}

impl OfferRepository {
    /// Create a new offer repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Convert a joined `offers`/`users` row, naming the first unusable column
fn offer_from_row(row: &PgRow) -> Result<Offer, String> {
    fn required<T>(value: Option<T>, column: &str) -> Result<T, String> {
        value.ok_or_else(|| format!("{column} is null"))
    }

    let text = |column: &str| -> Result<String, String> {
        let value: Option<String> = row.try_get(column).map_err(|e| e.to_string())?;
        required(value, column)
    };

    let user_id: Option<Uuid> = row.try_get("user_id").map_err(|e| e.to_string())?;
    let created_at: Option<DateTime<Utc>> =
        row.try_get("created_at").map_err(|e| e.to_string())?;
    let tags: Option<Vec<String>> = row.try_get("tags").map_err(|e| e.to_string())?;

    Ok(Offer {
        id: row.try_get("id").map_err(|e| e.to_string())?,
        user_id: required(user_id, "user_id")?,
        title: text("title")?,
        description: text("description")?,
        category: text("category")?
            .parse::<Category>()
            .map_err(|e| e.to_string())?,
        kind: text("type")?.parse::<OfferKind>().map_err(|e| e.to_string())?,
        tags: tags.filter(|tags| !tags.is_empty()),
        created_at: required(created_at, "created_at")?,
        owner: Some(OfferOwner {
            full_name: row.try_get("full_name").map_err(|e| e.to_string())?,
            email: row.try_get("email").map_err(|e| e.to_string())?,
        }),
    })
}

/// Keep the rows that convert, logging the rest
///
/// The migrated schema rejects such rows on write, so anything dropped here
/// was written around it.
fn offers_from_rows(rows: Vec<PgRow>) -> Vec<Offer> {
    rows.iter()
        .filter_map(|row| match offer_from_row(row) {
            Ok(offer) => Some(offer),
            Err(reason) => {
                let id: Option<Uuid> = row.try_get("id").ok();
                warn!("Skipping malformed offer row {:?}: {}", id, reason);
                None
            }
        })
        .collect()
}

#[async_trait]
impl OfferGateway for OfferRepository {
    async fn list_offers(&self, owner: Option<Uuid>) -> Result<Vec<Offer>, GatewayError> {
        let rows = sqlx::query(
            r#"
            SELECT o.id, o.user_id, o.title, o.description, o.category, o.type, o.tags,
                   o.created_at, u.full_name, u.email
            FROM offers o
            LEFT JOIN users u ON u.id = o.user_id
            WHERE $1::uuid IS NULL OR o.user_id = $1
            ORDER BY o.created_at DESC
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(gateway_error)?;

        Ok(offers_from_rows(rows))
    }

    async fn find_offer(&self, id: Uuid) -> Result<Option<Offer>, GatewayError> {
        let row = sqlx::query(
            r#"
            SELECT o.id, o.user_id, o.title, o.description, o.category, o.type, o.tags,
                   o.created_at, u.full_name, u.email
            FROM offers o
            LEFT JOIN users u ON u.id = o.user_id
            WHERE o.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(gateway_error)?;

        match row {
            Some(row) => Ok(offers_from_rows(vec![row]).pop()),
            None => Ok(None),
        }
    }

    async fn insert_offer(&self, offer: &NewOffer) -> Result<Offer, GatewayError> {
        let row = sqlx::query(
            r#"
            WITH inserted AS (
                INSERT INTO offers (user_id, title, description, category, type, tags)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id, user_id, title, description, category, type, tags, created_at
            )
            SELECT i.id, i.user_id, i.title, i.description, i.category, i.type, i.tags,
                   i.created_at, u.full_name, u.email
            FROM inserted i
            LEFT JOIN users u ON u.id = i.user_id
            "#,
        )
        .bind(offer.user_id)
        .bind(&offer.title)
        .bind(&offer.description)
        .bind(offer.category.as_str())
        .bind(offer.kind.as_str())
        .bind(&offer.tags)
        .fetch_one(&self.pool)
        .await
        .map_err(gateway_error)?;

        offer_from_row(&row).map_err(GatewayError::rejected)
    }
}
