//! Exchange request repository for database operations

use async_trait::async_trait;
use barter::{
    ExchangeRequestGateway, GatewayError,
    models::{ExchangeRequest, ExchangeStatus, NewExchangeRequest},
};
use sqlx::{PgPool, Row};

use super::gateway_error;

/// Exchange request repository
#[derive(Clone)]
pub struct ExchangeRequestRepository {
    pool: PgPool,
}

impl ExchangeRequestRepository {
    /// Create a new exchange request repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExchangeRequestGateway for ExchangeRequestRepository {
    async fn insert_exchange_request(
        &self,
        request: &NewExchangeRequest,
    ) -> Result<ExchangeRequest, GatewayError> {
        let row = sqlx::query(
            r#"
            INSERT INTO exchange_requests (from_user_id, to_user_id, offer_id, message, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, from_user_id, to_user_id, offer_id, message, status, created_at
            "#,
        )
        .bind(request.from_user_id)
        .bind(request.to_user_id)
        .bind(request.offer_id)
        .bind(&request.message)
        .bind(request.status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(gateway_error)?;

        let status: String = row.try_get("status").map_err(gateway_error)?;

        Ok(ExchangeRequest {
            id: row.try_get("id").map_err(gateway_error)?,
            from_user_id: row.try_get("from_user_id").map_err(gateway_error)?,
            to_user_id: row.try_get("to_user_id").map_err(gateway_error)?,
            offer_id: row.try_get("offer_id").map_err(gateway_error)?,
            message: row.try_get("message").map_err(gateway_error)?,
            status: status
                .parse::<ExchangeStatus>()
                .map_err(|e| GatewayError::rejected(e.to_string()))?,
            created_at: row.try_get("created_at").map_err(gateway_error)?,
        })
    }
}
