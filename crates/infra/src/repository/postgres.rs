//! Postgres-backed delivery store.
//!
//! Each delivery is one row: the full aggregate as a JSONB `document`, plus
//! scalar columns for the lookups (`order_id`, `tracking_id`, `status`).
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | RepositoryError |
//! |------------|----------------------|-----------------|
//! | Database (unique violation on `order_id`) | `23505` | `DuplicateOrder` |
//! | Database (other) | Any other | `Storage` |
//! | PoolClosed | N/A | `Storage` |
//! | Other | N/A | `Storage` |

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::{info, instrument, Span};

use shiptrack_core::{AggregateRoot, DeliveryId, OrderId, TrackingId};
use shiptrack_deliveries::{Delivery, DeliveryRepository, DeliveryStatus, RepositoryError};

use super::document::DeliveryDocument;

const SCHEMA: [&str; 2] = [
    r#"
    CREATE TABLE IF NOT EXISTS deliveries (
        id UUID PRIMARY KEY,
        order_id TEXT NOT NULL,
        tracking_id UUID NOT NULL,
        status TEXT NOT NULL,
        document JSONB NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CONSTRAINT deliveries_order_id_key UNIQUE (order_id),
        CONSTRAINT deliveries_tracking_id_key UNIQUE (tracking_id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS deliveries_status_idx ON deliveries (status)",
];

const ORDER_ID_CONSTRAINT: &str = "deliveries_order_id_key";

/// Explicitly opened connection handle.
///
/// Opened once at startup, passed to the repositories that need it, and
/// closed on shutdown.
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect and make sure the `deliveries` table exists.
    pub async fn connect(url: &str) -> Result<Self, RepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&pool)
                .await
                .map_err(|e| map_sqlx_error("bootstrap_schema", e))?;
        }

        info!("connected to postgres");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("postgres connection closed");
    }
}

#[derive(Debug, Clone)]
pub struct PostgresDeliveryRepository {
    pool: Arc<PgPool>,
}

impl PostgresDeliveryRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            pool: Arc::new(database.pool().clone()),
        }
    }
}

fn decode_optional(row: Option<PgRow>) -> Result<Option<Delivery>, RepositoryError> {
    row.as_ref().map(decode_row).transpose()
}

fn decode_row(row: &PgRow) -> Result<Delivery, RepositoryError> {
    let Json(document) = row
        .try_get::<Json<DeliveryDocument>, _>("document")
        .map_err(|e| RepositoryError::Corrupt(format!("failed to decode delivery document: {e}")))?;
    document.into_delivery()
}

#[async_trait]
impl DeliveryRepository for PostgresDeliveryRepository {
    #[instrument(skip(self, delivery), fields(delivery_id = %delivery.id(), order_id = %delivery.order_id()), err)]
    async fn save(&self, delivery: &Delivery) -> Result<(), RepositoryError> {
        let document = DeliveryDocument::from(delivery);

        let result = sqlx::query(
            r#"
            INSERT INTO deliveries (id, order_id, tracking_id, status, document, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id)
            DO UPDATE SET
                order_id = EXCLUDED.order_id,
                tracking_id = EXCLUDED.tracking_id,
                status = EXCLUDED.status,
                document = EXCLUDED.document,
                updated_at = NOW()
            "#,
        )
        .bind(*delivery.id().as_uuid())
        .bind(delivery.order_id().as_str())
        .bind(*delivery.tracking_id().as_uuid())
        .bind(delivery.status().as_str())
        .bind(Json(&document))
        .bind(delivery.created_at())
        .execute(&*self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if violates(&e, ORDER_ID_CONSTRAINT) => {
                Err(RepositoryError::DuplicateOrder(delivery.order_id().clone()))
            }
            Err(e) => Err(map_sqlx_error("save", e)),
        }
    }

    #[instrument(skip(self), fields(delivery_id = %id), err)]
    async fn find_by_id(&self, id: &DeliveryId) -> Result<Option<Delivery>, RepositoryError> {
        let row = sqlx::query("SELECT document FROM deliveries WHERE id = $1")
            .bind(*id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_id", e))?;
        decode_optional(row)
    }

    #[instrument(skip(self), fields(order_id = %order_id), err)]
    async fn find_by_order_id(
        &self,
        order_id: &OrderId,
    ) -> Result<Option<Delivery>, RepositoryError> {
        let row = sqlx::query("SELECT document FROM deliveries WHERE order_id = $1")
            .bind(order_id.as_str())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_order_id", e))?;
        decode_optional(row)
    }

    #[instrument(skip(self), fields(tracking_id = %tracking_id), err)]
    async fn find_by_tracking_id(
        &self,
        tracking_id: &TrackingId,
    ) -> Result<Option<Delivery>, RepositoryError> {
        let row = sqlx::query("SELECT document FROM deliveries WHERE tracking_id = $1")
            .bind(*tracking_id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_tracking_id", e))?;
        decode_optional(row)
    }

    #[instrument(skip(self), fields(delivery_count = tracing::field::Empty), err)]
    async fn find_active(&self) -> Result<Vec<Delivery>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT document FROM deliveries WHERE status <> $1 ORDER BY created_at ASC",
        )
        .bind(DeliveryStatus::Delivered.as_str())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_active", e))?;

        Span::current().record("delivery_count", rows.len());
        rows.iter().map(decode_row).collect()
    }
}

fn violates(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505") && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::Database(db_err) => {
            RepositoryError::Storage(format!("database error in {operation}: {}", db_err.message()))
        }
        sqlx::Error::PoolClosed => {
            RepositoryError::Storage(format!("connection pool closed in {operation}"))
        }
        other => RepositoryError::Storage(format!("sqlx error in {operation}: {other}")),
    }
}
