//! Subscription store — lifecycle of registered push endpoints.
//!
//! Registration is an upsert keyed on `(employee_id, endpoint)`: a browser
//! that rotates its keys rekeys the existing row instead of duplicating it.
//! Deletes are idempotent single-row operations so eviction and explicit
//! unsubscribe never need coordination.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use taskpulse_common::error::AppError;
use taskpulse_common::types::PushSubscription;

/// Persistence operations the delivery pipeline consumes.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// All subscriptions belonging to the given employees. Callers must
    /// reject an empty id list before reaching the store (broadcast is the
    /// way to address everyone).
    async fn list_by_employees(
        &self,
        employee_ids: &[Uuid],
    ) -> Result<Vec<PushSubscription>, AppError>;

    /// Every stored subscription (broadcast mode).
    async fn list_all(&self) -> Result<Vec<PushSubscription>, AppError>;

    /// Subscriptions for a single employee, newest first.
    async fn list_by_employee(
        &self,
        employee_id: Uuid,
    ) -> Result<Vec<PushSubscription>, AppError>;

    /// Register or rekey a device. Unique on `(employee_id, endpoint)`.
    async fn upsert(
        &self,
        employee_id: Uuid,
        endpoint: &str,
        p256dh: &str,
        auth: &str,
    ) -> Result<PushSubscription, AppError>;

    /// Remove one subscription by primary key. Idempotent; used for
    /// eviction of endpoints the vendor reports as gone.
    async fn delete_by_id(&self, id: Uuid) -> Result<(), AppError>;

    /// Explicit unsubscribe of one device. Returns whether a row existed.
    async fn delete_by_endpoint(
        &self,
        employee_id: Uuid,
        endpoint: &str,
    ) -> Result<bool, AppError>;
}

/// PostgreSQL-backed store.
pub struct PgSubscriptionStore {
    pool: PgPool,
}

impl PgSubscriptionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionStore for PgSubscriptionStore {
    async fn list_by_employees(
        &self,
        employee_ids: &[Uuid],
    ) -> Result<Vec<PushSubscription>, AppError> {
        let subs: Vec<PushSubscription> = sqlx::query_as(
            "SELECT * FROM push_subscriptions WHERE employee_id = ANY($1) ORDER BY created_at",
        )
        .bind(employee_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(subs)
    }

    async fn list_all(&self) -> Result<Vec<PushSubscription>, AppError> {
        let subs: Vec<PushSubscription> =
            sqlx::query_as("SELECT * FROM push_subscriptions ORDER BY created_at")
                .fetch_all(&self.pool)
                .await?;

        Ok(subs)
    }

    async fn list_by_employee(
        &self,
        employee_id: Uuid,
    ) -> Result<Vec<PushSubscription>, AppError> {
        let subs: Vec<PushSubscription> = sqlx::query_as(
            "SELECT * FROM push_subscriptions WHERE employee_id = $1 ORDER BY created_at DESC",
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(subs)
    }

    async fn upsert(
        &self,
        employee_id: Uuid,
        endpoint: &str,
        p256dh: &str,
        auth: &str,
    ) -> Result<PushSubscription, AppError> {
        let sub: PushSubscription = sqlx::query_as(
            r#"
            INSERT INTO push_subscriptions (id, employee_id, endpoint, p256dh, auth)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (employee_id, endpoint)
            DO UPDATE SET p256dh = EXCLUDED.p256dh,
                          auth = EXCLUDED.auth,
                          updated_at = now()
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(employee_id)
        .bind(endpoint)
        .bind(p256dh)
        .bind(auth)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(
            subscription_id = %sub.id,
            employee_id = %employee_id,
            "Push subscription registered"
        );

        Ok(sub)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM push_subscriptions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            tracing::info!(subscription_id = %id, "Push subscription deleted");
        }

        Ok(())
    }

    async fn delete_by_endpoint(
        &self,
        employee_id: Uuid,
        endpoint: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "DELETE FROM push_subscriptions WHERE employee_id = $1 AND endpoint = $2",
        )
        .bind(employee_id)
        .bind(endpoint)
        .execute(&self.pool)
        .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!(employee_id = %employee_id, "Push subscription unsubscribed");
        }

        Ok(deleted)
    }
}
