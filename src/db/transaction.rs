//! Transaction bookkeeping shared by every multi-statement write.
//!
//! ```rust,ignore
//! let (txn, scope) = db::begin(&self.db, "Order creation").await?;
//! let result = self.create_in(&txn, input).await;
//! scope.finish(txn, result).await
//! ```

use crate::errors::ServiceError;
use metrics::{counter, histogram};
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use std::time::Instant;
use tracing::{debug, warn};

/// Timing and labelling for one open transaction.
#[derive(Debug)]
pub struct TxnScope {
    action: &'static str,
    started: Instant,
}

/// Opens a transaction for `action` (a human label such as "Builty creation").
pub async fn begin(
    db: &DatabaseConnection,
    action: &'static str,
) -> Result<(DatabaseTransaction, TxnScope), ServiceError> {
    counter!("transport_db.transaction.started", 1);
    let txn = db
        .begin()
        .await
        .map_err(|e| ServiceError::from_db(action, e))?;
    debug!(action, "Transaction started");

    Ok((
        txn,
        TxnScope {
            action,
            started: Instant::now(),
        },
    ))
}

impl TxnScope {
    /// Commits on success and rolls back on failure. Database errors raised
    /// inside the body are classified against the action label here.
    pub async fn finish<T>(
        self,
        txn: DatabaseTransaction,
        result: Result<T, ServiceError>,
    ) -> Result<T, ServiceError> {
        let outcome = match result {
            Ok(value) => txn
                .commit()
                .await
                .map(|_| value)
                .map_err(|e| ServiceError::from_db(self.action, e)),
            Err(err) => {
                if let Err(rollback_err) = txn.rollback().await {
                    warn!(action = self.action, error = %rollback_err, "Rollback failed");
                }
                Err(match err {
                    ServiceError::DatabaseError(db_err) => ServiceError::from_db(self.action, db_err),
                    other => other,
                })
            }
        };

        histogram!("transport_db.transaction.duration", self.started.elapsed());
        match &outcome {
            Ok(_) => {
                counter!("transport_db.transaction.committed", 1);
                debug!(action = self.action, elapsed = ?self.started.elapsed(), "Transaction committed");
            }
            Err(e) => {
                counter!("transport_db.transaction.rolled_back", 1);
                warn!(action = self.action, error = %e, "Transaction rolled back");
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ConnectOptions, ConnectionTrait, Database, Statement};

    async fn scratch_db() -> DatabaseConnection {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1);
        let db = Database::connect(opt).await.unwrap();
        db.execute_unprepared("CREATE TABLE t (id INTEGER PRIMARY KEY)")
            .await
            .unwrap();
        db
    }

    async fn count(db: &DatabaseConnection) -> i64 {
        let row = db
            .query_one(Statement::from_string(
                db.get_database_backend(),
                "SELECT COUNT(*) AS n FROM t",
            ))
            .await
            .unwrap()
            .unwrap();
        row.try_get("", "n").unwrap()
    }

    #[tokio::test]
    async fn failed_body_rolls_back() {
        let db = scratch_db().await;
        let (txn, scope) = begin(&db, "Scratch insert").await.unwrap();
        txn.execute_unprepared("INSERT INTO t (id) VALUES (1)")
            .await
            .unwrap();

        let result: Result<(), _> = scope
            .finish(txn, Err(ServiceError::BadRequest("nope".into())))
            .await;

        assert!(matches!(result, Err(ServiceError::BadRequest(_))));
        assert_eq!(count(&db).await, 0);
    }

    #[tokio::test]
    async fn successful_body_commits() {
        let db = scratch_db().await;
        let (txn, scope) = begin(&db, "Scratch insert").await.unwrap();
        txn.execute_unprepared("INSERT INTO t (id) VALUES (1)")
            .await
            .unwrap();

        scope.finish(txn, Ok(())).await.unwrap();
        assert_eq!(count(&db).await, 1);
    }

    #[tokio::test]
    async fn lock_errors_in_body_become_retry_hints() {
        let db = scratch_db().await;
        let (txn, scope) = begin(&db, "Builty creation").await.unwrap();
        let result: Result<(), _> = scope
            .finish(
                txn,
                Err(ServiceError::DatabaseError(sea_orm::DbErr::Custom(
                    "database is locked".into(),
                ))),
            )
            .await;

        assert_eq!(
            result.unwrap_err().response_message(),
            "Builty creation failed due to system load. Please try again."
        );
    }
}
