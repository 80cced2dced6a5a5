use std::future::Future;
use std::pin::Pin;

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionError, TransactionTrait};

use crate::error::AppError;

/// Run `f` in a transaction: commit on `Ok`, roll back on `Err`.
///
/// ```ignore
/// with_txn(db, |txn| Box::pin(async move { repos::skills::insert(txn, item).await })).await
/// ```
pub async fn with_txn<R, F>(db: &DatabaseConnection, f: F) -> Result<R, AppError>
where
    F: for<'c> FnOnce(
            &'c DatabaseTransaction,
        ) -> Pin<Box<dyn Future<Output = Result<R, AppError>> + Send + 'c>>
        + Send,
    R: Send,
{
    db.transaction::<_, R, AppError>(f)
        .await
        .map_err(|e| match e {
            TransactionError::Connection(db_err) => AppError::from(db_err),
            TransactionError::Transaction(app_err) => app_err,
        })
}
