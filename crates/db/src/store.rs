use async_trait::async_trait;
use schoolhub_core::error::StoreError;
use schoolhub_core::school::{NewSchool, School};
use schoolhub_core::store::RecordStore;

use crate::repositories::SchoolRepo;
use crate::DbPool;

/// [`RecordStore`] backed by the `schools` table.
#[derive(Debug, Clone)]
pub struct PgRecordStore {
    pool: DbPool,
}

impl PgRecordStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn insert(&self, school: &NewSchool) -> Result<School, StoreError> {
        let row = SchoolRepo::create(&self.pool, school)
            .await
            .map_err(classify_sqlx_error)?;
        Ok(row.into())
    }

    async fn list_newest_first(&self) -> Result<Vec<School>, StoreError> {
        let rows = SchoolRepo::list_newest_first(&self.pool)
            .await
            .map_err(classify_sqlx_error)?;
        Ok(rows.into_iter().map(School::from).collect())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool)
            .await
            .map_err(classify_sqlx_error)
    }
}

/// Map a sqlx error onto the store error taxonomy.
///
/// Errors raised by the database itself (constraint violations, permission
/// errors) are rejections; everything else means the store was unreachable.
fn classify_sqlx_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            tracing::error!(error = %db_err, code = ?db_err.code(), "Database rejected request");
            StoreError::Rejected(db_err.message().to_string())
        }
        other => {
            tracing::error!(error = %other, "Database error");
            StoreError::Unavailable(other.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_errors_are_unavailable() {
        let err = classify_sqlx_error(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[test]
    fn missing_rows_are_unavailable() {
        let err = classify_sqlx_error(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
