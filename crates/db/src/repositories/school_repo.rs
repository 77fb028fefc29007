//! Repository for the `schools` table.
//!
//! Records are insert-only: there is no update or delete.

use schoolhub_core::school::NewSchool;
use sqlx::PgPool;

use crate::models::school::SchoolRow;

/// Column list for `schools` queries.
const COLUMNS: &str = "\
    id, name, address, city, state, contact, email_id, \
    image_url, created_at";

pub struct SchoolRepo;

impl SchoolRepo {
    /// Insert a validated school, returning the stored row.
    pub async fn create(pool: &PgPool, input: &NewSchool) -> Result<SchoolRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO schools \
                (name, address, city, state, contact, email_id, image_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SchoolRow>(&query)
            .bind(input.name())
            .bind(input.address())
            .bind(input.city())
            .bind(input.state())
            .bind(input.contact())
            .bind(input.email_id())
            .bind(input.image_url())
            .fetch_one(pool)
            .await
    }

    /// All schools, newest first. Ties on `created_at` fall back to id.
    pub async fn list_newest_first(pool: &PgPool) -> Result<Vec<SchoolRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM schools ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, SchoolRow>(&query).fetch_all(pool).await
    }
}
