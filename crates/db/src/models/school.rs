//! Row type for the `schools` table.

use schoolhub_core::school::School;
use schoolhub_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `schools` table.
#[derive(Debug, Clone, FromRow)]
pub struct SchoolRow {
    pub id: DbId,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub contact: String,
    pub email_id: String,
    pub image_url: Option<String>,
    pub created_at: Timestamp,
}

impl From<SchoolRow> for School {
    fn from(row: SchoolRow) -> Self {
        School {
            id: row.id,
            name: row.name,
            address: row.address,
            city: row.city,
            state: row.state,
            contact: row.contact,
            email_id: row.email_id,
            image_url: row.image_url,
            created_at: row.created_at,
        }
    }
}
