//! School record types.
//!
//! [`SchoolForm`] is untrusted input as submitted. [`NewSchool`] is the
//! validated, trimmed payload and can only be produced by
//! [`crate::validation::validate_school`]. [`School`] is a persisted row.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// A persisted school record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
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

impl School {
    pub fn has_image(&self) -> bool {
        self.image_url.is_some()
    }
}

/// Raw form values exactly as submitted. Missing fields default to empty
/// strings so they fail validation instead of deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SchoolForm {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub contact: String,
    pub email_id: String,
}

/// A validated record ready for insertion (no id, no timestamp yet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewSchool {
    pub(crate) name: String,
    pub(crate) address: String,
    pub(crate) city: String,
    pub(crate) state: String,
    pub(crate) contact: String,
    pub(crate) email_id: String,
    pub(crate) image_url: Option<String>,
}

impl NewSchool {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn contact(&self) -> &str {
        &self.contact
    }

    pub fn email_id(&self) -> &str {
        &self.email_id
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    /// Attach the public URL of an uploaded image (or clear it).
    pub fn with_image_url(mut self, image_url: Option<String>) -> Self {
        self.image_url = image_url;
        self
    }

    /// Combine with the store-assigned id and timestamp.
    ///
    /// Used by stores that assign ids themselves rather than returning a
    /// full row.
    pub fn into_school(self, id: DbId, created_at: Timestamp) -> School {
        School {
            id,
            name: self.name,
            address: self.address,
            city: self.city,
            state: self.state,
            contact: self.contact,
            email_id: self.email_id,
            image_url: self.image_url,
            created_at,
        }
    }
}
