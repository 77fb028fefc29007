//! Intake flow: validate → optional image upload → insert.
//!
//! Upload strictly precedes insert because the insert payload carries the
//! image URL. Image upload is best-effort: any failure is logged and the
//! record is saved without an image. Insert failure fails the submission.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::CoreError;
use crate::naming;
use crate::school::{School, SchoolForm};
use crate::store::{ObjectStore, RecordStore, UploadOptions};
use crate::types::DbId;
use crate::validation::validate_submission;

/// An image attached to a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Filename as chosen by the user; only its extension is kept.
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Form state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStage {
    Validating,
    Uploading,
    Saving,
}

impl SubmissionStage {
    /// Progress percentage reported while in this stage.
    pub fn progress(self) -> u8 {
        match self {
            Self::Validating => 0,
            Self::Uploading => 50,
            Self::Saving => 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStatus {
    Idle,
    Submitting { stage: SubmissionStage },
    Succeeded { id: DbId },
    Failed,
}

/// Progress of one submission through the intake flow.
///
/// Concurrent submissions of the same form instance are refused by
/// [`InFlightRegistry`] before a form is created.
#[derive(Debug, Clone)]
pub struct IntakeForm {
    status: FormStatus,
}

impl Default for IntakeForm {
    fn default() -> Self {
        Self::new()
    }
}

impl IntakeForm {
    pub fn new() -> Self {
        Self {
            status: FormStatus::Idle,
        }
    }

    pub fn status(&self) -> FormStatus {
        self.status
    }

    fn advance(&mut self, stage: SubmissionStage) {
        tracing::debug!(?stage, progress = stage.progress(), "Submission stage");
        self.status = FormStatus::Submitting { stage };
    }

    /// Run one submission to completion.
    ///
    /// Validation errors and insert errors are returned; upload errors are
    /// not. On validation failure no store is touched.
    pub async fn submit(
        &mut self,
        records: &dyn RecordStore,
        objects: &dyn ObjectStore,
        form: &SchoolForm,
        image: Option<ImageUpload>,
    ) -> Result<School, CoreError> {
        self.advance(SubmissionStage::Validating);

        let school = match validate_submission(form, image.as_ref()) {
            Ok(school) => school,
            Err(errors) => {
                self.status = FormStatus::Failed;
                return Err(errors.into());
            }
        };

        let image_url = match image {
            Some(image) => {
                self.advance(SubmissionStage::Uploading);
                upload_image(objects, image).await
            }
            None => None,
        };

        self.advance(SubmissionStage::Saving);
        match records.insert(&school.with_image_url(image_url)).await {
            Ok(saved) => {
                tracing::info!(
                    school_id = saved.id,
                    has_image = saved.has_image(),
                    "School added"
                );
                self.status = FormStatus::Succeeded { id: saved.id };
                Ok(saved)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error adding school");
                self.status = FormStatus::Failed;
                Err(e.into())
            }
        }
    }
}

/// Upload `image` under a fresh key and return its public URL.
///
/// Never fails: errors are logged and mapped to `None`.
pub async fn upload_image(objects: &dyn ObjectStore, image: ImageUpload) -> Option<String> {
    let key = naming::object_key(&image.filename);
    let options = UploadOptions {
        overwrite: false,
        content_type: image.content_type,
    };

    match objects.upload(&key, image.bytes, &options).await {
        Ok(()) => {
            tracing::debug!(%key, "Uploaded school image");
            Some(objects.public_url(&key))
        }
        Err(e) => {
            tracing::warn!(error = %e, %key, "Error uploading image");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// In-flight registry
// ---------------------------------------------------------------------------

/// Tracks which form instances currently have a submission in flight.
#[derive(Debug, Default)]
pub struct InFlightRegistry {
    keys: Mutex<HashSet<String>>,
}

impl InFlightRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Claim `key` for the duration of a submission.
    ///
    /// Fails with [`CoreError::Conflict`] while another guard holds the same
    /// key. The claim is released when the guard is dropped.
    pub fn try_acquire(self: &Arc<Self>, key: &str) -> Result<InFlightGuard, CoreError> {
        let mut keys = self.keys.lock().unwrap_or_else(PoisonError::into_inner);
        if !keys.insert(key.to_string()) {
            return Err(CoreError::Conflict(
                "A submission for this form is already in progress".into(),
            ));
        }
        Ok(InFlightGuard {
            registry: Arc::clone(self),
            key: key.to_string(),
        })
    }

    pub fn is_in_flight(&self, key: &str) -> bool {
        self.keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }
}

#[derive(Debug)]
pub struct InFlightGuard {
    registry: Arc<InFlightRegistry>,
    key: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.registry
            .keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
