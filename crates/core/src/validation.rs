//! Form validation for new school records.
//!
//! Pure and synchronous: runs before any upload or insert.

use validator::ValidateEmail;

use crate::error::ValidationErrors;
use crate::intake::ImageUpload;
use crate::school::{NewSchool, SchoolForm};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const MIN_NAME_LEN: usize = 2;
pub const MIN_ADDRESS_LEN: usize = 5;
pub const MIN_CITY_LEN: usize = 2;
pub const MIN_STATE_LEN: usize = 2;
pub const MIN_CONTACT_DIGITS: usize = 10;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate every field of `form` and return the trimmed payload.
///
/// All failing fields are reported together, in form order. Lengths are
/// measured on the trimmed value in characters, not bytes.
pub fn validate_school(form: &SchoolForm) -> Result<NewSchool, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = form.name.trim();
    let address = form.address.trim();
    let city = form.city.trim();
    let state = form.state.trim();
    let contact = form.contact.trim();
    let email_id = form.email_id.trim().to_string();

    check_min_len(&mut errors, "name", "Name", name, MIN_NAME_LEN);
    check_min_len(&mut errors, "address", "Address", address, MIN_ADDRESS_LEN);
    check_min_len(&mut errors, "city", "City", city, MIN_CITY_LEN);
    check_min_len(&mut errors, "state", "State", state, MIN_STATE_LEN);
    check_contact(&mut errors, contact);

    if !email_id.validate_email() || !has_public_domain(&email_id) {
        errors.push("email_id", "Please enter a valid email address");
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(NewSchool {
        name: name.to_string(),
        address: address.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        contact: contact.to_string(),
        email_id,
        image_url: None,
    })
}

/// Validate `form` together with its optional image attachment.
///
/// A non-image attachment is reported on the `image` field, after any
/// form field errors.
pub fn validate_submission(
    form: &SchoolForm,
    image: Option<&ImageUpload>,
) -> Result<NewSchool, ValidationErrors> {
    let school = validate_school(form);
    let not_an_image =
        image.is_some_and(|image| !is_image_content_type(image.content_type.as_deref()));
    if !not_an_image {
        return school;
    }

    let mut errors = school.err().unwrap_or_default();
    errors.push("image", "Please choose an image file");
    Err(errors)
}

fn check_min_len(
    errors: &mut ValidationErrors,
    field: &'static str,
    label: &str,
    value: &str,
    min: usize,
) {
    if value.chars().count() < min {
        errors.push(field, format!("{label} must be at least {min} characters"));
    }
}

fn check_contact(errors: &mut ValidationErrors, contact: &str) {
    if contact.chars().count() < MIN_CONTACT_DIGITS {
        errors.push(
            "contact",
            format!("Contact must be at least {MIN_CONTACT_DIGITS} digits"),
        );
    }
    if contact.is_empty() || !contact.chars().all(|c| c.is_ascii_digit()) {
        errors.push("contact", "Contact must contain only numbers");
    }
}

/// Whether the domain of `email` is a dotted host name ending in an
/// alphabetic TLD. IP literals and single-label hosts are rejected.
fn has_public_domain(email: &str) -> bool {
    let Some((_, domain)) = email.rsplit_once('@') else {
        return false;
    };
    if domain.starts_with('[') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return false;
    }
    labels
        .last()
        .is_some_and(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()))
}

/// Whether a declared upload content type is acceptable for a school image.
///
/// A missing content type is accepted; the storage service infers one.
pub fn is_image_content_type(content_type: Option<&str>) -> bool {
    match content_type {
        None => true,
        Some(ct) => ct.trim().to_ascii_lowercase().starts_with("image/"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
