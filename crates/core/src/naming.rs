//! Object key generation for uploaded school images.
//!
//! Keys have the shape `{token}_{unix_millis}.{ext}` so that two uploads of
//! the same file never target the same object.

use rand::Rng;

use crate::types::Timestamp;

/// Length of the random token prefix.
pub const TOKEN_LENGTH: usize = 11;

/// Build a fresh object key for `original_filename` using the current time.
pub fn object_key(original_filename: &str) -> String {
    object_key_at(original_filename, chrono::Utc::now())
}

/// Build an object key for `original_filename` at a fixed instant.
pub fn object_key_at(original_filename: &str, at: Timestamp) -> String {
    let token = random_token();
    let millis = at.timestamp_millis();
    match file_extension(original_filename) {
        Some(ext) => format!("{token}_{millis}.{ext}"),
        None => format!("{token}_{millis}"),
    }
}

/// Extension after the last `.`, lowercased.
///
/// Returns `None` when there is no dot, the extension is empty, or it
/// contains anything other than ASCII alphanumerics.
pub fn file_extension(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

fn random_token() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::TimeZone;

    use super::*;

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(file_extension("Campus.JPG").as_deref(), Some("jpg"));
        assert_eq!(file_extension("front.gate.png").as_deref(), Some("png"));
    }

    #[test]
    fn missing_or_odd_extensions() {
        assert_eq!(file_extension("campus"), None);
        assert_eq!(file_extension("campus."), None);
        assert_eq!(file_extension(".hidden"), None);
        assert_eq!(file_extension("campus.p/ng"), None);
    }

    #[test]
    fn key_shape() {
        let at = chrono::Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let key = object_key_at("Campus.PNG", at);
        let (token, rest) = key.split_once('_').unwrap();
        assert_eq!(token.len(), TOKEN_LENGTH);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        assert_eq!(rest, "1700000000123.png");
    }

    #[test]
    fn key_without_extension() {
        let at = chrono::Utc.timestamp_millis_opt(42).unwrap();
        let key = object_key_at("campus", at);
        assert!(key.ends_with("_42"));
    }

    #[test]
    fn keys_do_not_collide() {
        let at = chrono::Utc::now();
        let keys: HashSet<_> = (0..200).map(|_| object_key_at("a.png", at)).collect();
        assert_eq!(keys.len(), 200);
    }
}
