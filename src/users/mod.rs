use lazy_static::lazy_static;
use regex::Regex;

pub mod password;
pub mod repo;
pub mod repo_types;

pub use repo::{DirectoryError, PgUserDirectory, UserDirectory};
pub use repo_types::User;

/// Drops surrounding whitespace. Case is kept as given; the directory matches
/// emails case-insensitively.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_string()
}

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}
