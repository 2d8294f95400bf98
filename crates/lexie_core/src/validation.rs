//! Contact field validation.
//!
//! Both site forms ask for the same three fields. Every field is checked on
//! submit so each one can show its own message.

use std::sync::LazyLock;

use regex::Regex;

use crate::constants::MIN_MESSAGE_CHARS;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}'\-\s]{2,60}$").expect("name pattern is valid"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9\s\-]{7,20}$").expect("phone pattern is valid"));

/// The fields both forms validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Phone,
    Message,
}

impl Field {
    pub fn all() -> &'static [Field] {
        &[Field::Name, Field::Phone, Field::Message]
    }
}

/// Why a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("Please enter your first and last name.")]
    MissingName,
    #[error("Please enter a valid name (2-60 letters).")]
    InvalidName,
    #[error("Please enter your phone number.")]
    MissingPhone,
    #[error("Please enter a valid phone number.")]
    InvalidPhone,
    #[error("Tell me a few words about the tattoo.")]
    MissingMessage,
    #[error("The message is too short (at least 10 characters).")]
    MessageTooShort,
}

/// Collapse whitespace runs (NBSP included) to single spaces and trim.
pub fn normalize_spaces(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn validate_name(value: &str) -> Result<(), FieldError> {
    let v = normalize_spaces(value);
    if v.is_empty() {
        return Err(FieldError::MissingName);
    }
    if !NAME_RE.is_match(&v) {
        return Err(FieldError::InvalidName);
    }
    Ok(())
}

pub fn validate_phone(value: &str) -> Result<(), FieldError> {
    let v = normalize_spaces(value);
    if v.is_empty() {
        return Err(FieldError::MissingPhone);
    }
    if !PHONE_RE.is_match(&v) {
        return Err(FieldError::InvalidPhone);
    }
    Ok(())
}

pub fn validate_message(value: &str) -> Result<(), FieldError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(FieldError::MissingMessage);
    }
    if v.chars().count() < MIN_MESSAGE_CHARS {
        return Err(FieldError::MessageTooShort);
    }
    Ok(())
}

/// Raw values of the three contact fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFields {
    pub name: String,
    pub phone: String,
    pub message: String,
}

impl ContactFields {
    /// Validate every field, without short-circuiting.
    pub fn validate(&self) -> ValidationReport {
        ValidationReport {
            name: validate_name(&self.name).err(),
            phone: validate_phone(&self.phone).err(),
            message: validate_message(&self.message).err(),
        }
    }
}

/// Per-field outcome of a submit attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub name: Option<FieldError>,
    pub phone: Option<FieldError>,
    pub message: Option<FieldError>,
}

impl ValidationReport {
    /// Error for one field, if it failed.
    pub fn error(&self, field: Field) -> Option<FieldError> {
        match field {
            Field::Name => self.name,
            Field::Phone => self.phone,
            Field::Message => self.message,
        }
    }

    /// Whether submission may proceed.
    pub fn is_valid(&self) -> bool {
        self.name.is_none() && self.phone.is_none() && self.message.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_accepts_full_names() {
        assert_eq!(validate_name("Anna Kowalska"), Ok(()));
        assert_eq!(validate_name("  Łucja   Żółć-Nowak "), Ok(()));
        assert_eq!(validate_name("Seán O'Brien"), Ok(()));
    }

    #[test]
    fn test_name_rejections() {
        assert_eq!(validate_name(""), Err(FieldError::MissingName));
        assert_eq!(validate_name("   "), Err(FieldError::MissingName));
        assert_eq!(validate_name("A"), Err(FieldError::InvalidName));
        assert_eq!(validate_name("John123"), Err(FieldError::InvalidName));
        assert_eq!(validate_name(&"a".repeat(61)), Err(FieldError::InvalidName));
    }

    #[test]
    fn test_name_nbsp_is_whitespace() {
        assert_eq!(validate_name("Anna\u{00A0}\u{00A0}Kowalska"), Ok(()));
    }

    #[test]
    fn test_phone() {
        assert_eq!(validate_phone("+48 123 456 789"), Ok(()));
        assert_eq!(validate_phone("123-456-789"), Ok(()));
        assert_eq!(validate_phone("abc"), Err(FieldError::InvalidPhone));
        assert_eq!(validate_phone("12345"), Err(FieldError::InvalidPhone));
        assert_eq!(validate_phone("48+123456789"), Err(FieldError::InvalidPhone));
        assert_eq!(validate_phone(" "), Err(FieldError::MissingPhone));
    }

    #[test]
    fn test_message_length_boundary() {
        assert_eq!(validate_message("   "), Err(FieldError::MissingMessage));
        assert_eq!(validate_message("  123456789  "), Err(FieldError::MessageTooShort));
        assert_eq!(validate_message("  1234567890  "), Ok(()));
        // Characters, not bytes.
        assert_eq!(validate_message("ąęółśżźćńą"), Ok(()));
    }

    #[test]
    fn test_report_checks_every_field() {
        let fields = ContactFields {
            name: "A".into(),
            phone: "abc".into(),
            message: "short".into(),
        };
        let report = fields.validate();
        assert!(!report.is_valid());
        assert_eq!(report.error(Field::Name), Some(FieldError::InvalidName));
        assert_eq!(report.error(Field::Phone), Some(FieldError::InvalidPhone));
        assert_eq!(report.error(Field::Message), Some(FieldError::MessageTooShort));
    }

    #[test]
    fn test_report_valid() {
        let fields = ContactFields {
            name: "Anna Kowalska".into(),
            phone: "+48 123 456 789".into(),
            message: "A small rose on the wrist".into(),
        };
        assert!(fields.validate().is_valid());
    }
}
