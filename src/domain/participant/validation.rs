//! Participant validation
//!
//! Registration input is checked field by field and every violation is
//! collected, so a caller can report all of them at once.

use once_cell::sync::Lazy;
use serde::Deserialize;
use thiserror::Error;

/// Maximum length for a participant name, in characters
pub const MAX_NAME_LENGTH: usize = 100;

/// Smallest allowed team
pub const MIN_TEAM_SIZE: u8 = 1;

/// Largest allowed team
pub const MAX_TEAM_SIZE: u8 = 10;

/// Email pattern accepted for registrations (applied after lowercasing).
/// Word characters are ASCII only.
static EMAIL_PATTERN: Lazy<regex::Regex> = Lazy::new(|| {
    regex::Regex::new(
        r"^[A-Za-z0-9_]+([.-]?[A-Za-z0-9_]+)*@[A-Za-z0-9_]+([.-]?[A-Za-z0-9_]+)*(\.[A-Za-z0-9_]{2,3})+$",
    )
    .unwrap()
});

/// Errors that can occur during participant validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParticipantValidationError {
    #[error("Name is required")]
    NameRequired,

    #[error("Name cannot exceed {0} characters")]
    NameTooLong(usize),

    #[error("Email is required")]
    EmailRequired,

    #[error("Please enter a valid email")]
    InvalidEmail,

    #[error("Team size is required")]
    TeamSizeRequired,

    #[error("Team size must be a whole number")]
    TeamSizeNotANumber,

    #[error("Team size must be at least {0}")]
    TeamSizeTooSmall(u8),

    #[error("Team size cannot exceed {0}")]
    TeamSizeTooLarge(u8),
}

impl ParticipantValidationError {
    /// Name of the input field the error refers to
    pub fn field(&self) -> &'static str {
        match self {
            Self::NameRequired | Self::NameTooLong(_) => "name",
            Self::EmailRequired | Self::InvalidEmail => "email",
            Self::TeamSizeRequired
            | Self::TeamSizeNotANumber
            | Self::TeamSizeTooSmall(_)
            | Self::TeamSizeTooLarge(_) => "teamSize",
        }
    }
}

/// Team size as submitted: JSON bodies may carry a number or a string,
/// form bodies always carry a string
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TeamSizeInput {
    Number(f64),
    Text(String),
}

impl TeamSizeInput {
    /// Integer value of the input, `None` when it holds no leading integer
    pub fn parse(&self) -> Option<i64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(n.trunc() as i64),
            Self::Number(_) => None,
            Self::Text(s) => parse_leading_int(s),
        }
    }
}

impl From<i32> for TeamSizeInput {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for TeamSizeInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Raw registration input, before any normalization
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub team_size: Option<TeamSizeInput>,
}

impl RegistrationInput {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        team_size: impl Into<TeamSizeInput>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            team_size: Some(team_size.into()),
        }
    }
}

/// Registration input that passed validation, already normalized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRegistration {
    pub name: String,
    pub email: String,
    pub team_size: u8,
}

/// Parse the leading integer of a string: optional surrounding whitespace and
/// sign, then the run of decimal digits. Trailing text is ignored.
pub fn parse_leading_int(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: &str = {
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        &rest[..end]
    };

    if digits.is_empty() {
        return None;
    }

    // Overlong digit runs saturate; they are out of range either way
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Normalize an email the way it is stored: trimmed and lowercased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Check a normalized email against the accepted pattern
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Validate a participant name (already trimmed)
pub fn validate_name(name: &str) -> Result<(), ParticipantValidationError> {
    if name.is_empty() {
        return Err(ParticipantValidationError::NameRequired);
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ParticipantValidationError::NameTooLong(MAX_NAME_LENGTH));
    }

    Ok(())
}

/// Validate a team size already parsed to an integer
pub fn validate_team_size(size: i64) -> Result<u8, ParticipantValidationError> {
    if size < i64::from(MIN_TEAM_SIZE) {
        return Err(ParticipantValidationError::TeamSizeTooSmall(MIN_TEAM_SIZE));
    }

    if size > i64::from(MAX_TEAM_SIZE) {
        return Err(ParticipantValidationError::TeamSizeTooLarge(MAX_TEAM_SIZE));
    }

    Ok(size as u8)
}

/// Validate and normalize a registration, collecting every violation
pub fn validate_registration(
    input: &RegistrationInput,
) -> Result<ValidRegistration, Vec<ParticipantValidationError>> {
    let mut errors = Vec::new();

    let name = input.name.as_deref().map(str::trim).unwrap_or_default();

    if let Err(e) = validate_name(name) {
        errors.push(e);
    }

    let email = input
        .email
        .as_deref()
        .map(normalize_email)
        .unwrap_or_default();

    if email.is_empty() {
        errors.push(ParticipantValidationError::EmailRequired);
    } else if !is_valid_email(&email) {
        errors.push(ParticipantValidationError::InvalidEmail);
    }

    let team_size = match &input.team_size {
        None => {
            errors.push(ParticipantValidationError::TeamSizeRequired);
            None
        }
        Some(TeamSizeInput::Text(s)) if s.trim().is_empty() => {
            errors.push(ParticipantValidationError::TeamSizeRequired);
            None
        }
        Some(raw) => match raw.parse() {
            None => {
                errors.push(ParticipantValidationError::TeamSizeNotANumber);
                None
            }
            Some(size) => match validate_team_size(size) {
                Ok(size) => Some(size),
                Err(e) => {
                    errors.push(e);
                    None
                }
            },
        },
    };

    match team_size {
        Some(team_size) if errors.is_empty() => Ok(ValidRegistration {
            name: name.to_string(),
            email,
            team_size,
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_registration_is_normalized() {
        let input = RegistrationInput::new("  Ada  ", "  ADA@X.COM ", 3);
        let valid = validate_registration(&input).unwrap();

        assert_eq!(valid.name, "Ada");
        assert_eq!(valid.email, "ada@x.com");
        assert_eq!(valid.team_size, 3);
    }

    #[test]
    fn test_team_size_bounds() {
        assert!(validate_registration(&RegistrationInput::new("A", "a@b.co", 1)).is_ok());
        assert!(validate_registration(&RegistrationInput::new("A", "a@b.co", 10)).is_ok());

        let errors = validate_registration(&RegistrationInput::new("A", "a@b.co", 11)).unwrap_err();
        assert_eq!(errors, vec![ParticipantValidationError::TeamSizeTooLarge(10)]);
        assert_eq!(errors[0].to_string(), "Team size cannot exceed 10");

        let errors = validate_registration(&RegistrationInput::new("A", "a@b.co", 0)).unwrap_err();
        assert_eq!(errors[0].to_string(), "Team size must be at least 1");
    }

    #[test]
    fn test_all_violations_are_reported_in_field_order() {
        let input = RegistrationInput::new("   ", "not-an-email", "lots");
        let errors = validate_registration(&input).unwrap_err();

        assert_eq!(
            errors,
            vec![
                ParticipantValidationError::NameRequired,
                ParticipantValidationError::InvalidEmail,
                ParticipantValidationError::TeamSizeNotANumber,
            ]
        );
        assert_eq!(
            errors.iter().map(|e| e.field()).collect::<Vec<_>>(),
            vec!["name", "email", "teamSize"]
        );
    }

    #[test]
    fn test_missing_fields_are_required() {
        let errors = validate_registration(&RegistrationInput::default()).unwrap_err();
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();

        assert_eq!(
            messages,
            vec!["Name is required", "Email is required", "Team size is required"]
        );
    }

    #[test]
    fn test_name_length_counts_characters() {
        let exact = "é".repeat(MAX_NAME_LENGTH);
        assert!(validate_name(&exact).is_ok());

        let long = "a".repeat(MAX_NAME_LENGTH + 1);
        assert_eq!(
            validate_name(&long),
            Err(ParticipantValidationError::NameTooLong(100))
        );
    }

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("ada@x.com"));
        assert!(is_valid_email("first.last@mail.example.org"));
        assert!(is_valid_email("a-b@c-d.io"));
        assert!(!is_valid_email("ada@x"));
        assert!(!is_valid_email("ada@x.travel"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("ada x@y.com"));
    }

    #[test]
    fn test_email_pattern_rejects_non_ascii_word_chars() {
        assert!(!is_valid_email("josé@x.com"));
        assert!(!is_valid_email("ада@пример.рф"));
        assert!(!is_valid_email("a@b.日本"));
        assert!(!is_valid_email("ada@exämple.com"));
        assert!(is_valid_email("under_score@x.co"));
    }

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("3"), Some(3));
        assert_eq!(parse_leading_int("  7 "), Some(7));
        assert_eq!(parse_leading_int("4.9"), Some(4));
        assert_eq!(parse_leading_int("5 people"), Some(5));
        assert_eq!(parse_leading_int("-2"), Some(-2));
        assert_eq!(parse_leading_int("+8"), Some(8));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("99999999999999999999999"), Some(i64::MAX));
    }

    #[test]
    fn test_team_size_input_from_json() {
        let number: TeamSizeInput = serde_json::from_str("4.7").unwrap();
        assert_eq!(number.parse(), Some(4));

        let text: TeamSizeInput = serde_json::from_str("\"6\"").unwrap();
        assert_eq!(text.parse(), Some(6));
    }

    #[test]
    fn test_registration_input_deserializes_camel_case() {
        let input: RegistrationInput =
            serde_json::from_str(r#"{"name":"Ada","email":"ada@x.com","teamSize":3}"#).unwrap();

        assert_eq!(input.name.as_deref(), Some("Ada"));
        assert_eq!(input.team_size, Some(TeamSizeInput::Number(3.0)));
    }
}
