//! Sign-up form model and its browser-side validation rules

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::domain::participant::{
    confirmation_message, parse_leading_int, MAX_TEAM_SIZE, MIN_TEAM_SIZE,
};

/// Looser than the server rule: anything shaped like `x@y.z`
static CLIENT_EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// The two sign-up forms on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    /// Inline form on the main page
    Main,
    /// Form inside the registration modal
    Modal,
}

/// Input fields of a sign-up form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Name,
    Email,
    Team,
}

/// Raw field values as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pub name: String,
    pub email: String,
    pub team: String,
}

impl FormValues {
    pub fn new(name: impl Into<String>, email: impl Into<String>, team: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            team: team.into(),
        }
    }
}

/// A submission that passed validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub name: String,
    pub email: String,
    pub team_size: i64,
}

impl Submission {
    /// Text of the success overlay
    pub fn confirmation(&self) -> String {
        confirmation_message(&self.name, self.team_size)
    }
}

/// One form instance: values, invalid marks and a form-level message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub values: FormValues,
    pub invalid: BTreeSet<FormField>,
    /// Message from the server after a rejected submission
    pub error: Option<String>,
}

impl FormState {
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();

        match field {
            FormField::Name => self.values.name = value,
            FormField::Email => self.values.email = value,
            FormField::Team => self.values.team = value,
        }
    }

    pub fn is_marked(&self, field: FormField) -> bool {
        self.invalid.contains(&field)
    }

    /// Clear values, marks and messages
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Re-check every field, replacing the previous marks
    pub fn validate(&mut self) -> Result<Submission, Vec<FormField>> {
        self.invalid.clear();
        self.error = None;

        let result = validate_form(&self.values);

        if let Err(fields) = &result {
            self.invalid.extend(fields.iter().copied());
        }

        result
    }
}

/// Check the browser-side rules, reporting every invalid field
pub fn validate_form(values: &FormValues) -> Result<Submission, Vec<FormField>> {
    let mut invalid = Vec::new();

    if values.name.trim().is_empty() {
        invalid.push(FormField::Name);
    }

    if !CLIENT_EMAIL_PATTERN.is_match(&values.email) {
        invalid.push(FormField::Email);
    }

    let team_size = parse_leading_int(&values.team)
        .filter(|n| (i64::from(MIN_TEAM_SIZE)..=i64::from(MAX_TEAM_SIZE)).contains(n));

    if team_size.is_none() {
        invalid.push(FormField::Team);
    }

    match team_size {
        Some(team_size) if invalid.is_empty() => Ok(Submission {
            name: values.name.clone(),
            email: values.email.clone(),
            team_size,
        }),
        _ => Err(invalid),
    }
}
