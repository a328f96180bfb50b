use std::{collections::BTreeMap, fmt};

use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;

/// Key used for messages that belong to the whole form rather than one field.
pub const FORM_ERRORS: &str = "form";

/// Validation messages keyed by form field, in field-name order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    /// `Ok(())` when nothing was recorded, otherwise a [`ServiceError::Validation`].
    pub fn into_result(self) -> Result<(), ServiceError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    /// One or more fields failed a domain rule.
    #[error("invalid input: {0}")]
    Validation(FieldErrors),
    /// A uniqueness, foreign-key or delete-policy constraint was violated.
    #[error("{message}")]
    Integrity {
        field: Option<&'static str>,
        message: String,
    },
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i32 },
    #[error("page {0} is out of range")]
    PageOutOfRange(u64),
    #[error("password hashing failed: {0}")]
    Credential(String),
    #[error(transparent)]
    Db(#[from] DbErr),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::PageOutOfRange(_))
    }

    /// Field-level messages for errors a form can show back to its user;
    /// `None` for everything else.
    pub fn field_errors(&self) -> Option<FieldErrors> {
        match self {
            Self::Validation(errors) => Some(errors.clone()),
            Self::Integrity { field, message } => {
                let mut errors = FieldErrors::new();
                errors.add(field.unwrap_or(FORM_ERRORS), message.clone());
                Some(errors)
            }
            _ => None,
        }
    }
}

/// Translates a unique-constraint failure on `field` into an integrity error
/// carrying `message`; other constraint failures keep the driver's wording.
pub(crate) fn constraint_violation(err: DbErr, field: &'static str, message: String) -> ServiceError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => ServiceError::Integrity {
            field: Some(field),
            message,
        },
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => ServiceError::Integrity {
            field: None,
            message: detail,
        },
        _ => ServiceError::Db(err),
    }
}
