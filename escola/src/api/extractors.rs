//! Request extractors shared by the API handlers.

use crate::errors::Error;
use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Request, rejection::PathRejection},
};
use serde::de::DeserializeOwned;

/// Path extractor whose rejection (e.g. a non-numeric id) is a 422 `{"detail": ...}` body
/// instead of axum's plain-text 400.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct Path<T>(pub T);

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::validation(rejection.body_text())
    }
}

/// Input-shape rules checked after a request body has been decoded.
pub trait Validate {
    fn validate(&self) -> Result<(), Error>;
}

/// JSON body extractor that runs [`Validate`] on the decoded value.
///
/// Both decoding failures and rule violations are reported as
/// [`Error::Validation`] (422) with a `{"detail": ...}` body, so clients see one error
/// shape regardless of which stage rejected the payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| Error::validation(rejection.body_text()))?;

        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Reject blank text for a required field
pub fn require_text(field: &str, value: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(Error::validation(format!("O campo '{field}' não pode ser vazio")));
    }
    Ok(())
}

/// Minimal structural email check: one `@`, a non-empty local part, and a dotted domain
/// without empty labels. No whitespace anywhere.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

pub fn require_email(field: &str, value: &str) -> Result<(), Error> {
    if !is_valid_email(value) {
        return Err(Error::validation(format!("O campo '{field}' não é um email válido")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("joao.silva@example.com"));
        assert!(is_valid_email("ana+turing@mail.escola.br"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email("email_invalido"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("joao@"));
        assert!(!is_valid_email("joao@example"));
        assert!(!is_valid_email("joao@example..com"));
        assert!(!is_valid_email("joao@@example.com"));
        assert!(!is_valid_email("jo ao@example.com"));
    }

    #[test]
    fn test_require_text_rejects_blank() {
        assert!(require_text("nome", "João").is_ok());
        assert!(require_text("nome", "   ").is_err());
        assert!(require_text("nome", "").is_err());
    }
}
