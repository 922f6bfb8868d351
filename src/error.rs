//! Request-level errors and their HTTP mapping.
//!
//! Every failure is answered with a plain-text body of the form
//! `Error: <message>`. Input problems are 400; render failures are 500.

use actix_web::http::{header::ContentType, StatusCode};
use actix_web::{HttpResponse, ResponseError};

use crate::form::FormError;
use crate::generator::GeneratorError;
use crate::quotation::validation::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum QuotationError {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),
    #[error("{0}")]
    Form(#[from] FormError),
    #[error("{0}")]
    Render(GeneratorError),
    #[error("document generation was interrupted")]
    Blocking,
}

impl From<GeneratorError> for QuotationError {
    fn from(error: GeneratorError) -> Self {
        match error {
            // invariant violations are the caller's input, not a render fault
            GeneratorError::Invalid(errors) => QuotationError::Validation(errors),
            other => QuotationError::Render(other),
        }
    }
}

impl ResponseError for QuotationError {
    fn status_code(&self) -> StatusCode {
        match self {
            QuotationError::Validation(_) | QuotationError::Form(_) => StatusCode::BAD_REQUEST,
            QuotationError::Render(GeneratorError::AmountOverflow) => StatusCode::BAD_REQUEST,
            QuotationError::Render(_) | QuotationError::Blocking => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::plaintext())
            .body(format!("Error: {}", self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quotation::validation::ValidationError;

    #[test]
    fn test_validation_is_bad_request() {
        let mut errors = ValidationErrors::new();
        errors.add(ValidationError::missing_field("company_name"));
        let error = QuotationError::from(errors);
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(error.to_string(), "missing required field 'company_name'");
    }

    #[test]
    fn test_render_failure_is_server_error() {
        let error = QuotationError::from(GeneratorError::Serialize("boom".to_string()));
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_layout_failure_is_server_error() {
        let error = QuotationError::from(GeneratorError::Layout("row too tall".to_string()));
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.to_string(), "failed to lay out document: row too tall");
    }

    #[test]
    fn test_invalid_generator_input_maps_to_validation() {
        let mut errors = ValidationErrors::new();
        errors.add(ValidationError::missing_field("customer_name"));
        let error = QuotationError::from(GeneratorError::Invalid(errors));
        assert!(matches!(error, QuotationError::Validation(_)));
    }

    #[test]
    fn test_form_error_is_bad_request() {
        let error = QuotationError::from(FormError::Utf8Error("notes".to_string()));
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }
}
