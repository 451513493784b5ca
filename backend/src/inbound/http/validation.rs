//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every failure becomes an `invalid_input` error whose details name the
//! offending request field and a machine-readable reason.

use actix_web::web;
use serde_json::json;
use uuid::Uuid;

use crate::domain::{
    CredentialValidationError, Error, IdentityId, PersonInformationValidationError,
    PhotoValidationError, ResourceId,
};

/// Validation error codes raised by the adapter itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    MalformedBody,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::MalformedBody => "malformed_body",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: &str) -> Error {
        Error::invalid_input(self.message).with_details(json!({
            "field": self.field,
            "code": code,
        }))
    }

    fn with_value(self, code: &str, value: impl Into<String>) -> Error {
        Error::invalid_input(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code,
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField.as_str())
}

fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| {
        let name = field.as_str();
        ValidationError::new(name, format!("{name} must be a valid UUID"))
            .with_value(ErrorCode::InvalidUuid.as_str(), value)
    })
}

pub(crate) fn parse_resource_id(value: &str, field: FieldName) -> Result<ResourceId, Error> {
    parse_uuid(value, field).map(ResourceId::from_uuid)
}

pub(crate) fn parse_identity_id(value: &str, field: FieldName) -> Result<IdentityId, Error> {
    parse_uuid(value, field).map(IdentityId::from_uuid)
}

pub(crate) fn credential_error(err: CredentialValidationError) -> Error {
    ValidationError::new(err.field(), err.to_string()).with_code(err.code())
}

pub(crate) fn person_information_error(err: PersonInformationValidationError) -> Error {
    ValidationError::new(err.field(), err.to_string()).with_code(err.code())
}

pub(crate) fn photo_error(err: PhotoValidationError) -> Error {
    let code = match err {
        PhotoValidationError::EmptyFileName => "empty",
        PhotoValidationError::PathInFileName => "path",
        PhotoValidationError::UnsupportedExtension => "extension",
    };
    ValidationError::new("fileName", err.to_string()).with_code(code)
}

/// JSON extractor settings that report malformed bodies as `invalid_input`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let error = ValidationError::new("body", format!("request body is not valid: {err}"))
            .with_code(ErrorCode::MalformedBody.as_str());
        actix_web::Error::from(error)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode as DomainCode, LoginCredentials, PersonName};
    use rstest::rstest;

    #[rstest]
    fn credential_failures_carry_field_and_code() {
        let err = LoginCredentials::try_from_parts("  ", "secret").expect_err("empty");
        let error = credential_error(err);
        assert_eq!(error.code(), DomainCode::InvalidInput);
        assert_eq!(
            error.details(),
            Some(&json!({"field": "userName", "code": "empty"}))
        );
    }

    #[rstest]
    fn person_failures_carry_field_and_code() {
        let err = PersonName::new("A", "firstName").expect_err("short");
        let error = person_information_error(err);
        assert_eq!(
            error.details(),
            Some(&json!({"field": "firstName", "code": "length"}))
        );
    }

    #[rstest]
    #[case(PhotoValidationError::EmptyFileName, "empty")]
    #[case(PhotoValidationError::PathInFileName, "path")]
    #[case(PhotoValidationError::UnsupportedExtension, "extension")]
    fn photo_failures_point_at_file_name(#[case] err: PhotoValidationError, #[case] code: &str) {
        let error = photo_error(err);
        assert_eq!(error.details(), Some(&json!({"field": "fileName", "code": code})));
    }

    #[rstest]
    fn malformed_uuid_reports_value() {
        let error = parse_resource_id("nope", FieldName::new("id")).expect_err("invalid");
        assert_eq!(
            error.details(),
            Some(&json!({"field": "id", "value": "nope", "code": "invalid_uuid"}))
        );
    }

    #[rstest]
    fn missing_field_names_the_field() {
        let error = missing_field_error(FieldName::new("password2"));
        assert_eq!(error.message(), "missing required field: password2");
    }
}
