//! Request validation shared by the JSON API handlers.
//!
//! Request bodies are first deserialized into loosely typed form structs so
//! that missing or malformed fields can be reported one by one, then checked
//! and converted into the domain types by [Validate::validate].

use std::{fmt::Display, str::FromStr};

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    response::Response,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::Value;
use time::{Date, macros::format_description};

use crate::{Error, database_id::DatabaseId};

/// The largest whole part a stored decimal may have.
///
/// Amounts, quantities and values are stored with ten digits of precision,
/// two of which are after the decimal point.
const MAX_DECIMAL: Decimal = Decimal::from_parts(99_999_999, 0, 0, false, 0);

/// The number of decimal places kept for amounts, quantities and values.
pub(crate) const DECIMAL_PLACES: u32 = 2;

/// A problem with a single field of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// The name of the field as it appears in the request, if known.
    pub field: Option<String>,
    /// A human readable description of the problem.
    pub message: String,
}

impl FieldError {
    /// Create an error for the field named `field`.
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: Some(field.to_owned()),
            message: message.to_owned(),
        }
    }

    /// Create an error that does not belong to a particular field, e.g. a JSON syntax error.
    pub fn body(message: &str) -> Self {
        Self {
            field: None,
            message: message.to_owned(),
        }
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{field}: {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// A request body that can be checked and converted into a domain type.
pub(crate) trait Validate {
    /// The validated value.
    type Output;

    /// The summary message used when validation fails, e.g. "Invalid transaction data".
    const INVALID_MESSAGE: &'static str;

    /// Check the fields and convert them, collecting every problem found.
    fn validate(self) -> Result<Self::Output, Vec<FieldError>>;
}

/// An extractor that deserializes a JSON body into `T` and validates it.
///
/// Rejections are JSON 400 responses carrying field-level details.
pub(crate) struct ValidJson<T: Validate>(pub T::Output);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: Validate + DeserializeOwned,
{
    type Rejection = Response;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let invalid = |errors| {
            Error::InvalidInput {
                message: T::INVALID_MESSAGE,
                errors,
            }
            .into_json_response(T::INVALID_MESSAGE)
        };

        let form = match Json::<T>::from_request(request, state).await {
            Ok(Json(form)) => form,
            Err(rejection) => {
                return Err(invalid(vec![rejection_to_field_error(
                    &rejection.body_text(),
                )]));
            }
        };

        form.validate().map(Self).map_err(invalid)
    }
}

/// An extractor that deserializes the query string into `T` and validates it.
///
/// Like [ValidJson], rejections are JSON 400 responses.
pub(crate) struct ValidQuery<T: Validate>(pub T::Output);

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    S: Send + Sync,
    T: Validate + DeserializeOwned,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let invalid = |errors| {
            Error::InvalidInput {
                message: T::INVALID_MESSAGE,
                errors,
            }
            .into_json_response(T::INVALID_MESSAGE)
        };

        let query = match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(query)) => query,
            Err(rejection) => {
                return Err(invalid(vec![rejection_to_field_error(
                    &rejection.body_text(),
                )]));
            }
        };

        query.validate().map(Self).map_err(invalid)
    }
}

/// Turn serde's description of a bad body or query string into a [FieldError].
fn rejection_to_field_error(text: &str) -> FieldError {
    // serde names the field in backticks, e.g. "missing field `name` at line 1 column 2".
    let named_field = |prefix: &str| {
        text.split_once(prefix)
            .and_then(|(_, rest)| rest.split_once('`'))
            .map(|(field, _)| field.to_owned())
    };

    if let Some(field) = named_field("missing field `") {
        FieldError {
            field: Some(field),
            message: "Required".to_owned(),
        }
    } else if let Some(field) = named_field("duplicate field `") {
        FieldError {
            field: Some(field),
            message: "Given more than once".to_owned(),
        }
    } else {
        FieldError::body(text)
    }
}

/// An extractor for the integer record ID in a path such as `/api/transactions/{id}`.
pub(crate) struct RecordId(pub DatabaseId);

impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<DatabaseId>::from_request_parts(parts, state).await {
            Ok(Path(id)) => Ok(Self(id)),
            Err(_) => Err(Error::InvalidInput {
                message: "Invalid ID",
                errors: vec![FieldError::new("id", "Expected an integer")],
            }
            .into_json_response("Invalid ID")),
        }
    }
}

/// Deserialize a field that is present, even if it is `null`.
///
/// Combined with `#[serde(default)]` on an `Option<Option<T>>` this separates
/// "not supplied" (`None`) from "set to null" (`Some(None)`).
pub(crate) fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Trim `value` and return `None` if nothing is left.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

/// Check that `value` was supplied and is not blank.
pub(crate) fn required_text(
    field: &str,
    value: Option<String>,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match value {
        None => {
            errors.push(FieldError::new(field, "Required"));
            None
        }
        Some(value) => text(field, value, errors),
    }
}

/// Check that a supplied value is not blank.
pub(crate) fn text(field: &str, value: String, errors: &mut Vec<FieldError>) -> Option<String> {
    let value = value.trim();

    if value.is_empty() {
        errors.push(FieldError::new(field, "Cannot be empty"));
        None
    } else {
        Some(value.to_owned())
    }
}

/// Check that `value` was supplied and is a valid decimal.
pub(crate) fn required_decimal(
    field: &str,
    value: Option<Value>,
    errors: &mut Vec<FieldError>,
) -> Option<Decimal> {
    match value {
        None => {
            errors.push(FieldError::new(field, "Required"));
            None
        }
        Some(value) => decimal(field, &value, errors),
    }
}

/// Parse a decimal given as either a JSON string or a JSON number.
///
/// The result is rounded to [DECIMAL_PLACES] decimal places.
pub(crate) fn decimal(field: &str, value: &Value, errors: &mut Vec<FieldError>) -> Option<Decimal> {
    let parsed = match value {
        Value::String(text) => Decimal::from_str(text.trim()).ok(),
        Value::Number(number) => Decimal::from_str(&number.to_string())
            .or_else(|_| Decimal::from_scientific(&number.to_string()))
            .ok(),
        _ => None,
    };

    match parsed.map(round_decimal) {
        Some(number) if number.trunc().abs() > MAX_DECIMAL => {
            errors.push(FieldError::new(
                field,
                "Must have at most 8 digits before the decimal point",
            ));
            None
        }
        Some(number) => Some(number),
        None => {
            errors.push(FieldError::new(field, "Expected a decimal number"));
            None
        }
    }
}

/// Round `number` to [DECIMAL_PLACES] and fix its scale so it always prints with two decimal places.
pub(crate) fn round_decimal(number: Decimal) -> Decimal {
    let mut number = number.round_dp(DECIMAL_PLACES);
    number.rescale(DECIMAL_PLACES);
    number
}

/// Parse a `YYYY-MM-DD` date.
pub(crate) fn parse_date(text: &str) -> Option<Date> {
    Date::parse(text.trim(), format_description!("[year]-[month]-[day]")).ok()
}

/// Check that `value` was supplied and is a `YYYY-MM-DD` date.
pub(crate) fn required_date(
    field: &str,
    value: Option<String>,
    errors: &mut Vec<FieldError>,
) -> Option<Date> {
    match value {
        None => {
            errors.push(FieldError::new(field, "Required"));
            None
        }
        Some(value) => date(field, &value, errors),
    }
}

/// Check that a supplied value is a `YYYY-MM-DD` date.
pub(crate) fn date(field: &str, value: &str, errors: &mut Vec<FieldError>) -> Option<Date> {
    let parsed = parse_date(value);

    if parsed.is_none() {
        errors.push(FieldError::new(field, "Expected a date in the format YYYY-MM-DD"));
    }

    parsed
}

/// Parse a value with [FromStr], recording `message` as the error on failure.
pub(crate) fn parse<T: FromStr>(
    field: &str,
    value: &str,
    message: &str,
    errors: &mut Vec<FieldError>,
) -> Option<T> {
    let parsed = value.trim().parse().ok();

    if parsed.is_none() {
        errors.push(FieldError::new(field, message));
    }

    parsed
}

#[cfg(test)]
mod validation_tests {
    use rust_decimal::Decimal;
    use serde_json::json;
    use time::macros::date;

    use super::{
        FieldError, decimal, optional_text, parse_date, rejection_to_field_error, required_date,
        required_text,
    };

    #[test]
    fn decimal_accepts_strings_and_numbers() {
        let mut errors = Vec::new();

        let from_string = decimal("amount", &json!("12.5"), &mut errors);
        let from_number = decimal("amount", &json!(12.5), &mut errors);

        assert!(errors.is_empty(), "got errors {errors:?}");
        assert_eq!(from_string, Some(Decimal::new(1250, 2)));
        assert_eq!(from_number, Some(Decimal::new(1250, 2)));
        assert_eq!(from_string.unwrap().to_string(), "12.50");
    }

    #[test]
    fn decimal_rounds_to_two_places() {
        let mut errors = Vec::new();

        let got = decimal("amount", &json!("0.125"), &mut errors);

        assert_eq!(got.map(|number| number.to_string()), Some("0.12".to_owned()));
    }

    #[test]
    fn decimal_rejects_garbage() {
        let mut errors = Vec::new();

        let got = decimal("amount", &json!("twelve"), &mut errors);

        assert_eq!(got, None);
        assert_eq!(
            errors,
            vec![FieldError::new("amount", "Expected a decimal number")]
        );
    }

    #[test]
    fn decimal_rejects_values_that_do_not_fit() {
        let mut errors = Vec::new();

        let got = decimal("amount", &json!("123456789.00"), &mut errors);

        assert_eq!(got, None);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn required_text_rejects_blank_strings() {
        let mut errors = Vec::new();

        let got = required_text("description", Some(" \t".to_owned()), &mut errors);

        assert_eq!(got, None);
        assert_eq!(
            errors,
            vec![FieldError::new("description", "Cannot be empty")]
        );
    }

    #[test]
    fn required_text_reports_missing_fields() {
        let mut errors = Vec::new();

        required_text("description", None, &mut errors);

        assert_eq!(errors, vec![FieldError::new("description", "Required")]);
    }

    #[test]
    fn optional_text_treats_blank_as_missing() {
        assert_eq!(optional_text(Some("  ".to_owned())), None);
        assert_eq!(optional_text(None), None);
        assert_eq!(
            optional_text(Some(" Cash ".to_owned())),
            Some("Cash".to_owned())
        );
    }

    #[test]
    fn parses_iso_dates() {
        assert_eq!(parse_date("2024-01-05"), Some(date!(2024 - 01 - 05)));
        assert_eq!(parse_date("2024-1-5"), None);
        assert_eq!(parse_date("05/01/2024"), None);
    }

    #[test]
    fn required_date_reports_bad_format() {
        let mut errors = Vec::new();

        let got = required_date("date", Some("yesterday".to_owned()), &mut errors);

        assert_eq!(got, None);
        assert_eq!(errors[0].field.as_deref(), Some("date"));
    }

    #[test]
    fn rejections_name_the_offending_field() {
        assert_eq!(
            rejection_to_field_error(
                "Failed to deserialize the JSON body into the target type: missing field `name` at line 1 column 2"
            ),
            FieldError::new("name", "Required")
        );
        assert_eq!(
            rejection_to_field_error(
                "Failed to deserialize query string: duplicate field `startDate`"
            ),
            FieldError::new("startDate", "Given more than once")
        );
        assert_eq!(
            rejection_to_field_error("EOF while parsing a value"),
            FieldError::body("EOF while parsing a value")
        );
    }
}
