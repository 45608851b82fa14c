//! Validated request extractors.
//!
//! `ValidatedJson` and `ValidatedQuery` decode their input, run the
//! `validator` rules declared on the target type and reject with a 422
//! listing every violation. Decoding is exposed as plain functions so the
//! rules can be exercised without an HTTP request.

use crate::error::{AppError, FieldViolation, ValidationFailure};
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Request},
    http::{StatusCode, request::Parts},
};
use serde::de::DeserializeOwned;
use serde_json::error::Category;
use serde_path_to_error::{Path, Segment};
use validator::{Validate, ValidationErrors};

const FIELD_REQUIRED: &str = "Field required";

/// Where a request input was read from. Rendered as the first `loc` segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Body,
    Query,
}

impl Location {
    pub fn as_str(self) -> &'static str {
        match self {
            Location::Body => "body",
            Location::Query => "query",
        }
    }

    fn loc(self, rest: impl IntoIterator<Item = String>) -> Vec<String> {
        std::iter::once(self.as_str().to_string())
            .chain(rest)
            .collect()
    }
}

/// Decode a JSON request body into `T` and validate it.
pub fn decode_json<T>(bytes: &[u8]) -> Result<T, ValidationFailure>
where
    T: DeserializeOwned + Validate,
{
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ValidationFailure::single(FieldViolation::new(
            Location::Body.loc([]),
            FIELD_REQUIRED,
            "missing",
        )));
    }

    let mut de = serde_json::Deserializer::from_slice(bytes);
    let value: T = serde_path_to_error::deserialize(&mut de).map_err(|err| {
        let segments = path_segments(err.path());
        ValidationFailure::single(json_violation(segments, err.into_inner()))
    })?;
    de.end()
        .map_err(|err| ValidationFailure::single(json_violation(Vec::new(), err)))?;

    validate(Location::Body, value)
}

/// Decode a URL query string (without the leading `?`) into `T` and validate it.
///
/// A repeated parameter resolves to its last value.
pub fn decode_query<T>(query: &str) -> Result<T, ValidationFailure>
where
    T: DeserializeOwned + Validate,
{
    let query = last_value_wins(query).map_err(|message| {
        ValidationFailure::single(FieldViolation::new(
            Location::Query.loc([]),
            message,
            "invalid_type",
        ))
    })?;

    let value: T = serde_urlencoded::from_str(&query).map_err(|err| {
        let message = err.to_string();
        let violation = match missing_field(&message) {
            Some(field) => FieldViolation::new(
                Location::Query.loc([field.to_string()]),
                FIELD_REQUIRED,
                "missing",
            ),
            None => FieldViolation::new(Location::Query.loc([]), message, "invalid_type"),
        };
        ValidationFailure::single(violation)
    })?;

    validate(Location::Query, value)
}

// Collapses `a=1&a=2` to `a=2`, keeping first-seen key order.
fn last_value_wins(query: &str) -> Result<String, String> {
    let pairs: Vec<(String, String)> =
        serde_urlencoded::from_str(query).map_err(|e| e.to_string())?;

    let mut collapsed: Vec<(String, String)> = Vec::with_capacity(pairs.len());
    for (key, value) in pairs {
        match collapsed.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => collapsed.push((key, value)),
        }
    }

    serde_urlencoded::to_string(&collapsed).map_err(|e| e.to_string())
}

/// Flatten `validator` field errors into violations, sorted by path.
pub fn violations_from(location: Location, errors: &ValidationErrors) -> ValidationFailure {
    let mut violations: Vec<FieldViolation> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| {
                let msg = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Failed `{}` check", err.code));
                FieldViolation::new(location.loc([field.to_string()]), msg, err.code.to_string())
            })
        })
        .collect();
    violations.sort_by(|a, b| a.loc.cmp(&b.loc));

    ValidationFailure { violations }
}

fn validate<T: Validate>(location: Location, value: T) -> Result<T, ValidationFailure> {
    value
        .validate()
        .map_err(|errors| violations_from(location, &errors))?;
    Ok(value)
}

fn path_segments(path: &Path) -> Vec<String> {
    path.iter()
        .filter_map(|segment| match segment {
            Segment::Seq { index } => Some(index.to_string()),
            Segment::Map { key } => Some(key.clone()),
            Segment::Enum { variant } => Some(variant.clone()),
            Segment::Unknown => None,
        })
        .collect()
}

fn json_violation(mut segments: Vec<String>, err: serde_json::Error) -> FieldViolation {
    if err.classify() != Category::Data {
        return FieldViolation::new(Location::Body.loc([]), "JSON decode error", "json_invalid");
    }

    let full = err.to_string();
    let message = match err.line() {
        0 => full.as_str(),
        _ => full.rsplit_once(" at line ").map_or(full.as_str(), |(head, _)| head),
    };

    match missing_field(&message) {
        Some(field) => {
            segments.push(field.to_string());
            FieldViolation::new(Location::Body.loc(segments), FIELD_REQUIRED, "missing")
        }
        None => FieldViolation::new(Location::Body.loc(segments), message, "invalid_type"),
    }
}

// serde reports absent struct fields only through its message text.
fn missing_field(message: &str) -> Option<&str> {
    message
        .strip_prefix("missing field `")?
        .strip_suffix('`')
}

/// JSON body extractor that runs `validator` rules after deserializing.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            tracing::debug!(status = %rejection.status(), "Failed to read request body");
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                AppError::PayloadTooLarge(rejection.body_text())
            } else {
                AppError::BadRequest(anyhow::anyhow!(rejection.body_text()))
            }
        })?;

        let value = decode_json(&bytes).map_err(|failure| {
            tracing::debug!(%failure, "Rejected request body");
            AppError::from(failure)
        })?;

        Ok(ValidatedJson(value))
    }
}

/// Query-string extractor that runs `validator` rules after deserializing.
#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or_default();

        let value = decode_query(query).map_err(|failure| {
            tracing::debug!(%failure, "Rejected query string");
            AppError::from(failure)
        })?;

        Ok(ValidatedQuery(value))
    }
}
