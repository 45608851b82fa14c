use serde::{Deserialize, Serialize};
use validator::Validate;

/// `POST /query` body. Any string is accepted, including the empty one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct QueryRequest {
    pub text: String,
}

/// `GET /query` parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct QueryParams {
    #[validate(length(
        min = 1,
        code = "string_too_short",
        message = "String should have at least 1 character"
    ))]
    pub query: String,
}

/// Echo envelope shared by both query endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryResponse {
    pub received: String,
}

impl QueryResponse {
    pub fn new(received: String) -> Self {
        Self { received }
    }
}
