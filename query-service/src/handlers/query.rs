use axum::Json;
use service_core::validation::{ValidatedJson, ValidatedQuery};

use crate::dtos::{QueryParams, QueryRequest, QueryResponse};

/// `POST /query`: echo the `text` field of the JSON body.
#[tracing::instrument(skip_all)]
pub async fn query_post(ValidatedJson(request): ValidatedJson<QueryRequest>) -> Json<QueryResponse> {
    tracing::debug!(len = request.text.len(), "Echoing query body");
    Json(QueryResponse::new(request.text))
}

/// `GET /query`: echo the `query` parameter.
#[tracing::instrument(skip_all)]
pub async fn query_get(ValidatedQuery(params): ValidatedQuery<QueryParams>) -> Json<QueryResponse> {
    tracing::debug!(len = params.query.len(), "Echoing query parameter");
    Json(QueryResponse::new(params.query))
}
