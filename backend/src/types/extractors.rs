//! Custom extractors for request validation

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde_json::{Map, Value};
use validator::Validate;

use crate::types::error::AppError;

/// JSON body extractor that validates the payload
///
/// The body is parsed whatever the `Content-Type` header says, with property
/// lookup semantics:
/// - unreadable body, invalid JSON or a `null` document: internal error
/// - any other non-object document (array, string, number, bool) carries no
///   fields and is read as `{}`
/// - a document that does not deserialize into `T`: internal error
/// - a payload failing validation: 400 with the message of the first failing rule
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: serde::de::DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state).await.map_err(|err| {
            tracing::error!("Failed to read request body: {err}");
            AppError::internal()
        })?;

        let document = match serde_json::from_slice::<Value>(&body) {
            Ok(Value::Null) => {
                tracing::error!("Request body is JSON null");
                return Err(AppError::internal());
            }
            Ok(object @ Value::Object(_)) => object,
            Ok(_) => Value::Object(Map::new()),
            Err(err) => {
                tracing::error!("Failed to parse request body: {err}");
                return Err(AppError::internal());
            }
        };

        let payload: T = serde_json::from_value(document).map_err(|err| {
            tracing::error!("Failed to deserialize request body: {err}");
            AppError::internal()
        })?;

        payload.validate().map_err(|errors| {
            let message = errors
                .field_errors()
                .into_values()
                .find_map(|field_errors| field_errors.first()?.message.clone());

            message.map_or_else(
                || AppError::bad_request("Invalid request"),
                AppError::bad_request,
            )
        })?;

        Ok(Self(payload))
    }
}
