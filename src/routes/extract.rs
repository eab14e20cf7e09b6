use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::ApiError;

/// JSON body that has been deserialized and then checked with `validator`.
///
/// Both kinds of failure reject with 400 and the underlying message.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            tracing::debug!("Rejected request body: {}", rejection.body_text());
            ApiError::BadRequest(rejection.body_text())
        })?;

        value.validate().map_err(|errors| {
            tracing::debug!("Validation failed: {}", errors);
            ApiError::BadRequest(errors.to_string())
        })?;

        Ok(Self(value))
    }
}
