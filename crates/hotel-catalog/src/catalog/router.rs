use std::sync::Arc;

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tracing::error;

use super::domain::HotelId;
use super::eligibility::FailureKind;
use super::identity::{authenticate, AuthError, IdentityProvider};
use super::repository::CatalogRepository;
use super::service::{CatalogError, HotelCatalogService};

/// Shared handler state: the catalog service plus the identity provider guarding it.
pub struct CatalogState<R, I> {
    pub service: Arc<HotelCatalogService<R>>,
    pub identity: Arc<I>,
}

impl<R, I> Clone for CatalogState<R, I> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            identity: self.identity.clone(),
        }
    }
}

/// Router builder exposing the hotel catalog endpoints.
pub fn catalog_router<R, I>(service: Arc<HotelCatalogService<R>>, identity: Arc<I>) -> Router
where
    R: CatalogRepository + 'static,
    I: IdentityProvider + 'static,
{
    Router::new()
        .route("/hotels", get(list_hotels_handler::<R, I>))
        .route("/hotels/:hotel_id", get(hotel_rooms_handler::<R, I>))
        .with_state(CatalogState { service, identity })
}

/// Transport status for each failure kind.
pub const fn status_for(kind: FailureKind) -> StatusCode {
    match kind {
        FailureKind::NotFound => StatusCode::NOT_FOUND,
        FailureKind::PaymentRequired => StatusCode::PAYMENT_REQUIRED,
        FailureKind::Unauthorized => StatusCode::UNAUTHORIZED,
        FailureKind::Fatal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) async fn list_hotels_handler<R, I>(
    State(state): State<CatalogState<R, I>>,
    headers: HeaderMap,
) -> Response
where
    R: CatalogRepository + 'static,
    I: IdentityProvider + 'static,
{
    let user_id = match authenticate(state.identity.as_ref(), &headers).await {
        Ok(user_id) => user_id,
        Err(error) => return auth_failure(error),
    };

    match state.service.list_hotels(user_id).await {
        Ok(hotels) => (StatusCode::OK, Json(hotels)).into_response(),
        Err(error) => catalog_failure(error),
    }
}

pub(crate) async fn hotel_rooms_handler<R, I>(
    State(state): State<CatalogState<R, I>>,
    hotel_id: Result<Path<i64>, PathRejection>,
    headers: HeaderMap,
) -> Response
where
    R: CatalogRepository + 'static,
    I: IdentityProvider + 'static,
{
    let user_id = match authenticate(state.identity.as_ref(), &headers).await {
        Ok(user_id) => user_id,
        Err(error) => return auth_failure(error),
    };
    // Authentication runs before the id is validated.
    let Ok(Path(hotel_id)) = hotel_id else {
        let payload = json!({ "error": "hotel id must be an integer" });
        return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
    };

    match state
        .service
        .list_hotel_rooms(HotelId(hotel_id), user_id)
        .await
    {
        Ok(hotels) => (StatusCode::OK, Json(hotels)).into_response(),
        Err(error) => catalog_failure(error),
    }
}

fn catalog_failure(error: CatalogError) -> Response {
    let status = status_for(error.kind());
    let message = match error {
        // Store details stay in the logs.
        CatalogError::Repository(_) => "internal server error".to_string(),
        CatalogError::Denied(denial) => denial.to_string(),
    };
    let payload = json!({ "error": message });
    (status, Json(payload)).into_response()
}

fn auth_failure(error: AuthError) -> Response {
    let status = match &error {
        AuthError::Provider(source) => {
            error!(error = %source, "identity provider failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
        AuthError::MissingToken | AuthError::MalformedToken | AuthError::UnknownSession => {
            StatusCode::UNAUTHORIZED
        }
    };
    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}
