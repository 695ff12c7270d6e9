use std::sync::Arc;

use tracing::{debug, error, warn};

use super::domain::{Hotel, HotelId, HotelWithRooms, UserId};
use super::eligibility::{AccessDenial, EligibilityEvaluator, FailureKind};
use super::repository::{CatalogRepository, RepositoryError};

/// Service gating the hotel catalog behind the eligibility evaluator.
pub struct HotelCatalogService<R> {
    repository: Arc<R>,
    evaluator: EligibilityEvaluator<R>,
}

impl<R> HotelCatalogService<R>
where
    R: CatalogRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        let evaluator = EligibilityEvaluator::new(repository.clone());
        Self {
            repository,
            evaluator,
        }
    }

    /// List every hotel for an eligible user. An empty catalog is a successful, empty answer.
    pub async fn list_hotels(&self, user_id: UserId) -> Result<Vec<Hotel>, CatalogError> {
        self.fetch_hotels(user_id)
            .await
            .inspect_err(|err| log_failure("list_hotels", user_id, err))
    }

    /// List one hotel together with its rooms.
    ///
    /// The hotel is looked up before eligibility, so an unknown hotel reports `NotFound` whatever
    /// the user's ticket state.
    pub async fn list_hotel_rooms(
        &self,
        hotel_id: HotelId,
        user_id: UserId,
    ) -> Result<Vec<HotelWithRooms>, CatalogError> {
        self.fetch_hotel_rooms(hotel_id, user_id)
            .await
            .inspect_err(|err| log_failure("list_hotel_rooms", user_id, err))
    }

    async fn fetch_hotels(&self, user_id: UserId) -> Result<Vec<Hotel>, CatalogError> {
        self.evaluator.evaluate(user_id).await?;
        let hotels = self.repository.list_hotels().await?;
        Ok(hotels)
    }

    async fn fetch_hotel_rooms(
        &self,
        hotel_id: HotelId,
        user_id: UserId,
    ) -> Result<Vec<HotelWithRooms>, CatalogError> {
        self.repository
            .find_hotel(hotel_id)
            .await?
            .ok_or(AccessDenial::HotelNotFound(hotel_id))?;

        self.evaluator.evaluate(user_id).await?;

        let hotels = self.repository.find_hotel_with_rooms(hotel_id).await?;
        if hotels.is_empty() {
            // Existence check and room fetch are separate reads.
            warn!(%hotel_id, "hotel disappeared between existence check and room fetch");
            return Err(AccessDenial::HotelNotFound(hotel_id).into());
        }
        Ok(hotels)
    }
}

fn log_failure(operation: &'static str, user_id: UserId, err: &CatalogError) {
    match err.kind() {
        FailureKind::Fatal => error!(operation, %user_id, error = %err, "catalog lookup failed"),
        kind => debug!(
            operation,
            %user_id,
            kind = kind.label(),
            reason = %err,
            "catalog access denied"
        ),
    }
}

/// Error raised by the catalog service.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error(transparent)]
    Denied(#[from] AccessDenial),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl CatalogError {
    pub const fn kind(&self) -> FailureKind {
        match self {
            CatalogError::Denied(denial) => denial.kind(),
            CatalogError::Repository(_) => FailureKind::Fatal,
        }
    }
}
