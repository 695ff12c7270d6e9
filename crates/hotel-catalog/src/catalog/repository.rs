use async_trait::async_trait;

use super::domain::{
    Enrollment, EnrollmentId, Hotel, HotelId, HotelWithRooms, PurchasedTicket, UserId,
};

/// Read-only access to the data store backing the catalog.
///
/// Plain absence is reported as `Ok(None)` (or an empty list), never as an error. Every call is a
/// separate read; nothing ties two calls to the same snapshot.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn find_enrollment_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<Enrollment>, RepositoryError>;

    /// First ticket registered for the enrollment, joined with its ticket type.
    async fn find_ticket_by_enrollment(
        &self,
        enrollment_id: EnrollmentId,
    ) -> Result<Option<PurchasedTicket>, RepositoryError>;

    async fn find_hotel(&self, hotel_id: HotelId) -> Result<Option<Hotel>, RepositoryError>;

    /// Every hotel, without rooms.
    async fn list_hotels(&self) -> Result<Vec<Hotel>, RepositoryError>;

    async fn find_hotel_with_rooms(
        &self,
        hotel_id: HotelId,
    ) -> Result<Vec<HotelWithRooms>, RepositoryError>;
}

/// Error enumeration for data store failures. None of these are recoverable by the catalog.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("data store unavailable: {0}")]
    Unavailable(String),
    #[error("data store returned inconsistent data: {0}")]
    Corrupt(String),
}
