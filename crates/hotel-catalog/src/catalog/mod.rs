//! Hotel catalog gated by event ticket eligibility.
//!
//! A user may browse hotels and rooms only when their enrollment carries a paid, in-person ticket
//! whose type includes lodging. The gateway trait keeps the data store pluggable; the in-memory
//! store backs the bundled server and the tests.

pub mod domain;
pub mod eligibility;
pub mod identity;
pub mod memory;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
pub(crate) mod tests;

pub use domain::{
    Enrollment, EnrollmentId, Hotel, HotelId, HotelWithRooms, PurchasedTicket, Room, RoomId,
    Ticket, TicketId, TicketStatus, TicketType, TicketTypeId, UserId,
};
pub use eligibility::{check_ticket, AccessDenial, EligibilityEvaluator, FailureKind};
pub use identity::{authenticate, AuthError, IdentityError, IdentityProvider};
pub use memory::{read_seed, CatalogSnapshot, InMemoryCatalogStore, SnapshotError};
pub use repository::{CatalogRepository, RepositoryError};
pub use router::{catalog_router, status_for, CatalogState};
pub use service::{CatalogError, HotelCatalogService};
