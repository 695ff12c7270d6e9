use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::catalog::domain::{
    Enrollment, EnrollmentId, Hotel, HotelId, HotelWithRooms, PurchasedTicket, Room, RoomId,
    Ticket, TicketId, TicketStatus, TicketType, TicketTypeId, UserId,
};
use crate::catalog::identity::{IdentityError, IdentityProvider};
use crate::catalog::memory::{CatalogSnapshot, InMemoryCatalogStore};
use crate::catalog::repository::{CatalogRepository, RepositoryError};
use crate::catalog::service::HotelCatalogService;

pub(crate) const USER: UserId = UserId(1);
pub(crate) const ENROLLMENT: EnrollmentId = EnrollmentId(10);
pub(crate) const TOKEN: &str = "session-token-1";

pub(crate) fn timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TicketTypeFlags {
    pub(crate) is_remote: bool,
    pub(crate) includes_hotel: bool,
}

impl TicketTypeFlags {
    pub(crate) const WITH_HOTEL: Self = Self {
        is_remote: false,
        includes_hotel: true,
    };
    pub(crate) const IN_PERSON_ONLY: Self = Self {
        is_remote: false,
        includes_hotel: false,
    };
    pub(crate) const REMOTE: Self = Self {
        is_remote: true,
        includes_hotel: false,
    };
    pub(crate) const REMOTE_WITH_HOTEL: Self = Self {
        is_remote: true,
        includes_hotel: true,
    };

    pub(crate) const ALL: [Self; 4] = [
        Self::WITH_HOTEL,
        Self::IN_PERSON_ONLY,
        Self::REMOTE,
        Self::REMOTE_WITH_HOTEL,
    ];
    pub(crate) const DISQUALIFYING: [Self; 3] =
        [Self::IN_PERSON_ONLY, Self::REMOTE, Self::REMOTE_WITH_HOTEL];
}

pub(crate) fn enrollment(id: i64, user_id: i64) -> Enrollment {
    Enrollment {
        id: EnrollmentId(id),
        user_id: UserId(user_id),
        name: format!("Attendee {user_id}"),
    }
}

pub(crate) fn ticket_type(id: i64, flags: TicketTypeFlags) -> TicketType {
    TicketType {
        id: TicketTypeId(id),
        name: format!("Ticket type {id}"),
        price: if flags.includes_hotel { 600 } else { 250 },
        is_remote: flags.is_remote,
        includes_hotel: flags.includes_hotel,
    }
}

pub(crate) fn ticket(
    id: i64,
    enrollment_id: i64,
    ticket_type_id: i64,
    status: TicketStatus,
) -> Ticket {
    Ticket {
        id: TicketId(id),
        enrollment_id: EnrollmentId(enrollment_id),
        ticket_type_id: TicketTypeId(ticket_type_id),
        status,
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

pub(crate) fn purchase(status: TicketStatus, flags: TicketTypeFlags) -> PurchasedTicket {
    PurchasedTicket {
        ticket: ticket(100, ENROLLMENT.0, 5, status),
        ticket_type: ticket_type(5, flags),
    }
}

pub(crate) fn hotel(id: i64, name: &str) -> Hotel {
    Hotel {
        id: HotelId(id),
        name: name.to_string(),
        image: format!("https://images.example.com/hotels/{id}.jpg"),
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

pub(crate) fn room(id: i64, hotel_id: i64) -> Room {
    Room {
        id: RoomId(id),
        name: format!("Room {id}"),
        capacity: 2,
        hotel_id: HotelId(hotel_id),
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

/// How far along the enrollment, ticket and ticket type chain the test user is.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Holder {
    NoEnrollment,
    NoTicket,
    Ticket(TicketStatus, TicketTypeFlags),
}

impl Holder {
    pub(crate) const ELIGIBLE: Self =
        Self::Ticket(TicketStatus::Paid, TicketTypeFlags::WITH_HOTEL);
}

/// Catalog with `hotels` hotels, ids starting at 1, two rooms each.
pub(crate) fn snapshot_for(holder: Holder, hotels: i64) -> CatalogSnapshot {
    let mut snapshot = CatalogSnapshot::default();

    match holder {
        Holder::NoEnrollment => {}
        Holder::NoTicket => snapshot.enrollments.push(enrollment(ENROLLMENT.0, USER.0)),
        Holder::Ticket(status, flags) => {
            snapshot.enrollments.push(enrollment(ENROLLMENT.0, USER.0));
            snapshot.ticket_types.push(ticket_type(5, flags));
            snapshot.tickets.push(ticket(100, ENROLLMENT.0, 5, status));
        }
    }

    for id in 1..=hotels {
        snapshot.hotels.push(hotel(id, &format!("Hotel {id}")));
        snapshot.rooms.push(room(id * 100 + 1, id));
        snapshot.rooms.push(room(id * 100 + 2, id));
    }

    snapshot
}

pub(crate) fn store_for(holder: Holder, hotels: i64) -> Arc<InMemoryCatalogStore> {
    Arc::new(
        InMemoryCatalogStore::from_snapshot(snapshot_for(holder, hotels))
            .expect("fixture snapshot is consistent"),
    )
}

pub(crate) fn service_for(
    holder: Holder,
    hotels: i64,
) -> HotelCatalogService<InMemoryCatalogStore> {
    HotelCatalogService::new(store_for(holder, hotels))
}

/// Store wrapper that records which reads were issued, in order.
pub(crate) struct RecordingRepository {
    inner: Arc<InMemoryCatalogStore>,
    calls: Mutex<Vec<&'static str>>,
}

impl RecordingRepository {
    pub(crate) fn new(inner: Arc<InMemoryCatalogStore>) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().expect("calls mutex poisoned").push(call);
    }
}

#[async_trait]
impl CatalogRepository for RecordingRepository {
    async fn find_enrollment_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<Enrollment>, RepositoryError> {
        self.record("find_enrollment_by_user");
        self.inner.find_enrollment_by_user(user_id).await
    }

    async fn find_ticket_by_enrollment(
        &self,
        enrollment_id: EnrollmentId,
    ) -> Result<Option<PurchasedTicket>, RepositoryError> {
        self.record("find_ticket_by_enrollment");
        self.inner.find_ticket_by_enrollment(enrollment_id).await
    }

    async fn find_hotel(&self, hotel_id: HotelId) -> Result<Option<Hotel>, RepositoryError> {
        self.record("find_hotel");
        self.inner.find_hotel(hotel_id).await
    }

    async fn list_hotels(&self) -> Result<Vec<Hotel>, RepositoryError> {
        self.record("list_hotels");
        self.inner.list_hotels().await
    }

    async fn find_hotel_with_rooms(
        &self,
        hotel_id: HotelId,
    ) -> Result<Vec<HotelWithRooms>, RepositoryError> {
        self.record("find_hotel_with_rooms");
        self.inner.find_hotel_with_rooms(hotel_id).await
    }
}

/// Hotel is visible to the existence check but gone by the time rooms are fetched.
pub(crate) struct VanishingHotelRepository {
    pub(crate) inner: Arc<InMemoryCatalogStore>,
}

#[async_trait]
impl CatalogRepository for VanishingHotelRepository {
    async fn find_enrollment_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<Enrollment>, RepositoryError> {
        self.inner.find_enrollment_by_user(user_id).await
    }

    async fn find_ticket_by_enrollment(
        &self,
        enrollment_id: EnrollmentId,
    ) -> Result<Option<PurchasedTicket>, RepositoryError> {
        self.inner.find_ticket_by_enrollment(enrollment_id).await
    }

    async fn find_hotel(&self, hotel_id: HotelId) -> Result<Option<Hotel>, RepositoryError> {
        self.inner.find_hotel(hotel_id).await
    }

    async fn list_hotels(&self) -> Result<Vec<Hotel>, RepositoryError> {
        self.inner.list_hotels().await
    }

    async fn find_hotel_with_rooms(
        &self,
        _hotel_id: HotelId,
    ) -> Result<Vec<HotelWithRooms>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(crate) struct UnavailableRepository;

#[async_trait]
impl CatalogRepository for UnavailableRepository {
    async fn find_enrollment_by_user(
        &self,
        _user_id: UserId,
    ) -> Result<Option<Enrollment>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn find_ticket_by_enrollment(
        &self,
        _enrollment_id: EnrollmentId,
    ) -> Result<Option<PurchasedTicket>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn find_hotel(&self, _hotel_id: HotelId) -> Result<Option<Hotel>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn list_hotels(&self) -> Result<Vec<Hotel>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn find_hotel_with_rooms(
        &self,
        _hotel_id: HotelId,
    ) -> Result<Vec<HotelWithRooms>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default)]
pub(crate) struct SessionTable {
    sessions: HashMap<String, UserId>,
}

impl SessionTable {
    pub(crate) fn with_session(token: &str, user_id: UserId) -> Self {
        let mut sessions = HashMap::new();
        sessions.insert(token.to_string(), user_id);
        Self { sessions }
    }
}

#[async_trait]
impl IdentityProvider for SessionTable {
    async fn resolve(&self, token: &str) -> Result<Option<UserId>, IdentityError> {
        Ok(self.sessions.get(token).copied())
    }
}

pub(crate) struct OfflineIdentity;

#[async_trait]
impl IdentityProvider for OfflineIdentity {
    async fn resolve(&self, _token: &str) -> Result<Option<UserId>, IdentityError> {
        Err(IdentityError::Unavailable("session store offline".to_string()))
    }
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
