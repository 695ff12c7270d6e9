use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::domain::{
    Enrollment, EnrollmentId, Hotel, HotelId, HotelWithRooms, PurchasedTicket, Room, RoomId,
    Ticket, TicketId, TicketType, TicketTypeId, UserId,
};
use super::repository::{CatalogRepository, RepositoryError};

/// Serializable dump of every record the catalog reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub enrollments: Vec<Enrollment>,
    #[serde(default)]
    pub ticket_types: Vec<TicketType>,
    #[serde(default)]
    pub tickets: Vec<Ticket>,
    #[serde(default)]
    pub hotels: Vec<Hotel>,
    #[serde(default)]
    pub rooms: Vec<Room>,
}

/// Read a JSON seed document (a bare snapshot or anything embedding one) from disk.
pub fn read_seed<T: DeserializeOwned>(path: &Path) -> Result<T, SnapshotError> {
    let raw = fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(SnapshotError::Parse)
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("unable to read snapshot {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("snapshot is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("user {0} has more than one enrollment")]
    DuplicateEnrollment(UserId),
    #[error("duplicate {record} id {id}")]
    DuplicateId { record: &'static str, id: String },
    #[error("session token for user {0} is already assigned")]
    DuplicateSession(UserId),
    #[error("dangling reference: {0}")]
    DanglingReference(String),
}

/// Immutable, id-ordered store serving catalog reads from memory.
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    enrollments: HashMap<UserId, Enrollment>,
    ticket_types: BTreeMap<TicketTypeId, TicketType>,
    tickets: BTreeMap<TicketId, Ticket>,
    hotels: BTreeMap<HotelId, Hotel>,
    rooms: BTreeMap<RoomId, Room>,
}

impl InMemoryCatalogStore {
    /// Build a store, rejecting snapshots whose references do not resolve.
    pub fn from_snapshot(snapshot: CatalogSnapshot) -> Result<Self, SnapshotError> {
        let CatalogSnapshot {
            enrollments,
            ticket_types,
            tickets,
            hotels,
            rooms,
        } = snapshot;

        let enrollments = index_by_id("enrollment", enrollments, |enrollment| enrollment.id)?;
        let ticket_types = index_by_id("ticket type", ticket_types, |ticket_type| ticket_type.id)?;
        let tickets = index_by_id("ticket", tickets, |ticket| ticket.id)?;
        let hotels = index_by_id("hotel", hotels, |hotel| hotel.id)?;
        let rooms = index_by_id("room", rooms, |room| room.id)?;

        let mut enrollments_by_user = HashMap::with_capacity(enrollments.len());
        for enrollment in enrollments.values() {
            let user_id = enrollment.user_id;
            if enrollments_by_user.insert(user_id, enrollment.clone()).is_some() {
                return Err(SnapshotError::DuplicateEnrollment(user_id));
            }
        }

        for ticket in tickets.values() {
            if !enrollments.contains_key(&ticket.enrollment_id) {
                return Err(SnapshotError::DanglingReference(format!(
                    "ticket {} references unknown enrollment {}",
                    ticket.id, ticket.enrollment_id
                )));
            }
            if !ticket_types.contains_key(&ticket.ticket_type_id) {
                return Err(SnapshotError::DanglingReference(format!(
                    "ticket {} references unknown ticket type {}",
                    ticket.id, ticket.ticket_type_id
                )));
            }
        }

        for room in rooms.values() {
            if !hotels.contains_key(&room.hotel_id) {
                return Err(SnapshotError::DanglingReference(format!(
                    "room {} references unknown hotel {}",
                    room.id, room.hotel_id
                )));
            }
        }

        Ok(Self {
            enrollments: enrollments_by_user,
            ticket_types,
            tickets,
            hotels,
            rooms,
        })
    }

    fn rooms_of(&self, hotel_id: HotelId) -> Vec<Room> {
        self.rooms
            .values()
            .filter(|room| room.hotel_id == hotel_id)
            .cloned()
            .collect()
    }
}

/// Key records by id. A repeated id is an error rather than a silent overwrite.
fn index_by_id<K, V>(
    record: &'static str,
    records: Vec<V>,
    id_of: impl Fn(&V) -> K,
) -> Result<BTreeMap<K, V>, SnapshotError>
where
    K: Ord + Display,
{
    let mut index = BTreeMap::new();
    for value in records {
        let id = id_of(&value);
        if index.contains_key(&id) {
            return Err(SnapshotError::DuplicateId {
                record,
                id: id.to_string(),
            });
        }
        index.insert(id, value);
    }
    Ok(index)
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogStore {
    async fn find_enrollment_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<Enrollment>, RepositoryError> {
        Ok(self.enrollments.get(&user_id).cloned())
    }

    async fn find_ticket_by_enrollment(
        &self,
        enrollment_id: EnrollmentId,
    ) -> Result<Option<PurchasedTicket>, RepositoryError> {
        let Some(ticket) = self
            .tickets
            .values()
            .find(|ticket| ticket.enrollment_id == enrollment_id)
        else {
            return Ok(None);
        };

        let ticket_type = self
            .ticket_types
            .get(&ticket.ticket_type_id)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::Corrupt(format!(
                    "ticket {} references unknown ticket type {}",
                    ticket.id, ticket.ticket_type_id
                ))
            })?;

        Ok(Some(PurchasedTicket {
            ticket: ticket.clone(),
            ticket_type,
        }))
    }

    async fn find_hotel(&self, hotel_id: HotelId) -> Result<Option<Hotel>, RepositoryError> {
        Ok(self.hotels.get(&hotel_id).cloned())
    }

    async fn list_hotels(&self) -> Result<Vec<Hotel>, RepositoryError> {
        Ok(self.hotels.values().cloned().collect())
    }

    async fn find_hotel_with_rooms(
        &self,
        hotel_id: HotelId,
    ) -> Result<Vec<HotelWithRooms>, RepositoryError> {
        Ok(self
            .hotels
            .get(&hotel_id)
            .map(|hotel| HotelWithRooms {
                hotel: hotel.clone(),
                rooms: self.rooms_of(hotel_id),
            })
            .into_iter()
            .collect())
    }
}
