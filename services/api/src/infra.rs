use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use hotel_catalog::catalog::{
    read_seed, CatalogSnapshot, Enrollment, EnrollmentId, Hotel, HotelCatalogService, HotelId,
    IdentityError, IdentityProvider, InMemoryCatalogStore, Room, RoomId, SnapshotError, Ticket,
    TicketId, TicketStatus, TicketType, TicketTypeId, UserId,
};
use hotel_catalog::config::{AppConfig, ConfigError};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Seed file: the catalog records plus the sessions the in-memory identity provider accepts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct SeedFile {
    #[serde(flatten)]
    pub(crate) catalog: CatalogSnapshot,
    #[serde(default)]
    pub(crate) sessions: Vec<SessionSeed>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SessionSeed {
    pub(crate) token: String,
    pub(crate) user_id: UserId,
}

impl SeedFile {
    /// Seed from `path` when given, otherwise the bundled demo records.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self, SnapshotError> {
        match path {
            Some(path) => read_seed(path),
            None => Ok(demo_seed(Utc::now())),
        }
    }
}

/// Apply a command-line seed override, then enforce the production seed requirement.
pub(crate) fn resolve_seed_path(
    config: &mut AppConfig,
    seed: Option<PathBuf>,
) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(seed) = seed {
        config.store.seed_path = Some(seed);
    }
    config.require_seed()?;
    Ok(config.store.seed_path.clone())
}

pub(crate) struct InMemorySessions {
    sessions: HashMap<String, UserId>,
}

impl InMemorySessions {
    pub(crate) fn from_seeds(seeds: Vec<SessionSeed>) -> Result<Self, SnapshotError> {
        let mut sessions = HashMap::with_capacity(seeds.len());
        for seed in seeds {
            match sessions.entry(seed.token) {
                Entry::Occupied(_) => return Err(SnapshotError::DuplicateSession(seed.user_id)),
                Entry::Vacant(slot) => {
                    slot.insert(seed.user_id);
                }
            }
        }
        Ok(Self { sessions })
    }
}

#[async_trait]
impl IdentityProvider for InMemorySessions {
    async fn resolve(&self, token: &str) -> Result<Option<UserId>, IdentityError> {
        Ok(self.sessions.get(token).copied())
    }
}

pub(crate) type CatalogService = HotelCatalogService<InMemoryCatalogStore>;

/// Wire the seed into a catalog service and an identity provider.
pub(crate) fn build_catalog(
    seed: SeedFile,
) -> Result<(Arc<CatalogService>, Arc<InMemorySessions>), SnapshotError> {
    let store = InMemoryCatalogStore::from_snapshot(seed.catalog)?;
    let service = Arc::new(HotelCatalogService::new(Arc::new(store)));
    let identity = Arc::new(InMemorySessions::from_seeds(seed.sessions)?);
    Ok((service, identity))
}

/// Demo records: one user per eligibility state and a small hotel catalog.
///
/// | token            | user | state                         |
/// |------------------|------|-------------------------------|
/// | `demo-eligible`  | 1    | paid, in person, with hotel   |
/// | `demo-reserved`  | 2    | reserved                      |
/// | `demo-remote`    | 3    | paid, remote                  |
/// | `demo-no-ticket` | 4    | enrolled without ticket       |
/// | `demo-visitor`   | 5    | not enrolled                  |
pub(crate) fn demo_seed(now: DateTime<Utc>) -> SeedFile {
    let created = now - Duration::days(30);

    let enrollments = (1..=4)
        .map(|id| Enrollment {
            id: EnrollmentId(id),
            user_id: UserId(id),
            name: format!("Demo attendee {id}"),
        })
        .collect();

    let ticket_types = vec![
        TicketType {
            id: TicketTypeId(1),
            name: "Online".to_string(),
            price: 100,
            is_remote: true,
            includes_hotel: false,
        },
        TicketType {
            id: TicketTypeId(2),
            name: "In person with hotel".to_string(),
            price: 600,
            is_remote: false,
            includes_hotel: true,
        },
    ];

    let ticket = |id: i64, ticket_type_id: i64, status: TicketStatus| Ticket {
        id: TicketId(id),
        enrollment_id: EnrollmentId(id),
        ticket_type_id: TicketTypeId(ticket_type_id),
        status,
        created_at: created,
        updated_at: now,
    };
    let tickets = vec![
        ticket(1, 2, TicketStatus::Paid),
        ticket(2, 2, TicketStatus::Reserved),
        ticket(3, 1, TicketStatus::Paid),
    ];

    let hotels: Vec<Hotel> = ["Lakeside Inn", "Central Suites", "Harbor Lodge"]
        .into_iter()
        .zip(1..)
        .map(|(name, id)| Hotel {
            id: HotelId(id),
            name: name.to_string(),
            image: format!("https://images.example.com/hotels/{id}.jpg"),
            created_at: created,
            updated_at: created,
        })
        .collect();

    let rooms = hotels
        .iter()
        .flat_map(|hotel| {
            [(1, 1), (2, 2), (3, 3)].map(|(number, capacity)| Room {
                id: RoomId(hotel.id.0 * 100 + number),
                name: format!("{}0{}", hotel.id.0, number),
                capacity,
                hotel_id: hotel.id,
                created_at: created,
                updated_at: created,
            })
        })
        .collect();

    let sessions = [
        ("demo-eligible", 1),
        ("demo-reserved", 2),
        ("demo-remote", 3),
        ("demo-no-ticket", 4),
        ("demo-visitor", 5),
    ]
    .into_iter()
    .map(|(token, user_id)| SessionSeed {
        token: token.to_string(),
        user_id: UserId(user_id),
    })
    .collect();

    SeedFile {
        catalog: CatalogSnapshot {
            enrollments,
            ticket_types,
            tickets,
            hotels,
            rooms,
        },
        sessions,
    }
}
