use crate::infra::{build_catalog, resolve_seed_path, CatalogService, SeedFile};
use clap::Args;
use hotel_catalog::catalog::{status_for, CatalogError, HotelId, UserId};
use hotel_catalog::config::AppConfig;
use hotel_catalog::error::AppError;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct AccessCheckArgs {
    /// User to evaluate
    #[arg(long)]
    pub(crate) user_id: i64,
    /// Check the room listing of this hotel instead of the hotel list
    #[arg(long)]
    pub(crate) hotel_id: Option<i64>,
    /// Seed file to read records from (defaults to CATALOG_SEED_PATH, then the demo records)
    #[arg(long)]
    pub(crate) seed: Option<PathBuf>,
}

/// Run one catalog request against the seed and print what the API would answer.
pub(crate) async fn run_access_check(args: AccessCheckArgs) -> Result<(), AppError> {
    let AccessCheckArgs {
        user_id,
        hotel_id,
        seed,
    } = args;

    let mut config = AppConfig::load()?;
    let seed_path = resolve_seed_path(&mut config, seed)?;
    let (service, _) = build_catalog(SeedFile::load(seed_path.as_deref())?)?;

    let report = check(&service, UserId(user_id), hotel_id.map(HotelId)).await;
    println!("{report}");
    Ok(())
}

pub(crate) async fn check(
    service: &CatalogService,
    user_id: UserId,
    hotel_id: Option<HotelId>,
) -> String {
    match hotel_id {
        None => match service.list_hotels(user_id).await {
            Ok(hotels) => {
                let mut lines = vec![format!(
                    "user {user_id}: 200 OK, {} hotel(s) visible",
                    hotels.len()
                )];
                lines.extend(
                    hotels
                        .iter()
                        .map(|hotel| format!("- [{}] {}", hotel.id, hotel.name)),
                );
                lines.join("\n")
            }
            Err(error) => denied(user_id, &error),
        },
        Some(hotel_id) => match service.list_hotel_rooms(hotel_id, user_id).await {
            Ok(hotels) => {
                let mut lines = vec![format!("user {user_id}: 200 OK, hotel {hotel_id}")];
                for hotel in &hotels {
                    lines.push(format!("{} ({} room(s))", hotel.hotel.name, hotel.rooms.len()));
                    lines.extend(hotel.rooms.iter().map(|room| {
                        format!("- [{}] {} sleeps {}", room.id, room.name, room.capacity)
                    }));
                }
                lines.join("\n")
            }
            Err(error) => denied(user_id, &error),
        },
    }
}

fn denied(user_id: UserId, error: &CatalogError) -> String {
    let kind = error.kind();
    format!(
        "user {user_id}: {} ({}): {error}",
        status_for(kind),
        kind.label()
    )
}
