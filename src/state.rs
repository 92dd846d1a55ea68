use crate::config::AppConfig;
use crate::services::catalog_service::CatalogStore;
use crate::services::itinerary_generation_service::{ItineraryGenerator, ScheduleError};
use crate::services::tour_guide_service::GuideStore;

/// Shared across workers through `web::Data`.
pub struct AppState {
    pub config: AppConfig,
    pub catalog: CatalogStore,
    pub generator: ItineraryGenerator,
    pub guides: GuideStore,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, ScheduleError> {
        Ok(Self {
            catalog: CatalogStore::from_config(&config),
            generator: ItineraryGenerator::with_config(config.schedule.clone())?,
            guides: GuideStore::from_config(&config),
            config,
        })
    }
}
