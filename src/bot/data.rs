use std::sync::Arc;

use crate::models::types::RenderedPage;
use crate::utils::catalogue::CatalogueHandle;
use crate::utils::config::SettingsStore;
use crate::utils::pagination::SessionRegistry;
use crate::utils::source::PetSource;

pub type PageSessions = SessionRegistry<RenderedPage>;

#[derive(Clone)]
pub struct BotData {
    pub catalogue: Arc<CatalogueHandle>,
    pub settings: Arc<SettingsStore>,
    pub sessions: Arc<PageSessions>,
    pub pet_source: PetSource,
}
