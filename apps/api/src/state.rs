use std::sync::Arc;

use crate::config::Config;
use crate::resume::repository::SectionRepository;
use crate::resume::schema::SectionKind;
use crate::resume::store::{SectionStore, UserStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Section rows. Production: `PgStore`.
    pub sections: Arc<dyn SectionStore>,
    /// Accounts. Production: the same `PgStore`.
    pub users: Arc<dyn UserStore>,
    pub config: Config,
}

impl AppState {
    pub fn repository(&self, kind: SectionKind) -> SectionRepository {
        SectionRepository::new(self.sections.clone(), kind)
    }
}
