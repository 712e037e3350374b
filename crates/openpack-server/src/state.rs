//! Shared per-process state.

use std::sync::Arc;

use openpack_core::{ArchiveStore, DescriptionFetcher, Synthesizer};

/// Dependencies handed to every handler.
///
/// The store's lifecycle belongs to the hosting process; handlers only see
/// the injected trait objects.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<dyn DescriptionFetcher>,
    pub store: Arc<dyn ArchiveStore>,
    pub synthesizer: Arc<Synthesizer>,
}
