use std::sync::Arc;

use gilmat_service::{DataContext, GilmatService, QdrantIndex};
use gilmat_storage::qdrant::QdrantStore;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<GilmatService>,
}
impl AppState {
	pub fn new(config: gilmat_config::Config) -> color_eyre::Result<Self> {
		let data = DataContext::load(&config)?;
		let store = QdrantStore::new(&config.storage.qdrant)?;
		let index = QdrantIndex::new(store, config.providers.embedding.clone())?;
		let service = GilmatService::new(config, Arc::new(data), Arc::new(index))?;

		Ok(Self::from_service(service))
	}

	pub fn from_service(service: GilmatService) -> Self {
		Self { service: Arc::new(service) }
	}
}
