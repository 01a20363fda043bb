pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Profile is incomplete, missing: {}.", .missing.join(", "))]
	IncompleteProfile { missing: Vec<String> },
	#[error("Invalid configuration: {message}")]
	InvalidConfig { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Routing service is down: {failed} of {total} routing calls failed.")]
	RoutingServiceDown { failed: usize, total: usize },
	#[error("None of the {requested} retrieved candidates exist in the catalog.")]
	CandidatesUnavailable { requested: usize },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
	#[error("Qdrant error: {message}")]
	Qdrant { message: String },
}
impl From<gilmat_providers::Error> for Error {
	fn from(err: gilmat_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}

impl From<gilmat_storage::Error> for Error {
	fn from(err: gilmat_storage::Error) -> Self {
		match err {
			gilmat_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			gilmat_storage::Error::Qdrant(inner) => Self::Qdrant { message: inner.to_string() },
			other @ (gilmat_storage::Error::ReadCatalog { .. }
			| gilmat_storage::Error::ParseCatalog { .. }) => Self::Storage { message: other.to_string() },
		}
	}
}

impl From<gilmat_config::Error> for Error {
	fn from(err: gilmat_config::Error) -> Self {
		Self::InvalidRequest { message: err.to_string() }
	}
}
