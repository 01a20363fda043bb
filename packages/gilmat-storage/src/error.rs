#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to read catalog at {path:?}.")]
	ReadCatalog { path: std::path::PathBuf, source: std::io::Error },
	#[error("Failed to parse catalog at {path:?}.")]
	ParseCatalog { path: std::path::PathBuf, source: serde_json::Error },
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
	#[error(transparent)]
	Qdrant(#[from] Box<qdrant_client::QdrantError>),
}
impl From<qdrant_client::QdrantError> for Error {
	fn from(err: qdrant_client::QdrantError) -> Self {
		Self::Qdrant(Box::new(err))
	}
}
