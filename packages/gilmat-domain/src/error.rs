pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid coordinates {value:?}: {reason}.")]
	InvalidCoordinates { value: String, reason: &'static str },
	#[error("Unknown price tier {value:?}.")]
	InvalidPriceTier { value: String },
}
