pub mod filter;
pub mod geo;
pub mod price;
pub mod profile;
pub mod restaurant;
pub mod travel;

mod error;

pub use error::{Error, Result};
pub use filter::{FilterMetadata, MetadataFilter, NOT_AVAILABLE};
pub use geo::Coordinates;
pub use price::PriceTier;
pub use profile::{PROFILE_ATTRIBUTES, UserProfile};
pub use restaurant::{ComponentScores, RestaurantRecord};
pub use travel::ItineraryOption;
