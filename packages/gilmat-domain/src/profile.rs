use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Attribute names a profile must carry before it can drive a recommendation, in collection order.
pub const PROFILE_ATTRIBUTES: [&str; 14] = [
	"name",
	"age",
	"gender",
	"nationality",
	"travel_type",
	"party_size",
	"can_wait",
	"budget",
	"spicy_ok",
	"is_vegetarian",
	"avoid_ingredients",
	"like_ingredients",
	"food_category",
	"start_location",
];

/// Traveller profile produced by the conversational collector.
///
/// Every attribute is nullable while the conversation is in progress. Values arrive as JSON and
/// are accepted leniently: numbers become their decimal text, booleans become `O`/`X` and arrays
/// are joined with `", "`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct UserProfile {
	#[serde(default, deserialize_with = "lenient_text")]
	pub name: Option<String>,
	#[serde(default, deserialize_with = "lenient_text")]
	pub age: Option<String>,
	#[serde(default, deserialize_with = "lenient_text")]
	pub gender: Option<String>,
	#[serde(default, deserialize_with = "lenient_text")]
	pub nationality: Option<String>,
	#[serde(default, deserialize_with = "lenient_text")]
	pub travel_type: Option<String>,
	#[serde(default, deserialize_with = "lenient_text")]
	pub party_size: Option<String>,
	#[serde(default, deserialize_with = "lenient_text")]
	pub can_wait: Option<String>,
	#[serde(default, deserialize_with = "lenient_text")]
	pub budget: Option<String>,
	#[serde(default, deserialize_with = "lenient_text")]
	pub spicy_ok: Option<String>,
	#[serde(default, deserialize_with = "lenient_text")]
	pub is_vegetarian: Option<String>,
	#[serde(default, deserialize_with = "lenient_text")]
	pub avoid_ingredients: Option<String>,
	#[serde(default, deserialize_with = "lenient_text")]
	pub like_ingredients: Option<String>,
	#[serde(default, deserialize_with = "lenient_text")]
	pub food_category: Option<String>,
	#[serde(default, deserialize_with = "lenient_text")]
	pub start_location: Option<String>,
}
impl UserProfile {
	pub fn attribute(&self, name: &str) -> Option<&str> {
		let value = match name {
			"name" => &self.name,
			"age" => &self.age,
			"gender" => &self.gender,
			"nationality" => &self.nationality,
			"travel_type" => &self.travel_type,
			"party_size" => &self.party_size,
			"can_wait" => &self.can_wait,
			"budget" => &self.budget,
			"spicy_ok" => &self.spicy_ok,
			"is_vegetarian" => &self.is_vegetarian,
			"avoid_ingredients" => &self.avoid_ingredients,
			"like_ingredients" => &self.like_ingredients,
			"food_category" => &self.food_category,
			"start_location" => &self.start_location,
			_ => return None,
		};

		value.as_deref()
	}

	pub fn missing_attributes(&self) -> Vec<&'static str> {
		PROFILE_ATTRIBUTES.into_iter().filter(|name| self.attribute(name).is_none()).collect()
	}

	pub fn is_complete(&self) -> bool {
		PROFILE_ATTRIBUTES.iter().all(|name| self.attribute(name).is_some())
	}

	/// Plain `attribute: value` lines, used when no language model is available to summarise.
	pub fn describe(&self) -> String {
		PROFILE_ATTRIBUTES
			.iter()
			.filter_map(|name| self.attribute(name).map(|value| format!("{name}: {value}")))
			.collect::<Vec<_>>()
			.join("\n")
	}
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: Deserializer<'de>,
{
	let value = Option::<Value>::deserialize(deserializer)?;

	match value {
		None | Some(Value::Null) => Ok(None),
		Some(Value::String(text)) => Ok(Some(text)),
		Some(Value::Number(number)) => Ok(Some(number.to_string())),
		Some(Value::Bool(flag)) => Ok(Some(if flag { "O" } else { "X" }.to_string())),
		Some(Value::Array(items)) => {
			let mut parts = Vec::with_capacity(items.len());

			for item in items {
				match item {
					Value::String(text) => parts.push(text),
					Value::Number(number) => parts.push(number.to_string()),
					Value::Null => {},
					_ => {
						return Err(serde::de::Error::custom(
							"profile list values must be strings or numbers",
						));
					},
				}
			}

			Ok(Some(parts.join(", ")))
		},
		Some(Value::Object(_)) => {
			Err(serde::de::Error::custom("profile values must not be objects"))
		},
	}
}
