use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub trait Identified {
	fn id(&self) -> &str;
}

/// A relation the API returns either as a bare id or as the populated document.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum EntityRef<T> {
	Id(String),
	Embedded(Box<T>),
}

impl<T: Identified> EntityRef<T> {
	pub fn id(&self) -> &str {
		match self {
			EntityRef::Id(id) => id,
			EntityRef::Embedded(entity) => entity.id(),
		}
	}

	pub fn embedded(&self) -> Option<&T> {
		match self {
			EntityRef::Id(_) => None,
			EntityRef::Embedded(entity) => Some(entity),
		}
	}
}

pub(crate) fn default_true() -> bool {
	true
}

/// Malformed or missing timestamps become `None` instead of failing the whole list.
pub(crate) fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
	D: Deserializer<'de>,
{
	let value = Option::<Value>::deserialize(deserializer)?;
	Ok(match value {
		Some(Value::String(raw)) => DateTime::parse_from_rfc3339(&raw)
			.map(|ts| ts.with_timezone(&Utc))
			.ok(),
		Some(Value::Number(millis)) => millis.as_i64().and_then(DateTime::from_timestamp_millis),
		_ => None,
	})
}
