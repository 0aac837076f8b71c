use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::reference::{default_true, lenient_timestamp};

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
	#[serde(rename = "_id", alias = "id", default)]
	pub id: String,
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub image: Option<String>,
	#[serde(default)]
	pub original_url: Option<String>,
	#[serde(default = "default_true")]
	pub is_active: bool,
	#[serde(default)]
	pub order: i64,
	#[serde(default, deserialize_with = "lenient_timestamp")]
	pub created_at: Option<DateTime<Utc>>,
}

/// An image picked in the admin news form.
#[derive(Debug, Clone)]
pub struct ImageUpload {
	pub file_name: String,
	pub mime: String,
	pub bytes: Vec<u8>,
}

/// Multipart payload for `POST /news` and `PUT /news/:id`.
#[derive(Debug, Clone, Default)]
pub struct NewsDraft {
	pub title: String,
	pub description: String,
	pub original_url: Option<String>,
	pub is_active: bool,
	pub order: i64,
	pub image: Option<ImageUpload>,
}

impl NewsDraft {
	pub fn validate(&self) -> Result<(), String> {
		if self.title.trim().is_empty() {
			return Err("News title is required".to_string());
		}
		if self.description.trim().is_empty() {
			return Err("News description is required".to_string());
		}
		Ok(())
	}

	pub fn text_fields(&self) -> Vec<(&'static str, String)> {
		let mut fields = vec![
			("title", self.title.trim().to_string()),
			("description", self.description.clone()),
			("isActive", self.is_active.to_string()),
			("order", self.order.to_string()),
		];
		if let Some(url) = self.original_url.as_ref().filter(|url| !url.trim().is_empty()) {
			fields.push(("originalUrl", url.trim().to_string()));
		}
		fields
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn text_fields_skip_blank_original_url() {
		let draft = NewsDraft {
			title: " Expo 2025 ".to_string(),
			description: "Visit our booth".to_string(),
			original_url: Some("  ".to_string()),
			is_active: true,
			order: 2,
			image: None,
		};
		let fields = draft.text_fields();
		assert_eq!(fields[0], ("title", "Expo 2025".to_string()));
		assert!(fields.iter().all(|(key, _)| *key != "originalUrl"));
		assert!(fields.contains(&("isActive", "true".to_string())));
	}

	#[test]
	fn draft_requires_title_and_description() {
		assert!(NewsDraft::default().validate().is_err());
	}
}
