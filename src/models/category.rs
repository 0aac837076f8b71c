use serde::{Deserialize, Serialize};

use super::reference::{default_true, EntityRef, Identified};
use crate::utils::Translit;

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
	#[serde(rename = "_id", alias = "id", default)]
	pub id: String,
	#[serde(default)]
	pub name: String,
	#[serde(default)]
	pub slug: String,
	#[serde(default)]
	pub description: Option<String>,
	#[serde(default)]
	pub image: Option<String>,
	#[serde(default = "default_true")]
	pub is_active: bool,
	#[serde(default)]
	pub order: i64,
	#[serde(default)]
	pub parent: Option<EntityRef<Category>>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub subcategories: Vec<Category>,
}

impl Identified for Category {
	fn id(&self) -> &str {
		&self.id
	}
}

impl Category {
	pub fn parent_id(&self) -> Option<&str> {
		self.parent.as_ref().map(|parent| parent.id())
	}
}

/// Write payload for `POST /categories` and `PUT /categories/:id`.
#[derive(Debug, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDraft {
	pub name: String,
	pub slug: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	pub parent: Option<String>,
	pub is_active: bool,
	pub order: i64,
}

impl CategoryDraft {
	/// Trims the form and fills an empty slug from the name.
	pub fn normalized(mut self) -> Result<Self, String> {
		self.name = self.name.trim().to_string();
		if self.name.is_empty() {
			return Err("Category name is required".to_string());
		}

		let slug = if self.slug.trim().is_empty() {
			Translit::slug(&self.name)
		} else {
			Translit::slug(&self.slug)
		};
		if slug.is_empty() {
			return Err(format!("Cannot build a slug from {:?}", self.name));
		}
		self.slug = slug;
		self.parent = self.parent.filter(|parent| !parent.trim().is_empty());

		Ok(self)
	}
}
