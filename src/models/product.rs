use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::reference::{default_true, lenient_timestamp, EntityRef, Identified};
use super::Category;

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
	#[serde(rename = "_id", alias = "id", default)]
	pub id: String,
	#[serde(default)]
	pub name: String,
	#[serde(default)]
	pub order_code: String,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub specifications: Option<String>,
	#[serde(default = "default_price", deserialize_with = "price_from_any")]
	pub price: String,
	#[serde(default)]
	pub images: Vec<String>,
	#[serde(default)]
	pub brochure: Option<Brochure>,
	#[serde(default)]
	pub featured: bool,
	#[serde(default)]
	pub new: bool,
	#[serde(default)]
	pub best_seller: bool,
	#[serde(default = "default_true")]
	pub is_active: bool,
	#[serde(default)]
	pub category: Option<EntityRef<Category>>,
	#[serde(default)]
	pub order: i64,
	#[serde(default, deserialize_with = "lenient_timestamp")]
	pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Brochure {
	#[serde(alias = "path", alias = "file", default)]
	pub url: String,
	#[serde(default)]
	pub original_name: Option<String>,
}

impl Identified for Product {
	fn id(&self) -> &str {
		&self.id
	}
}

impl Product {
	pub fn category_id(&self) -> Option<&str> {
		self.category.as_ref().map(|category| category.id())
	}

	/// `needle` must already be lowercased.
	pub fn matches_search(&self, needle: &str) -> bool {
		[&self.name, &self.order_code, &self.description]
			.iter()
			.any(|field| field.to_lowercase().contains(needle))
	}
}

/// Write payload for `POST /products` and `PUT /products/:id`.
#[derive(Debug, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
	pub name: String,
	pub order_code: String,
	pub description: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub specifications: Option<String>,
	pub price: String,
	pub images: Vec<String>,
	pub featured: bool,
	pub new: bool,
	pub best_seller: bool,
	pub is_active: bool,
	pub category: String,
	pub order: i64,
}

impl ProductDraft {
	pub fn from_product(product: &Product) -> Self {
		ProductDraft {
			name: product.name.clone(),
			order_code: product.order_code.clone(),
			description: product.description.clone(),
			specifications: product.specifications.clone(),
			price: product.price.clone(),
			images: product.images.clone(),
			featured: product.featured,
			new: product.new,
			best_seller: product.best_seller,
			is_active: product.is_active,
			category: product.category_id().unwrap_or_default().to_string(),
			order: product.order,
		}
	}

	pub fn validate(&self) -> Result<(), String> {
		if self.name.trim().is_empty() {
			return Err("Product name is required".to_string());
		}
		if self.category.trim().is_empty() {
			return Err("Product category is required".to_string());
		}
		if self.price.trim().parse::<f64>().is_err() {
			return Err(format!("Price {:?} is not a number", self.price));
		}
		Ok(())
	}
}

#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct ProductQuery {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub featured: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub category: Option<String>,
}

impl ProductQuery {
	pub fn featured() -> Self {
		ProductQuery {
			featured: Some(true),
			category: None,
		}
	}

	pub fn in_category(category_id: &str) -> Self {
		ProductQuery {
			featured: None,
			category: Some(category_id.to_string()),
		}
	}
}

fn default_price() -> String {
	"0".to_string()
}

fn price_from_any<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	let value = Option::<Value>::deserialize(deserializer)?;
	Ok(match value {
		Some(Value::String(price)) if !price.trim().is_empty() => price,
		Some(Value::Number(price)) => price.to_string(),
		_ => default_price(),
	})
}
