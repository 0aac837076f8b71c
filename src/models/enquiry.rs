use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::reference::{lenient_timestamp, EntityRef};
use super::Product;
use crate::error::EnquiryError;

#[derive(Debug, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnquiryForm {
	pub name: String,
	pub email: String,
	pub phone: String,
	pub message: String,
	pub product_id: String,
}

impl EnquiryForm {
	pub fn validate(&self) -> Result<(), EnquiryError> {
		if self.email.trim().is_empty() {
			return Err(EnquiryError::MissingField("email"));
		}
		if self.phone.trim().is_empty() {
			return Err(EnquiryError::MissingField("phone"));
		}
		Ok(())
	}
}

/// Enquiry as listed in the admin back-office.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Enquiry {
	#[serde(rename = "_id", alias = "id", default)]
	pub id: String,
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub email: String,
	#[serde(default)]
	pub phone: String,
	#[serde(default)]
	pub message: Option<String>,
	#[serde(default, alias = "productId")]
	pub product: Option<EntityRef<Product>>,
	#[serde(default, deserialize_with = "lenient_timestamp")]
	pub created_at: Option<DateTime<Utc>>,
}

impl Enquiry {
	pub fn product_name(&self) -> &str {
		match self.product.as_ref() {
			Some(EntityRef::Embedded(product)) => &product.name,
			Some(EntityRef::Id(id)) => id,
			None => "-",
		}
	}
}
