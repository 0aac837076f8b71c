use serde::{Deserialize, Serialize};

/// `GET /admin/stats`
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminStats {
	pub total_products: u64,
	pub active_products: u64,
	pub inactive_products: u64,
	pub total_categories: u64,
	pub active_categories: u64,
	pub inactive_categories: u64,
	pub total_enquiries: u64,
	pub recent_enquiries: u64,
}
