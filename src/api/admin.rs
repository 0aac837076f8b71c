use super::ApiClient;
use crate::error::ApiError;
use crate::models::AdminStats;

impl AdminStats {
	/// GET dashboard counters
	pub async fn get_stats(api: &ApiClient) -> Result<Self, ApiError> {
		api.session().require_admin()?;
		api.get_item("/admin/stats").await
	}
}
