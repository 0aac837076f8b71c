use reqwest::Method;

use super::{segment, ApiClient, Confirmed};
use crate::error::ApiError;
use crate::models::{Category, CategoryDraft};

impl Category {
	/// GET active categories with embedded subcategories
	pub async fn get_categories(api: &ApiClient) -> Result<Vec<Self>, ApiError> {
		api.get_list("/categories").await
	}

	/// GET every category, inactive included
	pub async fn get_all_categories(api: &ApiClient) -> Result<Vec<Self>, ApiError> {
		api.get_list("/categories/all").await
	}

	pub async fn create(api: &ApiClient, draft: CategoryDraft) -> Result<Self, ApiError> {
		let draft = draft.normalized().map_err(ApiError::Validation)?;
		api.send_json(Method::POST, "/categories", &draft).await
	}

	pub async fn update(api: &ApiClient, id: &str, draft: CategoryDraft) -> Result<Self, ApiError> {
		let draft = draft.normalized().map_err(ApiError::Validation)?;
		if draft.parent.as_deref() == Some(id) {
			return Err(ApiError::Validation(
				"A category cannot be its own parent".to_string(),
			));
		}
		let path = format!("/categories/{}", segment(id));
		api.send_json(Method::PUT, &path, &draft).await
	}

	pub async fn delete(api: &ApiClient, id: &str, confirmed: Confirmed) -> Result<(), ApiError> {
		api.delete(&format!("/categories/{}", segment(id)), confirmed).await
	}
}
