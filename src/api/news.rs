use reqwest::{
	multipart::{Form, Part},
	Method,
};

use super::{segment, ApiClient, Confirmed};
use crate::error::ApiError;
use crate::models::{NewsDraft, NewsItem};

impl NewsItem {
	pub async fn get_news(api: &ApiClient) -> Result<Vec<Self>, ApiError> {
		api.get_list("/news").await
	}

	pub async fn get_all_news(api: &ApiClient) -> Result<Vec<Self>, ApiError> {
		api.get_list("/news/all").await
	}

	pub async fn create(api: &ApiClient, draft: NewsDraft) -> Result<Self, ApiError> {
		Self::save(api, Method::POST, "/news".to_string(), draft).await
	}

	pub async fn update(api: &ApiClient, id: &str, draft: NewsDraft) -> Result<Self, ApiError> {
		Self::save(api, Method::PUT, format!("/news/{}", segment(id)), draft).await
	}

	pub async fn delete(api: &ApiClient, id: &str, confirmed: Confirmed) -> Result<(), ApiError> {
		api.delete(&format!("/news/{}", segment(id)), confirmed).await
	}

	async fn save(
		api: &ApiClient,
		method: Method,
		path: String,
		draft: NewsDraft,
	) -> Result<Self, ApiError> {
		draft.validate().map_err(ApiError::Validation)?;

		let mut form = Form::new();
		for (key, value) in draft.text_fields() {
			form = form.text(key, value);
		}
		if let Some(image) = draft.image {
			let part = Part::bytes(image.bytes)
				.file_name(image.file_name)
				.mime_str(&image.mime)?;
			form = form.part("image", part);
		}

		let response = api.send(api.request(method, &path).multipart(form)).await?;
		let body = response.bytes().await?;

		#[derive(serde::Deserialize)]
		#[serde(untagged)]
		enum Saved {
			Data { data: NewsItem },
			Plain(NewsItem),
		}

		Ok(match serde_json::from_slice::<Saved>(&body)? {
			Saved::Data { data } => data,
			Saved::Plain(item) => item,
		})
	}
}
