use reqwest::{
	multipart::{Form, Part},
	Method,
};

use super::{segment, ApiClient, Confirmed};
use crate::error::ApiError;
use crate::models::{Product, ProductDraft, ProductQuery};

impl Product {
	/// GET active products, optionally only featured or only one category
	pub async fn get_products(api: &ApiClient, query: &ProductQuery) -> Result<Vec<Self>, ApiError> {
		let query_string = serde_urlencoded::to_string(query)
			.map_err(|e| ApiError::Validation(e.to_string()))?;
		let path = if query_string.is_empty() {
			"/products".to_string()
		} else {
			format!("/products?{}", query_string)
		};
		api.get_list(&path).await
	}

	/// GET product by id
	pub async fn get_product(api: &ApiClient, id: &str) -> Result<Self, ApiError> {
		api.get_item(&format!("/products/{}", segment(id))).await
	}

	/// GET every product, inactive included
	pub async fn get_all_products(api: &ApiClient) -> Result<Vec<Self>, ApiError> {
		api.get_list("/products/all").await
	}

	pub async fn create(api: &ApiClient, draft: &ProductDraft) -> Result<Self, ApiError> {
		draft.validate().map_err(ApiError::Validation)?;
		api.send_json(Method::POST, "/products", draft).await
	}

	pub async fn update(api: &ApiClient, id: &str, draft: &ProductDraft) -> Result<Self, ApiError> {
		draft.validate().map_err(ApiError::Validation)?;
		api.send_json(Method::PUT, &format!("/products/{}", segment(id)), draft)
			.await
	}

	pub async fn delete(api: &ApiClient, id: &str, confirmed: Confirmed) -> Result<(), ApiError> {
		api.delete(&format!("/products/{}", segment(id)), confirmed).await
	}

	/// Multipart upload of a PDF brochure under the `brochure` field.
	pub async fn upload_brochure(
		api: &ApiClient,
		id: &str,
		file_name: &str,
		bytes: Vec<u8>,
	) -> Result<Self, ApiError> {
		if bytes.is_empty() {
			return Err(ApiError::Validation("Brochure file is empty".to_string()));
		}
		if !file_name.to_lowercase().ends_with(".pdf") {
			return Err(ApiError::Validation("Brochure must be a PDF file".to_string()));
		}

		let part = Part::bytes(bytes)
			.file_name(file_name.to_string())
			.mime_str("application/pdf")?;
		let form = Form::new().part("brochure", part);

		let path = format!("/products/{}/brochure", segment(id));
		let response = api
			.send(api.request(Method::POST, &path).multipart(form))
			.await?;
		let body = response.bytes().await?;

		#[derive(serde::Deserialize)]
		#[serde(untagged)]
		enum Uploaded {
			Wrapped { product: Product },
			Data { data: Product },
			Plain(Product),
		}

		Ok(match serde_json::from_slice::<Uploaded>(&body)? {
			Uploaded::Wrapped { product } => product,
			Uploaded::Data { data } => data,
			Uploaded::Plain(product) => product,
		})
	}
}
