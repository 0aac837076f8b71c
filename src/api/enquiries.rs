use reqwest::{header, Method, Response};

use super::{segment, ApiClient, Confirmed};
use crate::error::ApiError;
use crate::models::{Enquiry, EnquiryForm};

impl Enquiry {
	/// POST the form and hand back the raw response: its shape depends on the product.
	pub async fn submit(api: &ApiClient, form: &EnquiryForm) -> Result<Response, ApiError> {
		let builder = api
			.request(Method::POST, "/enquiries")
			.header(header::ACCEPT, "application/json, application/pdf, */*")
			.json(form);
		api.send_unchecked(builder).await
	}

	pub async fn get_enquiries(api: &ApiClient) -> Result<Vec<Self>, ApiError> {
		api.get_list("/enquiries").await
	}

	pub async fn delete(api: &ApiClient, id: &str, confirmed: Confirmed) -> Result<(), ApiError> {
		api.delete(&format!("/enquiries/{}", segment(id)), confirmed).await
	}
}
