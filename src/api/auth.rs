use reqwest::Method;
use serde_json::json;

use super::{message_from_body, segment, ApiClient};
use crate::error::ApiError;
use crate::models::{AuthResponse, Credentials, MeResponse, MessageResponse, User};

const LOGIN_FAILED: &str = "Login failed. Please try again.";

impl User {
	/// POST credentials; returns the issued token and the user it belongs to.
	pub async fn login(api: &ApiClient, credentials: &Credentials) -> Result<(String, Self), ApiError> {
		let response = api
			.send_unchecked(api.request(Method::POST, "/auth/login").json(credentials))
			.await?;
		let status = response.status();
		let body = response.bytes().await?;

		if !status.is_success() {
			let message = message_from_body(&body).unwrap_or(LOGIN_FAILED.to_string());
			return Err(ApiError::Api { status, message });
		}

		let auth: AuthResponse = serde_json::from_slice(&body)?;
		Ok(auth.into_parts())
	}

	/// GET the identity behind the current bearer token
	pub async fn me(api: &ApiClient) -> Result<Self, ApiError> {
		let me: MeResponse = api.get_json("/auth/me").await?;
		Ok(me.into_user())
	}

	pub async fn forgot_password(api: &ApiClient, email: &str) -> Result<String, ApiError> {
		let email = email.trim();
		if email.is_empty() {
			return Err(ApiError::Validation("Email is required".to_string()));
		}
		let response: MessageResponse = api
			.send_json(Method::POST, "/auth/forgot-password", &json!({ "email": email }))
			.await?;
		Ok(response
			.message
			.unwrap_or("Password reset email sent".to_string()))
	}

	pub async fn reset_password(api: &ApiClient, token: &str, password: &str) -> Result<String, ApiError> {
		if password.len() < 6 {
			return Err(ApiError::Validation(
				"Password must be at least 6 characters".to_string(),
			));
		}
		let path = format!("/auth/reset-password/{}", segment(token));
		let response: MessageResponse = api
			.send_json(Method::PUT, &path, &json!({ "password": password }))
			.await?;
		Ok(response.message.unwrap_or("Password has been reset".to_string()))
	}
}
