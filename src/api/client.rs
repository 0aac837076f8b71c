use log::{debug, warn};
use reqwest::{
	header::{self, HeaderMap, HeaderValue},
	Client, Method, RequestBuilder, Response, StatusCode,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::time::Duration;

use crate::config::Config;
use crate::error::{ApiError, GENERIC_MESSAGE};
use crate::services::Session;
use crate::utils::resolve_image_url;

/// Proof that the user confirmed a destructive action.
#[derive(Debug)]
pub struct Confirmed(());

/// Accepts `y` / `yes` in any case; anything else cancels.
pub fn confirm_deletion(answer: &str) -> Option<Confirmed> {
	match answer.trim().to_lowercase().as_str() {
		"y" | "yes" => Some(Confirmed(())),
		_ => None,
	}
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListResponse<T> {
	List(Vec<T>),
	Data { data: Vec<T> },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ItemResponse<T> {
	Data { data: T },
	Plain(T),
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ErrorBody {
	message: Option<String>,
	error: Option<String>,
}

/// `message` (or `error`) of a JSON error body.
pub fn message_from_body(body: &[u8]) -> Option<String> {
	let text = std::str::from_utf8(body).ok()?;
	let parsed: ErrorBody = serde_json::from_str(text).ok()?;
	parsed
		.message
		.or(parsed.error)
		.filter(|message| !message.trim().is_empty())
}

#[derive(Debug, Clone)]
pub struct ApiClient {
	http: Client,
	base_url: String,
	origin: String,
	session: Arc<Session>,
}

impl ApiClient {
	pub fn new(config: &Config, session: Arc<Session>) -> Result<Self, ApiError> {
		let headers: HeaderMap<HeaderValue> = HeaderMap::from_iter(vec![(
			header::ACCEPT,
			HeaderValue::from_static("application/json"),
		)]);

		let http = Client::builder()
			.default_headers(headers)
			.timeout(Duration::from_secs(config.timeout_secs))
			.build()?;

		Ok(ApiClient {
			http,
			base_url: config.api_url.trim_end_matches('/').to_string(),
			origin: config.api_origin.clone(),
			session,
		})
	}

	pub fn session(&self) -> &Arc<Session> {
		&self.session
	}

	pub fn image_url(&self, reference: &str) -> String {
		resolve_image_url(&self.origin, reference)
	}

	pub fn url(&self, path: &str) -> String {
		format!("{}/{}", self.base_url, path.trim_start_matches('/'))
	}

	/// Request with the bearer token attached when the session holds one.
	pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
		let builder = self.http.request(method, self.url(path));
		match self.session.token() {
			Some(token) => builder.bearer_auth(token),
			None => builder,
		}
	}

	/// Sends without interpreting the status; only transport failures are errors.
	pub async fn send_unchecked(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
		let response = builder.send().await?;
		debug!("{} {}", response.status(), response.url());
		Ok(response)
	}

	pub async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
		let response = self.send_unchecked(builder).await?;
		self.check(response).await
	}

	/// Maps non-2xx responses onto the error taxonomy. Auth failures clear the session.
	pub async fn check(&self, response: Response) -> Result<Response, ApiError> {
		let status = response.status();
		if status.is_success() {
			return Ok(response);
		}

		match status {
			StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
				if self.session.token().is_some() {
					warn!("{} from {}, clearing session", status, response.url());
					self.session.clear();
				}
				Err(ApiError::Unauthorized)
			}
			StatusCode::NOT_FOUND => Err(ApiError::NotFound),
			_ => {
				let body = response.bytes().await.unwrap_or_default();
				let message = message_from_body(&body).unwrap_or(GENERIC_MESSAGE.to_string());
				Err(ApiError::Api { status, message })
			}
		}
	}

	pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
		let response = self.send(self.request(Method::GET, path)).await?;
		let body = response.bytes().await?;
		Ok(serde_json::from_slice(&body)?)
	}

	pub async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
		Ok(match self.get_json::<ListResponse<T>>(path).await? {
			ListResponse::List(items) => items,
			ListResponse::Data { data } => data,
		})
	}

	pub async fn get_item<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
		Ok(match self.get_json::<ItemResponse<T>>(path).await? {
			ItemResponse::Data { data } => data,
			ItemResponse::Plain(item) => item,
		})
	}

	pub async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
	where
		B: Serialize + ?Sized,
		T: DeserializeOwned,
	{
		let response = self.send(self.request(method, path).json(body)).await?;
		let bytes = response.bytes().await?;
		Ok(match serde_json::from_slice::<ItemResponse<T>>(&bytes)? {
			ItemResponse::Data { data } => data,
			ItemResponse::Plain(item) => item,
		})
	}

	pub async fn delete(&self, path: &str, _confirmed: Confirmed) -> Result<(), ApiError> {
		self.send(self.request(Method::DELETE, path)).await?;
		Ok(())
	}
}

/// Percent-encodes an id before it is placed in a path.
pub fn segment(id: &str) -> String {
	urlencoding::encode(id).into_owned()
}
