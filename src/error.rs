use reqwest::StatusCode;
use thiserror::Error;

pub const GENERIC_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Error)]
pub enum ApiError {
	#[error("network error: {0}")]
	Network(#[from] reqwest::Error),

	#[error("{status}: {message}")]
	Api { status: StatusCode, message: String },

	#[error("not authenticated")]
	Unauthorized,

	#[error("not found")]
	NotFound,

	#[error("invalid response body: {0}")]
	Decode(#[from] serde_json::Error),

	#[error("io error: {0}")]
	Io(#[from] std::io::Error),

	#[error("{0}")]
	Validation(String),
}

impl ApiError {
	/// Text a screen shows next to the form or list that issued the request.
	pub fn user_message(&self) -> String {
		match self {
			ApiError::Api { message, .. } => message.clone(),
			ApiError::Validation(message) => message.clone(),
			ApiError::Unauthorized => "Please log in to continue.".to_string(),
			ApiError::NotFound => "Not found.".to_string(),
			ApiError::Network(_) | ApiError::Decode(_) | ApiError::Io(_) => {
				GENERIC_MESSAGE.to_string()
			}
		}
	}
}

#[derive(Debug, Error)]
pub enum EnquiryError {
	#[error("{0} is required")]
	MissingField(&'static str),

	#[error("{0}")]
	Failed(String),

	#[error("could not store brochure: {0}")]
	Sink(#[from] std::io::Error),
}
