use log::{error, info, warn};
use reqwest::header;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::PathBuf;

use crate::api::{message_from_body, ApiClient};
use crate::error::EnquiryError;
use crate::models::{Enquiry, EnquiryForm};

pub const ENQUIRY_FAILED: &str = "Failed to submit enquiry. Please try again.";

/// The three shapes `POST /enquiries` answers with.
#[derive(Debug, Clone, PartialEq)]
pub enum EnquiryOutcome {
	DownloadUrl(String),
	Brochure { file_name: String, bytes: Vec<u8> },
	Acknowledged { message: Option<String> },
}

/// What happened on the client after a successful submit.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
	Opened(String),
	Saved(String),
	Acknowledged(Option<String>),
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct EnquiryReply {
	#[serde(alias = "download_url")]
	download_url: Option<String>,
	message: Option<String>,
}

/// Receives brochure links and files produced by an enquiry.
pub trait BrochureSink {
	fn open_url(&mut self, url: &str) -> io::Result<()>;
	/// Takes ownership of the buffer; it is released as soon as the file is stored.
	fn save(&mut self, file_name: &str, bytes: Vec<u8>) -> io::Result<()>;
}

/// Saves brochures into a download directory and records opened links.
#[derive(Debug, Default)]
pub struct DirectorySink {
	dir: PathBuf,
	pub opened: Vec<String>,
	pub saved: Vec<PathBuf>,
}

impl DirectorySink {
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		DirectorySink {
			dir: dir.into(),
			opened: Vec::new(),
			saved: Vec::new(),
		}
	}
}

fn safe_file_name(name: &str) -> String {
	name.chars()
		.map(|ch| match ch {
			'/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
			ch if ch.is_control() => '_',
			ch => ch,
		})
		.collect()
}

impl BrochureSink for DirectorySink {
	fn open_url(&mut self, url: &str) -> io::Result<()> {
		info!("brochure available at {}", url);
		self.opened.push(url.to_string());
		Ok(())
	}

	fn save(&mut self, file_name: &str, bytes: Vec<u8>) -> io::Result<()> {
		let target = self.dir.join(safe_file_name(file_name));
		let partial = target.with_extension("pdf.part");

		let written = fs::write(&partial, &bytes).and_then(|_| fs::rename(&partial, &target));
		drop(bytes);

		if let Err(e) = written {
			let _ = fs::remove_file(&partial);
			return Err(e);
		}

		info!("brochure saved to {}", target.display());
		self.saved.push(target);
		Ok(())
	}
}

/// Decides the outcome from the content type, falling back to sniffing when it is absent.
pub fn classify_response(
	content_type: Option<&str>,
	product_name: &str,
	body: Vec<u8>,
) -> EnquiryOutcome {
	let content_type = content_type.map(str::to_lowercase);
	let is_json = match content_type.as_deref() {
		Some(kind) => kind.contains("json"),
		None => serde_json::from_slice::<serde_json::Value>(&body)
			.map(|value| value.is_object())
			.unwrap_or(false),
	};

	if is_json {
		let reply: EnquiryReply = serde_json::from_slice(&body).unwrap_or_default();
		return match reply.download_url.filter(|url| !url.trim().is_empty()) {
			Some(url) => EnquiryOutcome::DownloadUrl(url),
			None => EnquiryOutcome::Acknowledged {
				message: reply.message,
			},
		};
	}

	if body.is_empty() {
		return EnquiryOutcome::Acknowledged { message: None };
	}

	EnquiryOutcome::Brochure {
		file_name: format!("{}-brochure.pdf", product_name),
		bytes: body,
	}
}

/// Error text for a failed submit: the JSON `message` inside the payload, else the fixed fallback.
pub fn failure_message(body: &[u8]) -> String {
	message_from_body(body).unwrap_or(ENQUIRY_FAILED.to_string())
}

pub fn deliver(outcome: EnquiryOutcome, sink: &mut dyn BrochureSink) -> Result<Delivery, EnquiryError> {
	Ok(match outcome {
		EnquiryOutcome::DownloadUrl(url) => {
			sink.open_url(&url)?;
			Delivery::Opened(url)
		}
		EnquiryOutcome::Brochure { file_name, bytes } => {
			sink.save(&file_name, bytes)?;
			Delivery::Saved(file_name)
		}
		EnquiryOutcome::Acknowledged { message } => Delivery::Acknowledged(message),
	})
}

/// Validates, submits once, and acts on the response. The form is only borrowed,
/// so on failure the caller still holds it for a corrected resubmit.
pub async fn submit_enquiry(
	api: &ApiClient,
	form: &EnquiryForm,
	product_name: &str,
	sink: &mut dyn BrochureSink,
) -> Result<Delivery, EnquiryError> {
	form.validate()?;

	let response = match Enquiry::submit(api, form).await {
		Ok(response) => response,
		Err(e) => {
			error!("enquiry for product {} not sent: {}", form.product_id, e);
			return Err(EnquiryError::Failed(ENQUIRY_FAILED.to_string()));
		}
	};

	let status = response.status();
	let content_type = response
		.headers()
		.get(header::CONTENT_TYPE)
		.and_then(|value| value.to_str().ok())
		.map(str::to_string);
	let body = match response.bytes().await {
		Ok(body) => body.to_vec(),
		Err(e) => {
			error!("enquiry response for product {} unreadable: {}", form.product_id, e);
			return Err(EnquiryError::Failed(ENQUIRY_FAILED.to_string()));
		}
	};

	if !status.is_success() {
		let message = failure_message(&body);
		warn!("enquiry rejected with {}: {}", status, message);
		return Err(EnquiryError::Failed(message));
	}

	let outcome = classify_response(content_type.as_deref(), product_name, body);
	deliver(outcome, sink)
}
