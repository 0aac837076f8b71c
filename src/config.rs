use log::warn;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_TOKEN_PATH: &str = ".catalog_token";
const DEFAULT_PAGE_SIZE: usize = 12;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
	pub api_url: String,
	pub api_origin: String,
	pub token_path: PathBuf,
	pub download_dir: PathBuf,
	pub page_size: usize,
	pub timeout_secs: u64,
}

impl Config {
	pub fn init() -> Config {
		let api_url = env::var("CATALOG_API_URL").unwrap_or(DEFAULT_API_URL.to_string());
		let api_origin =
			env::var("CATALOG_API_ORIGIN").unwrap_or_else(|_| origin_from_api_url(&api_url));
		let token_path = env::var("CATALOG_TOKEN_PATH").unwrap_or(DEFAULT_TOKEN_PATH.to_string());
		let download_dir = env::var("CATALOG_DOWNLOAD_DIR").unwrap_or(".".to_string());

		Config {
			api_url: api_url.trim_end_matches('/').to_string(),
			api_origin,
			token_path: PathBuf::from(token_path),
			download_dir: PathBuf::from(download_dir),
			page_size: parse_or("CATALOG_PAGE_SIZE", DEFAULT_PAGE_SIZE),
			timeout_secs: parse_or("CATALOG_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS),
		}
	}

	/// Config pointing at an explicit API url, used by embedders and tests.
	pub fn with_api_url(api_url: &str) -> Config {
		Config {
			api_url: api_url.trim_end_matches('/').to_string(),
			api_origin: origin_from_api_url(api_url),
			token_path: PathBuf::from(DEFAULT_TOKEN_PATH),
			download_dir: PathBuf::from("."),
			page_size: DEFAULT_PAGE_SIZE,
			timeout_secs: DEFAULT_TIMEOUT_SECS,
		}
	}
}

/// `http://host:5000/api` -> `http://host:5000`
pub fn origin_from_api_url(api_url: &str) -> String {
	let trimmed = api_url.trim_end_matches('/');
	trimmed.strip_suffix("/api").unwrap_or(trimmed).to_string()
}

fn parse_or<T: FromStr + Copy + std::fmt::Display>(key: &str, default: T) -> T {
	match env::var(key) {
		Ok(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
			warn!("{} has invalid value {:?}, using {}", key, raw, default);
			default
		}),
		Err(_) => default,
	}
}
