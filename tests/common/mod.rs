#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

#[derive(Debug, Clone)]
pub struct Canned {
	pub status: u16,
	pub content_type: &'static str,
	pub body: Vec<u8>,
}

impl Canned {
	pub fn json(status: u16, body: serde_json::Value) -> Self {
		Canned {
			status,
			content_type: "application/json; charset=utf-8",
			body: body.to_string().into_bytes(),
		}
	}

	pub fn bytes(status: u16, content_type: &'static str, body: &[u8]) -> Self {
		Canned {
			status,
			content_type,
			body: body.to_vec(),
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
	/// `METHOD /path?query`, relative to the `/api` base.
	pub line: String,
	pub authorization: Option<String>,
	pub body: Vec<u8>,
}

/// In-process HTTP responder answering `METHOD /path` routes with canned responses.
pub struct CannedServer {
	pub api_url: String,
	requests: Arc<Mutex<Vec<Recorded>>>,
}

impl CannedServer {
	pub async fn start(routes: Vec<(&'static str, Canned)>) -> Self {
		let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
		let addr = listener.local_addr().unwrap();
		let requests = Arc::new(Mutex::new(Vec::new()));
		let routes = Arc::new(routes);

		let recorded = requests.clone();
		tokio::spawn(async move {
			loop {
				let Ok((stream, _)) = listener.accept().await else {
					return;
				};
				let routes = routes.clone();
				let recorded = recorded.clone();
				tokio::spawn(async move {
					handle(stream, &routes, &recorded).await;
				});
			}
		});

		CannedServer {
			api_url: format!("http://{}/api", addr),
			requests,
		}
	}

	pub fn requests(&self) -> Vec<Recorded> {
		self.requests.lock().unwrap().clone()
	}
}

async fn handle(mut stream: TcpStream, routes: &[(&'static str, Canned)], recorded: &Mutex<Vec<Recorded>>) {
	let mut buf = Vec::new();
	let mut chunk = [0u8; 4096];

	let head_end = loop {
		if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
			break pos + 4;
		}
		match stream.read(&mut chunk).await {
			Ok(0) | Err(_) => return,
			Ok(n) => buf.extend_from_slice(&chunk[..n]),
		}
	};

	let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
	let mut lines = head.split("\r\n");
	let request_line = lines.next().unwrap_or_default();
	let mut parts = request_line.split_whitespace();
	let method = parts.next().unwrap_or_default().to_string();
	let target = parts.next().unwrap_or_default().to_string();

	let mut content_length = 0usize;
	let mut authorization = None;
	for line in lines {
		if let Some((name, value)) = line.split_once(':') {
			match name.trim().to_ascii_lowercase().as_str() {
				"content-length" => content_length = value.trim().parse().unwrap_or(0),
				"authorization" => authorization = Some(value.trim().to_string()),
				_ => {}
			}
		}
	}

	while buf.len() < head_end + content_length {
		match stream.read(&mut chunk).await {
			Ok(0) | Err(_) => break,
			Ok(n) => buf.extend_from_slice(&chunk[..n]),
		}
	}
	let body = buf[head_end..].to_vec();

	let line = format!("{} {}", method, target.strip_prefix("/api").unwrap_or(&target));
	recorded.lock().unwrap().push(Recorded {
		line: line.clone(),
		authorization,
		body,
	});

	let canned = routes
		.iter()
		.find(|(route, _)| *route == line)
		.map(|(_, canned)| canned.clone())
		.unwrap_or(Canned::json(404, serde_json::json!({ "message": "Route not found" })));

	let head = format!(
		"HTTP/1.1 {} Canned\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
		canned.status,
		canned.content_type,
		canned.body.len()
	);
	let _ = stream.write_all(head.as_bytes()).await;
	let _ = stream.write_all(&canned.body).await;
	let _ = stream.shutdown().await;
}
