use serde::{Deserialize, Serialize};

pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct User {
	#[serde(rename = "_id", alias = "id")]
	pub id: String,
	pub name: String,
	pub email: String,
	pub role: String,
}

impl User {
	pub fn is_admin(&self) -> bool {
		self.role == ADMIN_ROLE
	}
}

#[derive(Debug, Serialize, Clone)]
pub struct Credentials {
	pub email: String,
	pub password: String,
}

/// `POST /auth/login` returns the user either nested under `user` or inline next to the token.
#[derive(Debug, Deserialize, Clone)]
pub struct AuthResponse {
	pub token: String,
	#[serde(default)]
	pub user: Option<User>,
	#[serde(flatten)]
	pub inline: User,
}

impl AuthResponse {
	pub fn into_parts(self) -> (String, User) {
		let user = self.user.unwrap_or(self.inline);
		(self.token, user)
	}
}

/// `GET /auth/me` payload variants.
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum MeResponse {
	Wrapped { user: User },
	Data { data: User },
	Plain(User),
}

impl MeResponse {
	pub fn into_user(self) -> User {
		match self {
			MeResponse::Wrapped { user } => user,
			MeResponse::Data { data } => data,
			MeResponse::Plain(user) => user,
		}
	}
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct MessageResponse {
	pub message: Option<String>,
	pub success: Option<bool>,
}
