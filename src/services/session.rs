use chrono::Utc;
use log::{info, warn};
use std::fs;
use std::io::{self, ErrorKind};
use std::path::PathBuf;
use std::sync::{Mutex, RwLock};

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::{Credentials, User};
use crate::utils::token_expired;

/// Where the bearer token survives between runs.
pub trait TokenStore: Send + Sync {
	fn load(&self) -> Option<String>;
	fn save(&self, token: &str) -> io::Result<()>;
	fn clear(&self) -> io::Result<()>;
}

#[derive(Debug)]
pub struct FileTokenStore {
	path: PathBuf,
}

impl FileTokenStore {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		FileTokenStore { path: path.into() }
	}
}

impl TokenStore for FileTokenStore {
	fn load(&self) -> Option<String> {
		let token = fs::read_to_string(&self.path).ok()?;
		let token = token.trim();
		if token.is_empty() {
			None
		} else {
			Some(token.to_string())
		}
	}

	fn save(&self, token: &str) -> io::Result<()> {
		fs::write(&self.path, token)
	}

	fn clear(&self) -> io::Result<()> {
		match fs::remove_file(&self.path) {
			Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
			other => other,
		}
	}
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
	token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
	pub fn with_token(token: &str) -> Self {
		MemoryTokenStore {
			token: Mutex::new(Some(token.to_string())),
		}
	}
}

impl TokenStore for MemoryTokenStore {
	fn load(&self) -> Option<String> {
		self.token.lock().unwrap_or_else(|e| e.into_inner()).clone()
	}

	fn save(&self, token: &str) -> io::Result<()> {
		*self.token.lock().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
		Ok(())
	}

	fn clear(&self) -> io::Result<()> {
		*self.token.lock().unwrap_or_else(|e| e.into_inner()) = None;
		Ok(())
	}
}

/// Token and identity of the current admin, injected into the `ApiClient`.
pub struct Session {
	store: Box<dyn TokenStore>,
	token: RwLock<Option<String>>,
	identity: RwLock<Option<User>>,
}

impl Session {
	pub fn new(store: Box<dyn TokenStore>) -> Self {
		let token = store.load();
		Session {
			store,
			token: RwLock::new(token),
			identity: RwLock::new(None),
		}
	}

	pub fn in_memory() -> Self {
		Session::new(Box::new(MemoryTokenStore::default()))
	}

	pub fn token(&self) -> Option<String> {
		self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
	}

	pub fn identity(&self) -> Option<User> {
		self.identity.read().unwrap_or_else(|e| e.into_inner()).clone()
	}

	pub fn stored_token(&self) -> Option<String> {
		self.store.load()
	}

	fn adopt(&self, token: String, user: User) -> io::Result<()> {
		self.store.save(&token)?;
		*self.token.write().unwrap_or_else(|e| e.into_inner()) = Some(token);
		self.set_identity(user);
		Ok(())
	}

	fn set_identity(&self, user: User) {
		*self.identity.write().unwrap_or_else(|e| e.into_inner()) = Some(user);
	}

	/// Drops token and identity; used by logout and on any auth failure.
	pub fn clear(&self) {
		if let Err(e) = self.store.clear() {
			warn!("could not remove stored token: {}", e);
		}
		*self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
		*self.identity.write().unwrap_or_else(|e| e.into_inner()) = None;
	}

	pub fn is_admin(&self) -> bool {
		self.identity().map(|user| user.is_admin()).unwrap_or(false)
	}

	/// Admin-only screens: no identity and a non-admin identity both mean "go to login".
	pub fn require_admin(&self) -> Result<User, ApiError> {
		match self.identity() {
			Some(user) if user.is_admin() => Ok(user),
			_ => Err(ApiError::Unauthorized),
		}
	}
}

impl std::fmt::Debug for Session {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Session")
			.field("authenticated", &self.token().is_some())
			.field("identity", &self.identity())
			.finish()
	}
}

pub async fn login(api: &ApiClient, email: &str, password: &str) -> Result<User, ApiError> {
	let credentials = Credentials {
		email: email.trim().to_string(),
		password: password.to_string(),
	};
	if credentials.email.is_empty() || credentials.password.is_empty() {
		return Err(ApiError::Validation(
			"Email and password are required".to_string(),
		));
	}

	let (token, user) = User::login(api, &credentials).await?;
	if !user.is_admin() {
		warn!("login for {} rejected: role {:?}", user.email, user.role);
		api.session().clear();
		return Err(ApiError::Unauthorized);
	}

	api.session().adopt(token, user.clone())?;
	info!("logged in as {}", user.email);

	Ok(user)
}

/// Re-establishes the identity behind a stored token. Never fails: any problem
/// leaves the session anonymous with the stored token removed.
pub async fn restore(api: &ApiClient) -> Option<User> {
	let token = api.session().token()?;

	if token_expired(&token, Utc::now()) {
		info!("stored token expired, clearing session");
		api.session().clear();
		return None;
	}

	match User::me(api).await {
		Ok(user) if user.is_admin() => {
			api.session().set_identity(user.clone());
			Some(user)
		}
		Ok(user) => {
			warn!("stored token belongs to non-admin {}", user.email);
			api.session().clear();
			None
		}
		Err(e) => {
			info!("stored token rejected ({}), clearing session", e);
			api.session().clear();
			None
		}
	}
}

pub fn logout(api: &ApiClient) {
	api.session().clear();
	info!("logged out");
}

#[cfg(test)]
mod tests {
	use super::*;

	fn admin() -> User {
		User {
			id: "u1".to_string(),
			name: "Admin".to_string(),
			email: "admin@lab.org".to_string(),
			role: "admin".to_string(),
		}
	}

	#[test]
	fn new_session_picks_up_stored_token() {
		let session = Session::new(Box::new(MemoryTokenStore::with_token("stored")));
		assert_eq!(session.token().as_deref(), Some("stored"));
		assert!(session.identity().is_none());
	}

	#[test]
	fn admin_gate_is_binary() {
		let session = Session::in_memory();
		assert!(matches!(session.require_admin(), Err(ApiError::Unauthorized)));

		session.set_identity(User {
			role: "editor".to_string(),
			..admin()
		});
		assert!(matches!(session.require_admin(), Err(ApiError::Unauthorized)));

		session.set_identity(admin());
		assert_eq!(session.require_admin().unwrap().email, "admin@lab.org");
	}

	#[test]
	fn clear_drops_store_and_identity() {
		let session = Session::in_memory();
		session.adopt("t-1".to_string(), admin()).unwrap();
		assert_eq!(session.stored_token().as_deref(), Some("t-1"));
		assert!(session.is_admin());

		session.clear();
		assert!(session.token().is_none());
		assert!(session.stored_token().is_none());
		assert!(!session.is_admin());
	}

	#[test]
	fn file_store_round_trip() {
		let path = std::env::temp_dir().join(format!("lab-catalog-token-{}", std::process::id()));
		let store = FileTokenStore::new(&path);
		assert!(store.load().is_none());

		store.save("abc.def.ghi").unwrap();
		assert_eq!(store.load().as_deref(), Some("abc.def.ghi"));

		store.clear().unwrap();
		store.clear().unwrap();
		assert!(store.load().is_none());
	}
}
