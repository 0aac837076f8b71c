use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

/// Latest request wins: a response is applied only if no newer request was started since.
#[derive(Debug, Clone, Default)]
pub struct RequestGuard {
	latest: Arc<AtomicU64>,
}

impl RequestGuard {
	pub fn begin(&self) -> RequestTicket {
		RequestTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
	}

	pub fn is_current(&self, ticket: RequestTicket) -> bool {
		self.latest.load(Ordering::SeqCst) == ticket.0
	}

	/// Invalidates every outstanding ticket, e.g. when the user clears the filter.
	pub fn invalidate(&self) {
		self.latest.fetch_add(1, Ordering::SeqCst);
	}
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState {
	#[default]
	Idle,
	Loading,
	Ready,
	Failed(String),
}

impl LoadState {
	pub fn is_loading(&self) -> bool {
		matches!(self, LoadState::Loading)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn only_latest_ticket_is_current() {
		let guard = RequestGuard::default();
		let first = guard.begin();
		let second = guard.begin();
		assert!(!guard.is_current(first));
		assert!(guard.is_current(second));

		guard.invalidate();
		assert!(!guard.is_current(second));
	}

	#[test]
	fn clones_share_the_counter() {
		let guard = RequestGuard::default();
		let handle = guard.clone();
		let ticket = guard.begin();
		handle.begin();
		assert!(!guard.is_current(ticket));
	}
}
