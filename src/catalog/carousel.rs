use log::warn;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};

/// Shortest autoplay period; `interval` panics on zero.
pub const MIN_AUTOPLAY_PERIOD: Duration = Duration::from_secs(1);

/// Slide position of the hero / product image carousel.
#[derive(Debug, Clone, Default)]
pub struct Carousel {
	len: usize,
	index: Arc<AtomicUsize>,
}

impl Carousel {
	pub fn new(len: usize) -> Self {
		Carousel {
			len,
			index: Arc::new(AtomicUsize::new(0)),
		}
	}

	pub fn len(&self) -> usize {
		self.len
	}

	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	pub fn current(&self) -> usize {
		self.index.load(Ordering::SeqCst)
	}

	pub fn next(&self) -> usize {
		self.step(1)
	}

	pub fn prev(&self) -> usize {
		self.step(self.len.saturating_sub(1))
	}

	pub fn go_to(&self, index: usize) {
		if index < self.len {
			self.index.store(index, Ordering::SeqCst);
		}
	}

	fn step(&self, by: usize) -> usize {
		if self.len == 0 {
			return 0;
		}
		let len = self.len;
		let result = self
			.index
			.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |index| {
				Some((index + by) % len)
			})
			.unwrap_or(0);
		(result + by) % len
	}

	/// Advances every `period` (at least `MIN_AUTOPLAY_PERIOD`) until the returned handle is dropped.
	pub fn autoplay(&self, period: Duration) -> Autoplay {
		let period = if period < MIN_AUTOPLAY_PERIOD {
			warn!("autoplay period {:?} too short, using {:?}", period, MIN_AUTOPLAY_PERIOD);
			MIN_AUTOPLAY_PERIOD
		} else {
			period
		};
		let carousel = self.clone();
		let handle = tokio::spawn(async move {
			if carousel.len < 2 {
				return;
			}
			let mut ticker = interval(period);
			ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
			ticker.tick().await;
			loop {
				ticker.tick().await;
				carousel.next();
			}
		});
		Autoplay { handle }
	}
}

pub struct Autoplay {
	handle: JoinHandle<()>,
}

impl Autoplay {
	pub fn stop(self) {}
}

impl Drop for Autoplay {
	fn drop(&mut self) {
		self.handle.abort();
	}
}
