//! Token request and cache traffic counters.

// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for token generation and cache traffic.
#[derive(Debug, Default)]
pub struct TokenMetrics {
	access_generations: AtomicU64,
	refresh_generations: AtomicU64,
	cache_hits: AtomicU64,
	cache_misses: AtomicU64,
	cache_faults: AtomicU64,
}
impl TokenMetrics {
	/// Returns the number of `refresh_token` grant requests sent to the token endpoint.
	pub fn access_generations(&self) -> u64 {
		self.access_generations.load(Ordering::Relaxed)
	}

	/// Returns the number of `authorization_code` grant requests sent to the token endpoint.
	pub fn refresh_generations(&self) -> u64 {
		self.refresh_generations.load(Ordering::Relaxed)
	}

	/// Returns the number of cache lookups that produced a token.
	pub fn cache_hits(&self) -> u64 {
		self.cache_hits.load(Ordering::Relaxed)
	}

	/// Returns the number of cache lookups that found nothing (faults included).
	pub fn cache_misses(&self) -> u64 {
		self.cache_misses.load(Ordering::Relaxed)
	}

	/// Returns the number of cache operations that failed and were ignored.
	pub fn cache_faults(&self) -> u64 {
		self.cache_faults.load(Ordering::Relaxed)
	}

	pub(crate) fn record_access_generation(&self) {
		self.access_generations.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_refresh_generation(&self) {
		self.refresh_generations.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_lookup(&self, hit: bool) {
		if hit {
			self.cache_hits.fetch_add(1, Ordering::Relaxed);
		} else {
			self.cache_misses.fetch_add(1, Ordering::Relaxed);
		}
	}

	pub(crate) fn record_fault(&self) {
		self.cache_faults.fetch_add(1, Ordering::Relaxed);
	}
}
