//! Simple file-backed [`TokenCache`] for CLIs and long-lived single-host deployments.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	cache::{CacheEntry, CacheError, CacheFuture, TokenCache, validate_key},
};

/// Persists cache entries to a JSON file after each mutation.
#[derive(Clone, Debug)]
pub struct FileCache {
	path: PathBuf,
	inner: Arc<RwLock<BTreeMap<String, CacheEntry>>>,
}
impl FileCache {
	/// Opens (or creates) a cache at the provided path, eagerly loading existing entries.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, CacheError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = Self::load_snapshot(&path)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	/// Location of the backing file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn load_snapshot(path: &Path) -> Result<BTreeMap<String, CacheEntry>, CacheError> {
		if !path.exists() {
			return Ok(BTreeMap::new());
		}

		let bytes = fs::read(path).map_err(|e| CacheError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		if bytes.is_empty() {
			return Ok(BTreeMap::new());
		}

		serde_json::from_slice(&bytes).map_err(|e| CacheError::Serialization {
			message: format!("Failed to parse {}: {e}", path.display()),
		})
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), CacheError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| CacheError::Backend {
				message: format!("Failed to create cache directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	fn persist_locked(&self, contents: &BTreeMap<String, CacheEntry>) -> Result<(), CacheError> {
		Self::ensure_parent_exists(&self.path)?;

		let now = OffsetDateTime::now_utc();
		let live: BTreeMap<_, _> =
			contents.iter().filter(|(_, entry)| entry.is_live_at(now)).collect();
		let serialized = serde_json::to_vec_pretty(&live).map_err(|e| CacheError::Serialization {
			message: format!("Failed to serialize cache snapshot: {e}"),
		})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| CacheError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| CacheError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| CacheError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| CacheError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl TokenCache for FileCache {
	fn get<'a>(&'a self, key: &'a str) -> CacheFuture<'a, Option<String>> {
		Box::pin(async move {
			validate_key(key)?;

			let now = OffsetDateTime::now_utc();

			Ok(self
				.inner
				.read()
				.get(key)
				.filter(|entry| entry.is_live_at(now))
				.map(|entry| entry.value.clone()))
		})
	}

	fn set<'a>(&'a self, key: &'a str, value: &'a str, ttl: Duration) -> CacheFuture<'a, ()> {
		Box::pin(async move {
			validate_key(key)?;

			let mut guard = self.inner.write();

			guard.insert(key.to_owned(), CacheEntry::new(value, OffsetDateTime::now_utc(), ttl));
			self.persist_locked(&guard)
		})
	}

	fn remove<'a>(&'a self, key: &'a str) -> CacheFuture<'a, ()> {
		Box::pin(async move {
			validate_key(key)?;

			let mut guard = self.inner.write();

			if guard.remove(key).is_some() {
				self.persist_locked(&guard)?;
			}

			Ok(())
		})
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::{env, process};
	// crates.io
	use tokio::runtime::Runtime;
	// self
	use super::*;

	fn temp_path() -> PathBuf {
		let unique = format!(
			"zoho_sign_file_cache_{}_{}.json",
			process::id(),
			OffsetDateTime::now_utc().unix_timestamp_nanos(),
		);

		env::temp_dir().join(unique)
	}

	#[test]
	fn set_and_reload_round_trip() {
		let path = temp_path();
		let cache = FileCache::open(&path).expect("Failed to open file cache.");
		let rt = Runtime::new().expect("Failed to build Tokio runtime for file cache test.");

		rt.block_on(cache.set("zoho_sign_refresh_token", "1000.refresh", Duration::minutes(59)))
			.expect("Failed to write refresh token to file cache.");
		drop(cache);

		let reopened = FileCache::open(&path).expect("Failed to reopen file cache.");
		let fetched = rt
			.block_on(reopened.get("zoho_sign_refresh_token"))
			.expect("Failed to read refresh token from file cache.");

		assert_eq!(fetched.as_deref(), Some("1000.refresh"));

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary file cache {}: {e}", path.display())
		});
	}

	#[test]
	fn expired_entries_are_not_returned_or_persisted() {
		let path = temp_path();
		let cache = FileCache::open(&path).expect("Failed to open file cache.");
		let rt = Runtime::new().expect("Failed to build Tokio runtime for file cache test.");

		rt.block_on(cache.set("zoho_sign_access_token", "stale", Duration::seconds(-1)))
			.expect("Writing an already-expired entry should still succeed.");

		let fetched =
			rt.block_on(cache.get("zoho_sign_access_token")).expect("Read should succeed.");

		assert_eq!(fetched, None);

		let snapshot = fs::read_to_string(&path).expect("Snapshot should exist after a write.");

		assert!(!snapshot.contains("stale"));

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary file cache {}: {e}", path.display())
		});
	}

	#[test]
	fn corrupt_snapshot_is_a_serialization_error() {
		let path = temp_path();

		fs::write(&path, b"not json").expect("Failed to write corrupt snapshot.");

		let err = FileCache::open(&path).expect_err("Corrupt snapshots should be rejected.");

		assert!(matches!(err, CacheError::Serialization { .. }));

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary file cache {}: {e}", path.display())
		});
	}
}
