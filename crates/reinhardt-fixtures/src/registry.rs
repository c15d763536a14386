//! The fixtures facade.

use std::fmt;
use std::sync::Arc;

use crate::cache::{FixtureCache, FixtureRef};
use crate::config::FixturesConfig;
use crate::error::FixtureResult;
use crate::factory::{Factory, FactoryDispatcher, FixtureHost, Getter};
use crate::instance::Opts;

/// Named fixtures for one host: fresh instances through [`build`](Self::build)
/// and shared, memoized instances through [`get`](Self::get).
///
/// # Example
///
/// ```
/// use reinhardt_fixtures::prelude::*;
///
/// #[derive(Debug, Default)]
/// pub struct User {
///     pub name: String,
/// }
///
/// pub struct UserFactory;
///
/// #[fixtures(entity = User)]
/// impl UserFactory {
///     pub fn new_rob_pike(&self, opts: Opts<User>) -> User {
///         build_with_defaults(opts, vec![opt(|u: &mut User| u.name = "Rob Pike".into())])
///     }
/// }
///
/// let users = Fixtures::new(UserFactory).unwrap();
///
/// let first = users.get("rob_pike", vec![]).unwrap();
/// let again = users.get("rob_pike", vec![opt(|u: &mut User| u.name = "ignored".into())]).unwrap();
/// assert!(first.ptr_eq(&again));
/// assert_eq!(again.read().name, "Rob Pike");
///
/// assert!(users.get("ken_thompson", vec![]).is_none());
/// ```
pub struct Fixtures<H: FixtureHost> {
	dispatcher: Arc<FactoryDispatcher<H>>,
	cache: FixtureCache<H::Entity, Arc<FactoryDispatcher<H>>>,
}

impl<H: FixtureHost> Fixtures<H> {
	/// Creates fixtures for `host` with default options.
	///
	/// # Errors
	///
	/// Returns an error if the host registers two constructors under the
	/// same key.
	pub fn new(host: H) -> FixtureResult<Self> {
		Self::with_config(host, FixturesConfig::default())
	}

	/// Creates fixtures for `host`.
	///
	/// Registration completes before the cache is attached.
	///
	/// # Errors
	///
	/// Propagates any error returned by [`FixtureHost::register`].
	pub fn with_config(host: H, config: FixturesConfig) -> FixtureResult<Self> {
		let dispatcher = Arc::new(FactoryDispatcher::with_config(host, config)?);
		let cache = FixtureCache::new(Arc::clone(&dispatcher));
		tracing::debug!(
			registry = dispatcher.label(),
			constructors = dispatcher.len(),
			skipped = dispatcher.skipped().len(),
			"Fixture registry ready"
		);
		Ok(Self { dispatcher, cache })
	}

	/// Builds a fresh, uncached instance for `key`.
	pub fn build(&self, key: &str, opts: Opts<H::Entity>) -> Option<H::Entity> {
		self.dispatcher.build(key, opts)
	}

	/// Returns the shared instance for `key`, building it on first use.
	///
	/// `opts` are ignored once the instance exists.
	pub fn get(&self, key: &str, opts: Opts<H::Entity>) -> Option<FixtureRef<H::Entity>> {
		self.cache.get(key, opts)
	}

	/// Returns the host the constructors are bound to.
	pub fn host(&self) -> &H {
		self.dispatcher.host()
	}

	/// Returns the dispatch table.
	pub fn dispatcher(&self) -> &FactoryDispatcher<H> {
		&self.dispatcher
	}

	/// Returns the instance cache.
	pub fn cache(&self) -> &FixtureCache<H::Entity, Arc<FactoryDispatcher<H>>> {
		&self.cache
	}

	/// Returns all registered keys, sorted.
	pub fn keys(&self) -> Vec<&str> {
		self.dispatcher.keys()
	}

	/// Checks if a constructor is registered under `key`.
	pub fn contains(&self, key: &str) -> bool {
		self.dispatcher.contains(key)
	}
}

impl<H: FixtureHost> Factory<H::Entity> for Fixtures<H> {
	fn build(&self, key: &str, opts: Opts<H::Entity>) -> Option<H::Entity> {
		Fixtures::build(self, key, opts)
	}
}

impl<H: FixtureHost> Getter<H::Entity> for Fixtures<H> {
	fn get(&self, key: &str, opts: Opts<H::Entity>) -> Option<FixtureRef<H::Entity>> {
		Fixtures::get(self, key, opts)
	}
}

impl<H: FixtureHost> fmt::Debug for Fixtures<H> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Fixtures")
			.field("dispatcher", &self.dispatcher)
			.field("cache", &self.cache)
			.finish()
	}
}
