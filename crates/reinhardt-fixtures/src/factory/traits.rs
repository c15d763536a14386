//! Core factory traits.

use std::sync::Arc;

use super::DispatcherBuilder;
use crate::cache::FixtureRef;
use crate::error::FixtureResult;
use crate::instance::Opts;

/// Source of freshly built entities, addressed by key.
///
/// Returns `None` for keys it does not know; an unknown key is never an
/// error.
pub trait Factory<T> {
	/// Builds a new instance for `key` with `opts` applied.
	fn build(&self, key: &str, opts: Opts<T>) -> Option<T>;
}

/// Source of shared, memoized entities, addressed by key.
pub trait Getter<T> {
	/// Returns the instance cached under `key`, building it on first use.
	///
	/// `opts` only take effect when the call builds the instance.
	fn get(&self, key: &str, opts: Opts<T>) -> Option<FixtureRef<T>>;
}

impl<T, F: Factory<T> + ?Sized> Factory<T> for &F {
	fn build(&self, key: &str, opts: Opts<T>) -> Option<T> {
		(**self).build(key, opts)
	}
}

impl<T, F: Factory<T> + ?Sized> Factory<T> for Arc<F> {
	fn build(&self, key: &str, opts: Opts<T>) -> Option<T> {
		(**self).build(key, opts)
	}
}

/// A type whose constructors populate a fixture registry.
///
/// Usually implemented by the `#[fixtures]` attribute, which registers
/// every `new_<key>(&self, opts: Opts<Entity>) -> Entity` method of the
/// annotated impl block.
///
/// # Example
///
/// ```
/// use reinhardt_fixtures::prelude::*;
///
/// #[derive(Debug, Default)]
/// struct User {
///     name: String,
/// }
///
/// struct UserFactory;
///
/// impl UserFactory {
///     fn new_rob_pike(&self, opts: Opts<User>) -> User {
///         build_with_defaults(opts, vec![opt(|u: &mut User| u.name = "Rob Pike".into())])
///     }
/// }
///
/// impl FixtureHost for UserFactory {
///     type Entity = User;
///
///     fn register(registry: &mut DispatcherBuilder<Self>) -> FixtureResult<()> {
///         registry.constructor("new_rob_pike", Self::new_rob_pike)?;
///         Ok(())
///     }
/// }
///
/// let users = Fixtures::new(UserFactory).unwrap();
/// assert_eq!(users.get("rob_pike", vec![]).unwrap().read().name, "Rob Pike");
/// ```
pub trait FixtureHost: Sized + Send + Sync + 'static {
	/// The entity type built by this host's constructors.
	type Entity: Default + Send + Sync + 'static;

	/// Registers this host's constructors.
	fn register(registry: &mut DispatcherBuilder<Self>) -> FixtureResult<()>;
}
