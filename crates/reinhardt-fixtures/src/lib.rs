//! Named, memoized test fixtures for the Reinhardt framework.
//!
//! A fixture host is a type whose `new_<key>` methods each build one
//! canonical entity. This crate turns such a host into a registry that
//! builds fresh instances on demand or hands out one shared instance per
//! key for the lifetime of the registry.
//!
//! # Quick Start
//!
//! ```
//! use reinhardt_fixtures::prelude::*;
//!
//! #[derive(Debug, Default)]
//! pub struct User {
//!     pub name: String,
//!     pub email: String,
//! }
//!
//! pub fn name(v: &str) -> Opt<User> {
//!     let v = v.to_string();
//!     opt(move |u: &mut User| u.name = v)
//! }
//!
//! pub fn email(v: &str) -> Opt<User> {
//!     let v = v.to_string();
//!     opt(move |u: &mut User| u.email = v)
//! }
//!
//! pub struct UserFactory;
//!
//! #[fixtures(entity = User, getters = UserFixtures)]
//! impl UserFactory {
//!     pub fn new_rob_pike(&self, opts: Opts<User>) -> User {
//!         build_with_defaults(opts, vec![name("Rob Pike"), email("rob@golang.org")])
//!     }
//! }
//!
//! let users = Fixtures::new(UserFactory).unwrap();
//!
//! // Fresh instance, options applied after the defaults
//! let rob = users.build("rob_pike", vec![email("r@example.com")]).unwrap();
//! assert_eq!(rob.email, "r@example.com");
//!
//! // Shared instance, built once
//! let shared = users.rob_pike(vec![]).unwrap();
//! assert!(shared.ptr_eq(&users.get("rob_pike", vec![]).unwrap()));
//! ```
//!
//! # Architecture
//!
//! - [`build_instance`] / [`build_with_defaults`] - Apply options to a zero value
//! - [`FactoryDispatcher`](factory::FactoryDispatcher) - Key to constructor table bound to a host
//! - [`FixtureCache`](cache::FixtureCache) - At-most-once construction per key
//! - [`Fixtures`] - Facade combining the two
//! - [`store`] - Persisting fixtures through a [`FixtureStore`](store::FixtureStore)
//!
//! # Features
//!
//! - `macros` - The `#[fixtures]` attribute (enabled by default)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod cache;
pub mod config;
pub mod error;
pub mod factory;
pub mod instance;
pub mod prelude;
pub mod registry;
pub mod store;

// Re-export commonly used types at crate root
pub use cache::{FixtureCache, FixtureRef};
pub use config::{DuplicateKeyPolicy, FixturesConfig};
pub use error::{FixtureError, FixtureResult};
pub use factory::{DispatcherBuilder, Factory, FactoryDispatcher, FixtureHost, Getter};
pub use instance::{Opt, Opts, build_instance, build_with_defaults, opt};
pub use registry::Fixtures;

// Re-export the attribute macro when available
#[cfg(feature = "macros")]
pub use reinhardt_fixtures_macros::fixtures;
