//! Convenience re-exports for common usage.
//!
//! # Example
//!
//! ```ignore
//! use reinhardt_fixtures::prelude::*;
//!
//! // Now you have access to:
//! // - Option helpers and builders
//! // - The registry, its cache, and its traits
//! // - Store types
//! // - Error types
//! ```

// Error types
pub use crate::error::{FixtureError, FixtureResult};

// Configuration
pub use crate::config::{DuplicateKeyPolicy, FixturesConfig};

// Instance construction
pub use crate::instance::{Opt, Opts, build_instance, build_with_defaults, opt};

// Registry types
pub use crate::cache::{FixtureCache, FixtureRef};
pub use crate::factory::{DispatcherBuilder, Factory, FactoryDispatcher, FixtureHost, Getter};
pub use crate::registry::Fixtures;

// Store types
pub use crate::store::{CreateHooks, FixtureDb, FixtureStore, MemoryStore, Record};

// Re-export the fixtures attribute when available
#[cfg(feature = "macros")]
pub use reinhardt_fixtures_macros::fixtures;
