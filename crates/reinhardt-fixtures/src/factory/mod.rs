//! Constructor registration and dispatch.
//!
//! - [`FixtureHost`] - A type that registers its constructors
//! - [`DispatcherBuilder`] - Collects constructors and derives their keys
//! - [`FactoryDispatcher`] - Read-only key to constructor table
//! - [`Factory`] / [`Getter`] - Fresh and memoized access by key

mod dispatcher;
mod traits;

pub use dispatcher::{CONSTRUCTOR_PREFIX, Constructor, DispatcherBuilder, FactoryDispatcher, derive_key};
pub use traits::{Factory, FixtureHost, Getter};
