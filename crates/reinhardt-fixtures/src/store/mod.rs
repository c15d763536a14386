//! Persistence for fixtures.
//!
//! The registry itself never touches storage. Test suites hand the
//! entities it produces to a [`FixtureStore`], usually through a
//! [`FixtureDb`] that adds batching, reload helpers, and create hooks.
//!
//! - [`Record`] - An entity that maps to one table row
//! - [`FixtureStore`] - Create, update, delete, reload, and bulk-clear
//! - [`MemoryStore`] - In-process store for tests
//! - [`FixtureDb`] - Batch helpers over any store
//! - [`CreateHooks`] - Handlers run around every create

mod db;
mod hooks;
mod memory;

pub use db::FixtureDb;
pub use hooks::{CreateHandler, CreateHooks};
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::FixtureResult;

/// An entity persisted as one row of a table.
///
/// A primary key of `0` means the record has not been stored yet.
pub trait Record:
	Serialize + DeserializeOwned + Clone + std::fmt::Debug + Send + Sync + 'static
{
	/// Table the record is stored in.
	const TABLE: &'static str;

	/// Returns the primary key.
	fn pk(&self) -> i64;

	/// Sets the primary key.
	fn set_pk(&mut self, pk: i64);

	/// Runs before the record is created.
	///
	/// Records that reference other fixtures use this to copy their keys
	/// into foreign key fields.
	fn before_create(&mut self) {}

	/// Takes the persisted fields from `stored` after a reload.
	///
	/// The default replaces the whole value. Records holding fields that
	/// are not persisted override this to keep them.
	fn refresh_from(&mut self, stored: Self) {
		*self = stored;
	}
}

/// Storage capability used to persist fixtures.
#[async_trait]
pub trait FixtureStore: Send + Sync {
	/// Inserts `record`, assigning a primary key when it has none.
	async fn create<R: Record>(&self, record: &mut R) -> FixtureResult<()>;

	/// Overwrites the stored row with `record`.
	async fn update<R: Record>(&self, record: &mut R) -> FixtureResult<()>;

	/// Removes the row for `record`.
	async fn delete<R: Record>(&self, record: &R) -> FixtureResult<()>;

	/// Refreshes `record` from its stored row.
	async fn reload<R: Record>(&self, record: &mut R) -> FixtureResult<()>;

	/// Removes every row from `table`, returning how many were removed.
	async fn delete_all_rows(&self, table: &str) -> FixtureResult<u64>;
}
