//! In-memory store.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{FixtureStore, Record};
use crate::error::{FixtureError, FixtureResult};

#[derive(Debug, Default)]
struct Table {
	rows: BTreeMap<i64, serde_json::Value>,
	last_pk: i64,
}

/// [`FixtureStore`] that keeps rows as JSON values in process memory.
///
/// Each table hands out increasing primary keys starting at 1.
///
/// # Example
///
/// ```
/// use reinhardt_fixtures::store::{FixtureStore, MemoryStore, Record};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Clone, Default, Serialize, Deserialize)]
/// struct Tag {
///     id: i64,
///     name: String,
/// }
///
/// impl Record for Tag {
///     const TABLE: &'static str = "tags";
///     fn pk(&self) -> i64 { self.id }
///     fn set_pk(&mut self, pk: i64) { self.id = pk; }
/// }
///
/// # tokio_test();
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn tokio_test() {
/// let store = MemoryStore::new();
/// let mut tag = Tag { id: 0, name: "rust".into() };
/// store.create(&mut tag).await.unwrap();
/// assert_eq!(tag.id, 1);
/// assert_eq!(store.row_count("tags"), 1);
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
	tables: Mutex<HashMap<String, Table>>,
}

impl MemoryStore {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the number of rows in `table`.
	pub fn row_count(&self, table: &str) -> usize {
		self.tables
			.lock()
			.get(table)
			.map_or(0, |table| table.rows.len())
	}

	/// Returns every stored `R`, ordered by primary key.
	///
	/// # Errors
	///
	/// Returns an error if a stored row no longer deserializes as `R`.
	pub fn rows<R: Record>(&self) -> FixtureResult<Vec<R>> {
		let tables = self.tables.lock();
		let Some(table) = tables.get(R::TABLE) else {
			return Ok(Vec::new());
		};
		table
			.rows
			.values()
			.map(|row| serde_json::from_value(row.clone()).map_err(FixtureError::from))
			.collect()
	}

	fn stored_pk<R: Record>(record: &R) -> FixtureResult<i64> {
		match record.pk() {
			0 => Err(FixtureError::MissingPrimaryKey {
				table: R::TABLE.to_string(),
			}),
			pk => Ok(pk),
		}
	}

	fn not_found<R: Record>(pk: i64) -> FixtureError {
		FixtureError::RecordNotFound {
			table: R::TABLE.to_string(),
			pk,
		}
	}
}

#[async_trait]
impl FixtureStore for MemoryStore {
	async fn create<R: Record>(&self, record: &mut R) -> FixtureResult<()> {
		let mut tables = self.tables.lock();
		let table = tables.entry(R::TABLE.to_string()).or_default();

		let pk = match record.pk() {
			0 => table.last_pk + 1,
			pk => pk,
		};
		if table.rows.contains_key(&pk) {
			return Err(FixtureError::DuplicatePrimaryKey {
				table: R::TABLE.to_string(),
				pk,
			});
		}

		record.set_pk(pk);
		let row = serde_json::to_value(&*record)?;
		table.rows.insert(pk, row);
		table.last_pk = table.last_pk.max(pk);
		tracing::debug!(table = R::TABLE, pk, "Created fixture row");
		Ok(())
	}

	async fn update<R: Record>(&self, record: &mut R) -> FixtureResult<()> {
		let pk = Self::stored_pk(record)?;
		let row = serde_json::to_value(&*record)?;

		let mut tables = self.tables.lock();
		let stored = tables
			.get_mut(R::TABLE)
			.and_then(|table| table.rows.get_mut(&pk))
			.ok_or_else(|| Self::not_found::<R>(pk))?;
		*stored = row;
		tracing::debug!(table = R::TABLE, pk, "Updated fixture row");
		Ok(())
	}

	async fn delete<R: Record>(&self, record: &R) -> FixtureResult<()> {
		let pk = Self::stored_pk(record)?;

		let mut tables = self.tables.lock();
		tables
			.get_mut(R::TABLE)
			.and_then(|table| table.rows.remove(&pk))
			.ok_or_else(|| Self::not_found::<R>(pk))?;
		tracing::debug!(table = R::TABLE, pk, "Deleted fixture row");
		Ok(())
	}

	async fn reload<R: Record>(&self, record: &mut R) -> FixtureResult<()> {
		let pk = Self::stored_pk(record)?;

		let row = self
			.tables
			.lock()
			.get(R::TABLE)
			.and_then(|table| table.rows.get(&pk).cloned())
			.ok_or_else(|| Self::not_found::<R>(pk))?;
		let stored: R = serde_json::from_value(row)?;
		record.refresh_from(stored);
		Ok(())
	}

	async fn delete_all_rows(&self, table: &str) -> FixtureResult<u64> {
		let removed = self
			.tables
			.lock()
			.get_mut(table)
			.map_or(0, |table| std::mem::take(&mut table.rows).len());
		tracing::debug!(table, removed, "Deleted all fixture rows");
		Ok(removed as u64)
	}
}
