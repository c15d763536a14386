//! Fixture persistence helpers.

use super::{CreateHooks, FixtureStore, Record};
use crate::cache::FixtureRef;
use crate::error::{FixtureError, FixtureResult};

/// Batch persistence helpers over a [`FixtureStore`].
///
/// Every failure is wrapped in [`FixtureError::Operation`] naming the
/// entity involved. Batch methods stop at the first failure.
///
/// The `*_ref` variants accept [`FixtureRef`] handles from a fixture
/// registry. They work on a copy and write it back once the store call
/// returns, so no lock is held across an `.await`.
///
/// # Example
///
/// ```ignore
/// let db = FixtureDb::new(MemoryStore::new());
/// db.delete_from_table::<Article>().await?;
///
/// let articles = Fixtures::new(ArticleFactory::new()?)?;
/// db.create_refs(&[
///     articles.five_rules(vec![]).unwrap(),
///     articles.go_proverbs(vec![]).unwrap(),
/// ])
/// .await?;
/// ```
#[derive(Debug)]
pub struct FixtureDb<S> {
	store: S,
	hooks: CreateHooks,
}

impl<S: FixtureStore> FixtureDb<S> {
	/// Wraps `store`.
	pub fn new(store: S) -> Self {
		Self {
			store,
			hooks: CreateHooks::new(),
		}
	}

	/// Returns the wrapped store.
	pub fn store(&self) -> &S {
		&self.store
	}

	/// Adds a handler that runs before each create.
	pub fn on_before_create<F>(&mut self, handler: F) -> &mut Self
	where
		F: Fn(&str) + Send + Sync + 'static,
	{
		self.hooks.on_before_create(handler);
		self
	}

	/// Adds a handler that runs after each successful create.
	pub fn on_after_create<F>(&mut self, handler: F) -> &mut Self
	where
		F: Fn(&str) + Send + Sync + 'static,
	{
		self.hooks.on_after_create(handler);
		self
	}

	/// Inserts `record`.
	pub async fn create<R: Record>(&self, record: &mut R) -> FixtureResult<()> {
		record.before_create();
		self.hooks.run_before(R::TABLE);
		self.store
			.create(record)
			.await
			.map_err(|e| FixtureError::operation("create", &*record, e))?;
		self.hooks.run_after(R::TABLE);
		Ok(())
	}

	/// Inserts every record in order.
	pub async fn create_all<R: Record>(&self, records: &mut [R]) -> FixtureResult<()> {
		for record in records.iter_mut() {
			self.create(record).await?;
		}
		Ok(())
	}

	/// Inserts `record` and reloads it.
	pub async fn create_and_reload<R: Record>(&self, record: &mut R) -> FixtureResult<()> {
		self.create(record).await?;
		self.reload(record).await
	}

	/// Writes `record`'s fields to its stored row.
	pub async fn update<R: Record>(&self, record: &mut R) -> FixtureResult<()> {
		self.store
			.update(record)
			.await
			.map_err(|e| FixtureError::operation("update", &*record, e))
	}

	/// Updates `record` and reloads it.
	pub async fn update_and_reload<R: Record>(&self, record: &mut R) -> FixtureResult<()> {
		self.update(record).await?;
		self.reload(record).await
	}

	/// Removes `record`'s stored row.
	pub async fn delete<R: Record>(&self, record: &R) -> FixtureResult<()> {
		self.store
			.delete(record)
			.await
			.map_err(|e| FixtureError::operation("delete", &*record, e))
	}

	/// Refreshes `record` from its stored row.
	pub async fn reload<R: Record>(&self, record: &mut R) -> FixtureResult<()> {
		self.store
			.reload(record)
			.await
			.map_err(|e| FixtureError::operation("reload", &*record, e))
	}

	/// Removes every row from `R`'s table.
	pub async fn delete_from_table<R: Record>(&self) -> FixtureResult<u64> {
		let removed = self.store.delete_all_rows(R::TABLE).await?;
		tracing::debug!(table = R::TABLE, removed, "Cleared fixture table");
		Ok(removed)
	}

	/// Inserts the fixture behind `record`.
	pub async fn create_ref<R: Record>(&self, record: &FixtureRef<R>) -> FixtureResult<()> {
		let mut value = record.snapshot();
		self.create(&mut value).await?;
		record.replace(value);
		Ok(())
	}

	/// Inserts every fixture in order.
	pub async fn create_refs<R: Record>(&self, records: &[FixtureRef<R>]) -> FixtureResult<()> {
		for record in records {
			self.create_ref(record).await?;
		}
		Ok(())
	}

	/// Inserts the fixture behind `record` and reloads it.
	pub async fn create_and_reload_ref<R: Record>(
		&self,
		record: &FixtureRef<R>,
	) -> FixtureResult<()> {
		let mut value = record.snapshot();
		self.create_and_reload(&mut value).await?;
		record.replace(value);
		Ok(())
	}

	/// Writes the fixture behind `record` to its stored row.
	pub async fn update_ref<R: Record>(&self, record: &FixtureRef<R>) -> FixtureResult<()> {
		let mut value = record.snapshot();
		self.update(&mut value).await?;
		record.replace(value);
		Ok(())
	}

	/// Updates the fixture behind `record` and reloads it.
	pub async fn update_and_reload_ref<R: Record>(
		&self,
		record: &FixtureRef<R>,
	) -> FixtureResult<()> {
		let mut value = record.snapshot();
		self.update_and_reload(&mut value).await?;
		record.replace(value);
		Ok(())
	}

	/// Removes the stored row of the fixture behind `record`.
	pub async fn delete_ref<R: Record>(&self, record: &FixtureRef<R>) -> FixtureResult<()> {
		let value = record.snapshot();
		self.delete(&value).await
	}

	/// Refreshes the fixture behind `record` from its stored row.
	pub async fn reload_ref<R: Record>(&self, record: &FixtureRef<R>) -> FixtureResult<()> {
		let mut value = record.snapshot();
		self.reload(&mut value).await?;
		record.replace(value);
		Ok(())
	}
}
