//! Memoizing fixture cache.
//!
//! [`FixtureCache`] wraps any [`Factory`] and builds each key at most once.
//! A mutex guards only the key to slot map; every slot is a
//! [`OnceCell`], so a constructor runs outside the map lock and may itself
//! fetch other keys from the same cache. Fetching the key that is currently
//! being built from inside its own constructor deadlocks.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::factory::{Factory, Getter};
use crate::instance::Opts;

/// Shared handle to a cached fixture.
///
/// Every clone points at the same instance. Writes through
/// [`write`](Self::write) are visible to all holders, including fixtures
/// that captured the handle while being built.
pub struct FixtureRef<T>(Arc<RwLock<T>>);

impl<T> FixtureRef<T> {
	/// Wraps `value` in a new handle.
	pub fn new(value: T) -> Self {
		Self(Arc::new(RwLock::new(value)))
	}

	/// Locks the instance for reading.
	pub fn read(&self) -> RwLockReadGuard<'_, T> {
		self.0.read()
	}

	/// Locks the instance for writing.
	pub fn write(&self) -> RwLockWriteGuard<'_, T> {
		self.0.write()
	}

	/// Replaces the instance, returning the previous value.
	pub fn replace(&self, value: T) -> T {
		std::mem::replace(&mut *self.0.write(), value)
	}

	/// Returns a copy of the current value.
	pub fn snapshot(&self) -> T
	where
		T: Clone,
	{
		self.0.read().clone()
	}

	/// Returns true if both handles point at the same instance.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

impl<T> Clone for FixtureRef<T> {
	fn clone(&self) -> Self {
		Self(Arc::clone(&self.0))
	}
}

impl<T: fmt::Debug> fmt::Debug for FixtureRef<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.0.try_read() {
			Some(value) => f.debug_tuple("FixtureRef").field(&*value).finish(),
			None => f.write_str("FixtureRef(<locked>)"),
		}
	}
}

type Slot<T> = Arc<OnceCell<FixtureRef<T>>>;

/// Marker for a factory that had nothing registered under the key.
struct Unregistered;

/// Key to instance cache layered on a [`Factory`].
pub struct FixtureCache<T, F> {
	factory: F,
	slots: Mutex<HashMap<String, Slot<T>>>,
}

impl<T, F: Factory<T>> FixtureCache<T, F> {
	/// Creates an empty cache backed by `factory`.
	pub fn new(factory: F) -> Self {
		Self {
			factory,
			slots: Mutex::new(HashMap::new()),
		}
	}

	/// Returns the instance cached under `key`, building it on first use.
	///
	/// On a hit `opts` are dropped without being applied. If the factory
	/// has nothing under `key`, returns `None` and caches nothing, so a
	/// later call tries again.
	pub fn get(&self, key: &str, opts: Opts<T>) -> Option<FixtureRef<T>> {
		let slot = self.slot(key);
		if let Some(cached) = slot.get() {
			tracing::debug!(key, "Fixture cache hit");
			return Some(cached.clone());
		}

		let built = slot.get_or_try_init(|| {
			tracing::debug!(key, "Fixture cache miss, building instance");
			self.factory
				.build(key, opts)
				.map(FixtureRef::new)
				.ok_or(Unregistered)
		});

		match built {
			Ok(instance) => Some(instance.clone()),
			Err(Unregistered) => {
				self.release(key, &slot);
				None
			}
		}
	}

	/// Returns the wrapped factory.
	pub fn factory(&self) -> &F {
		&self.factory
	}

	/// Checks if an instance is cached under `key`.
	pub fn contains(&self, key: &str) -> bool {
		self.slots
			.lock()
			.get(key)
			.is_some_and(|slot| slot.get().is_some())
	}

	/// Returns the number of cached instances.
	pub fn len(&self) -> usize {
		self.slots
			.lock()
			.values()
			.filter(|slot| slot.get().is_some())
			.count()
	}

	/// Returns true if nothing has been cached yet.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Returns the keys of all cached instances, sorted.
	pub fn keys(&self) -> Vec<String> {
		let mut keys: Vec<String> = self
			.slots
			.lock()
			.iter()
			.filter(|(_, slot)| slot.get().is_some())
			.map(|(key, _)| key.clone())
			.collect();
		keys.sort_unstable();
		keys
	}

	fn slot(&self, key: &str) -> Slot<T> {
		Arc::clone(self.slots.lock().entry(key.to_string()).or_default())
	}

	// Drops a slot left empty by an unknown key so the map only grows with
	// built instances.
	fn release(&self, key: &str, slot: &Slot<T>) {
		let mut slots = self.slots.lock();
		if let Some(current) = slots.get(key)
			&& Arc::ptr_eq(current, slot)
			&& current.get().is_none()
		{
			slots.remove(key);
		}
	}
}

impl<T, F: Factory<T>> Getter<T> for FixtureCache<T, F> {
	fn get(&self, key: &str, opts: Opts<T>) -> Option<FixtureRef<T>> {
		FixtureCache::get(self, key, opts)
	}
}

impl<T, F: Factory<T>> fmt::Debug for FixtureCache<T, F> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FixtureCache")
			.field("keys", &self.keys())
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::instance::{Opt, build_instance, opt};
	use rstest::rstest;
	use std::sync::atomic::{AtomicUsize, Ordering};
	use std::thread;
	use std::time::Duration;

	#[derive(Debug, Default, Clone, PartialEq)]
	struct Item {
		name: String,
		qty: u32,
	}

	fn qty(v: u32) -> Opt<Item> {
		opt(move |i: &mut Item| i.qty = v)
	}

	/// Factory that knows a fixed set of keys and counts its builds.
	#[derive(Default)]
	struct CountingFactory {
		builds: AtomicUsize,
	}

	impl CountingFactory {
		fn builds(&self) -> usize {
			self.builds.load(Ordering::SeqCst)
		}
	}

	impl Factory<Item> for CountingFactory {
		fn build(&self, key: &str, opts: Opts<Item>) -> Option<Item> {
			self.builds.fetch_add(1, Ordering::SeqCst);
			if !matches!(key, "apple" | "pear") {
				return None;
			}
			let name = key.to_string();
			let mut all: Opts<Item> = vec![opt(move |i: &mut Item| i.name = name)];
			all.extend(opts);
			Some(build_instance(all))
		}
	}

	fn counting() -> FixtureCache<Item, CountingFactory> {
		FixtureCache::new(CountingFactory::default())
	}

	#[rstest]
	fn test_get_returns_same_instance() {
		let cache = counting();

		let first = cache.get("apple", Vec::new()).unwrap();
		let second = cache.get("apple", Vec::new()).unwrap();

		assert!(first.ptr_eq(&second));
		assert_eq!(cache.factory().builds(), 1);
	}

	#[rstest]
	fn test_options_ignored_on_hit() {
		// Arrange
		let cache = counting();
		let first = cache.get("apple", vec![qty(1)]).unwrap();

		// Act
		let second = cache.get("apple", vec![qty(2)]).unwrap();

		// Assert
		assert!(first.ptr_eq(&second));
		assert_eq!(second.read().qty, 1);
	}

	#[rstest]
	fn test_distinct_keys_build_distinct_instances() {
		let cache = counting();

		let apple = cache.get("apple", Vec::new()).unwrap();
		let pear = cache.get("pear", Vec::new()).unwrap();

		assert!(!apple.ptr_eq(&pear));
		assert_eq!(cache.keys(), vec!["apple".to_string(), "pear".to_string()]);
		assert_eq!(cache.len(), 2);
	}

	#[rstest]
	fn test_unknown_key_is_not_cached() {
		let cache = counting();

		assert!(cache.get("plum", Vec::new()).is_none());
		assert!(cache.get("plum", Vec::new()).is_none());

		assert!(!cache.contains("plum"));
		assert!(cache.is_empty());
		// Both lookups reached the factory.
		assert_eq!(cache.factory().builds(), 2);
	}

	#[rstest]
	fn test_writes_are_shared_between_handles() {
		let cache = counting();
		let handle = cache.get("pear", Vec::new()).unwrap();

		handle.write().qty = 12;

		assert_eq!(cache.get("pear", Vec::new()).unwrap().read().qty, 12);
	}

	#[rstest]
	fn test_works_over_borrowed_factory() {
		let factory = CountingFactory::default();
		let cache: FixtureCache<Item, _> = FixtureCache::new(&factory);

		cache.get("apple", Vec::new()).unwrap();

		assert_eq!(factory.builds(), 1);
	}

	/// Factory whose constructor is slow enough for callers to overlap.
	#[derive(Default)]
	struct SlowFactory {
		builds: AtomicUsize,
	}

	impl Factory<Item> for SlowFactory {
		fn build(&self, key: &str, opts: Opts<Item>) -> Option<Item> {
			self.builds.fetch_add(1, Ordering::SeqCst);
			thread::sleep(Duration::from_millis(20));
			let mut item: Item = build_instance(opts);
			item.name = key.to_string();
			Some(item)
		}
	}

	#[rstest]
	fn test_concurrent_get_builds_once() {
		let cache: FixtureCache<Item, _> = FixtureCache::new(SlowFactory::default());
		let cache = &cache;

		let handles: Vec<FixtureRef<Item>> = thread::scope(|scope| {
			let workers: Vec<_> = (0..8)
				.map(|n| scope.spawn(move || cache.get("shared", vec![qty(n)]).unwrap()))
				.collect();
			workers.into_iter().map(|w| w.join().unwrap()).collect()
		});

		assert_eq!(cache.factory().builds.load(Ordering::SeqCst), 1);
		assert!(handles.iter().all(|h| h.ptr_eq(&handles[0])));
	}

	#[rstest]
	fn test_debug_renders_value() {
		let handle = FixtureRef::new(Item {
			name: "fig".to_string(),
			qty: 1,
		});

		assert_eq!(
			format!("{:?}", handle),
			r#"FixtureRef(Item { name: "fig", qty: 1 })"#
		);
	}
}
