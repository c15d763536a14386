//! Create hooks.

use std::fmt;
use std::sync::Arc;

/// Handler invoked with the name of the table being written.
pub type CreateHandler = Arc<dyn Fn(&str) + Send + Sync>;

/// Handlers run before and after each create, in registration order.
#[derive(Clone, Default)]
pub struct CreateHooks {
	before: Vec<CreateHandler>,
	after: Vec<CreateHandler>,
}

impl CreateHooks {
	/// Creates an empty hook set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a handler that runs before each create.
	pub fn on_before_create<F>(&mut self, handler: F) -> &mut Self
	where
		F: Fn(&str) + Send + Sync + 'static,
	{
		self.before.push(Arc::new(handler));
		self
	}

	/// Adds a handler that runs after each successful create.
	pub fn on_after_create<F>(&mut self, handler: F) -> &mut Self
	where
		F: Fn(&str) + Send + Sync + 'static,
	{
		self.after.push(Arc::new(handler));
		self
	}

	/// Runs the before-create handlers.
	pub fn run_before(&self, table: &str) {
		for handler in &self.before {
			handler(table);
		}
	}

	/// Runs the after-create handlers.
	pub fn run_after(&self, table: &str) {
		for handler in &self.after {
			handler(table);
		}
	}

	/// Returns true if no handlers are registered.
	pub fn is_empty(&self) -> bool {
		self.before.is_empty() && self.after.is_empty()
	}
}

impl fmt::Debug for CreateHooks {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CreateHooks")
			.field("before", &self.before.len())
			.field("after", &self.after.len())
			.finish()
	}
}
