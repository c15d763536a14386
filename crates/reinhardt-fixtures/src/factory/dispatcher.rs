//! Key to constructor dispatch.
//!
//! A [`DispatcherBuilder`] collects a host's constructors, deriving each
//! key from the constructor name by stripping [`CONSTRUCTOR_PREFIX`]. Once
//! built, a [`FactoryDispatcher`] owns the host and a read-only table;
//! nothing can be registered afterwards.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::traits::{Factory, FixtureHost};
use crate::config::{DuplicateKeyPolicy, FixturesConfig};
use crate::error::{FixtureError, FixtureResult};
use crate::instance::Opts;

/// Prefix a method name must carry to be treated as a constructor.
pub const CONSTRUCTOR_PREFIX: &str = "new_";

/// Constructor bound to a host at call time.
pub type Constructor<H> = Arc<
	dyn Fn(&H, Opts<<H as FixtureHost>::Entity>) -> <H as FixtureHost>::Entity + Send + Sync,
>;

/// Derives a fixture key from a constructor name.
///
/// Returns `None` when the name lacks the prefix or nothing follows it.
///
/// ```
/// use reinhardt_fixtures::factory::derive_key;
///
/// assert_eq!(derive_key("new_rob_pike"), Some("rob_pike"));
/// assert_eq!(derive_key("rob_pike"), None);
/// assert_eq!(derive_key("new_"), None);
/// ```
pub fn derive_key(name: &str) -> Option<&str> {
	name.strip_prefix(CONSTRUCTOR_PREFIX)
		.filter(|key| !key.is_empty())
}

/// Collects constructors for a host before its dispatcher is built.
pub struct DispatcherBuilder<H: FixtureHost> {
	config: FixturesConfig,
	label: String,
	table: HashMap<String, Constructor<H>>,
	skipped: Vec<String>,
}

impl<H: FixtureHost> DispatcherBuilder<H> {
	/// Creates an empty builder.
	pub fn new(config: FixturesConfig) -> Self {
		let label = config
			.label
			.clone()
			.unwrap_or_else(|| std::any::type_name::<H>().to_string());
		Self {
			config,
			label,
			table: HashMap::new(),
			skipped: Vec::new(),
		}
	}

	/// Registers `constructor` under the key derived from `name`.
	///
	/// Names without the `new_` prefix are skipped rather than rejected.
	///
	/// # Errors
	///
	/// Returns [`FixtureError::DuplicateKey`] if the derived key is taken
	/// and the policy is [`DuplicateKeyPolicy::Reject`].
	pub fn constructor<F>(&mut self, name: &str, constructor: F) -> FixtureResult<&mut Self>
	where
		F: Fn(&H, Opts<H::Entity>) -> H::Entity + Send + Sync + 'static,
	{
		match derive_key(name) {
			Some(key) => self.keyed(key, constructor),
			None => Ok(self.skip(name, "name does not start with `new_`")),
		}
	}

	/// Registers `constructor` under an explicit key.
	///
	/// # Errors
	///
	/// Returns [`FixtureError::DuplicateKey`] if `key` is taken and the
	/// policy is [`DuplicateKeyPolicy::Reject`].
	pub fn keyed<F>(&mut self, key: impl Into<String>, constructor: F) -> FixtureResult<&mut Self>
	where
		F: Fn(&H, Opts<H::Entity>) -> H::Entity + Send + Sync + 'static,
	{
		let key = key.into();
		if self.table.contains_key(&key) {
			match self.config.on_duplicate_key {
				DuplicateKeyPolicy::Reject => return Err(FixtureError::DuplicateKey { key }),
				DuplicateKeyPolicy::Replace => {
					tracing::warn!(
						registry = %self.label,
						key = %key,
						"Replacing previously registered fixture constructor"
					);
				}
			}
		}

		tracing::debug!(registry = %self.label, key = %key, "Registered fixture constructor");
		let constructor: Constructor<H> = Arc::new(constructor);
		self.table.insert(key, constructor);
		Ok(self)
	}

	/// Records a constructor candidate that was not registered.
	pub fn skip(&mut self, name: &str, reason: &str) -> &mut Self {
		if self.config.report_skipped {
			tracing::warn!(
				registry = %self.label,
				method = name,
				reason,
				"Skipping fixture constructor candidate"
			);
		}
		self.skipped.push(name.to_string());
		self
	}

	/// Binds the collected constructors to `host`.
	pub fn build(self, host: H) -> FactoryDispatcher<H> {
		FactoryDispatcher {
			host,
			label: self.label,
			table: self.table,
			skipped: self.skipped,
		}
	}
}

/// Read-only key to constructor table bound to a host instance.
pub struct FactoryDispatcher<H: FixtureHost> {
	host: H,
	label: String,
	table: HashMap<String, Constructor<H>>,
	skipped: Vec<String>,
}

impl<H: FixtureHost> FactoryDispatcher<H> {
	/// Creates a dispatcher for `host` with default options.
	pub fn new(host: H) -> FixtureResult<Self> {
		Self::with_config(host, FixturesConfig::default())
	}

	/// Creates a dispatcher for `host`.
	///
	/// # Errors
	///
	/// Propagates any error returned by [`FixtureHost::register`].
	pub fn with_config(host: H, config: FixturesConfig) -> FixtureResult<Self> {
		let mut builder = DispatcherBuilder::new(config);
		H::register(&mut builder)?;
		Ok(builder.build(host))
	}

	/// Builds a fresh instance for `key`, or `None` if no constructor is
	/// registered under it.
	pub fn build(&self, key: &str, opts: Opts<H::Entity>) -> Option<H::Entity> {
		let Some(constructor) = self.table.get(key) else {
			tracing::debug!(registry = %self.label, key, "No fixture constructor registered");
			return None;
		};
		Some(constructor(&self.host, opts))
	}

	/// Returns the host the constructors are bound to.
	pub fn host(&self) -> &H {
		&self.host
	}

	/// Returns the label used in log events.
	pub fn label(&self) -> &str {
		&self.label
	}

	/// Returns all registered keys, sorted.
	pub fn keys(&self) -> Vec<&str> {
		let mut keys: Vec<&str> = self.table.keys().map(String::as_str).collect();
		keys.sort_unstable();
		keys
	}

	/// Checks if a constructor is registered under `key`.
	pub fn contains(&self, key: &str) -> bool {
		self.table.contains_key(key)
	}

	/// Returns the number of registered constructors.
	pub fn len(&self) -> usize {
		self.table.len()
	}

	/// Returns true if no constructors are registered.
	pub fn is_empty(&self) -> bool {
		self.table.is_empty()
	}

	/// Returns the names of constructor candidates that were skipped.
	pub fn skipped(&self) -> &[String] {
		&self.skipped
	}
}

impl<H: FixtureHost> Factory<H::Entity> for FactoryDispatcher<H> {
	fn build(&self, key: &str, opts: Opts<H::Entity>) -> Option<H::Entity> {
		FactoryDispatcher::build(self, key, opts)
	}
}

impl<H: FixtureHost> fmt::Debug for FactoryDispatcher<H> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FactoryDispatcher")
			.field("label", &self.label)
			.field("keys", &self.keys())
			.field("skipped", &self.skipped)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::instance::{Opt, build_with_defaults, opt};
	use rstest::rstest;

	#[derive(Debug, Default, Clone, PartialEq)]
	struct Widget {
		label: String,
		size: u32,
	}

	fn label(v: &str) -> Opt<Widget> {
		let v = v.to_string();
		opt(move |w: &mut Widget| w.label = v)
	}

	fn size(v: u32) -> Opt<Widget> {
		opt(move |w: &mut Widget| w.size = v)
	}

	struct WidgetFactory {
		default_size: u32,
	}

	impl WidgetFactory {
		fn new_foo(&self, opts: Opts<Widget>) -> Widget {
			build_with_defaults(opts, vec![label("foo"), size(self.default_size)])
		}

		fn new_bar(&self, opts: Opts<Widget>) -> Widget {
			build_with_defaults(opts, vec![label("bar")])
		}
	}

	impl FixtureHost for WidgetFactory {
		type Entity = Widget;

		fn register(registry: &mut DispatcherBuilder<Self>) -> FixtureResult<()> {
			registry
				.constructor("new_foo", Self::new_foo)?
				.constructor("new_bar", Self::new_bar)?
				.constructor("helper", Self::new_foo)?;
			Ok(())
		}
	}

	struct ClashingFactory;

	impl FixtureHost for ClashingFactory {
		type Entity = Widget;

		fn register(registry: &mut DispatcherBuilder<Self>) -> FixtureResult<()> {
			registry
				.constructor("new_twin", |_: &Self, opts| {
					build_with_defaults(opts, vec![label("first")])
				})?
				.keyed("twin", |_: &Self, opts| {
					build_with_defaults(opts, vec![label("second")])
				})?;
			Ok(())
		}
	}

	fn widgets() -> FactoryDispatcher<WidgetFactory> {
		FactoryDispatcher::new(WidgetFactory { default_size: 4 }).unwrap()
	}

	#[rstest]
	#[case("new_foo", Some("foo"))]
	#[case("new_RobPike", Some("RobPike"))]
	#[case("newfoo", None)]
	#[case("New_foo", None)]
	#[case("new_", None)]
	fn test_derive_key(#[case] name: &str, #[case] expected: Option<&str>) {
		assert_eq!(derive_key(name), expected);
	}

	#[rstest]
	fn test_registers_prefixed_constructors() {
		let dispatcher = widgets();

		assert_eq!(dispatcher.keys(), vec!["bar", "foo"]);
		assert!(dispatcher.contains("foo"));
		assert!(!dispatcher.contains("helper"));
		assert_eq!(dispatcher.skipped(), &["helper".to_string()]);
	}

	#[rstest]
	fn test_build_dispatches_through_host() {
		let dispatcher = widgets();

		let widget = dispatcher.build("foo", vec![label("custom")]).unwrap();

		assert_eq!(
			widget,
			Widget {
				label: "custom".to_string(),
				size: 4,
			}
		);
	}

	#[rstest]
	fn test_build_unknown_key_returns_none() {
		let dispatcher = widgets();

		assert!(dispatcher.build("does_not_exist", Vec::new()).is_none());
		assert!(dispatcher.build("Foo", Vec::new()).is_none());
	}

	#[rstest]
	fn test_build_returns_independent_instances() {
		let dispatcher = widgets();

		let mut first = dispatcher.build("bar", Vec::new()).unwrap();
		let second = dispatcher.build("bar", Vec::new()).unwrap();
		first.size = 99;

		assert_eq!(second.size, 0);
	}

	#[rstest]
	fn test_duplicate_key_is_rejected_by_default() {
		let result = FactoryDispatcher::new(ClashingFactory);

		assert!(matches!(
			result,
			Err(FixtureError::DuplicateKey { ref key }) if key == "twin"
		));
	}

	#[rstest]
	fn test_duplicate_key_replaced_when_configured() {
		let config = FixturesConfig::new().with_duplicate_key_policy(DuplicateKeyPolicy::Replace);

		let dispatcher = FactoryDispatcher::with_config(ClashingFactory, config).unwrap();

		assert_eq!(dispatcher.len(), 1);
		assert_eq!(dispatcher.build("twin", Vec::new()).unwrap().label, "second");
	}

	#[rstest]
	fn test_label_defaults_to_host_type_name() {
		let dispatcher = widgets();
		assert!(dispatcher.label().ends_with("WidgetFactory"));

		let config = FixturesConfig::new().with_label("widgets");
		let labelled = FactoryDispatcher::with_config(WidgetFactory { default_size: 1 }, config).unwrap();
		assert_eq!(labelled.label(), "widgets");
	}
}
