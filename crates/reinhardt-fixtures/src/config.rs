//! Registry configuration.

use serde::{Deserialize, Serialize};

/// What to do when a constructor is registered under a key that is
/// already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateKeyPolicy {
	/// Fail registration with [`FixtureError::DuplicateKey`](crate::FixtureError::DuplicateKey).
	#[default]
	Reject,
	/// Keep the most recent constructor and log a warning.
	Replace,
}

/// Options applied while a fixture registry is assembled.
///
/// # Example
///
/// ```
/// use reinhardt_fixtures::{DuplicateKeyPolicy, FixturesConfig};
///
/// let config = FixturesConfig::new()
///     .with_label("users")
///     .with_duplicate_key_policy(DuplicateKeyPolicy::Replace);
/// assert_eq!(config.label.as_deref(), Some("users"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixturesConfig {
	/// Name used in log events. Defaults to the host type name.
	pub label: Option<String>,

	/// Handling of duplicate keys.
	pub on_duplicate_key: DuplicateKeyPolicy,

	/// Log a warning for each `new_`-prefixed method that was not registered.
	pub report_skipped: bool,
}

impl Default for FixturesConfig {
	fn default() -> Self {
		Self {
			label: None,
			on_duplicate_key: DuplicateKeyPolicy::default(),
			report_skipped: true,
		}
	}
}

impl FixturesConfig {
	/// Creates new default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the label used in log events.
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	/// Sets the duplicate key policy.
	pub fn with_duplicate_key_policy(mut self, policy: DuplicateKeyPolicy) -> Self {
		self.on_duplicate_key = policy;
		self
	}

	/// Sets whether skipped constructor candidates are logged.
	pub fn with_report_skipped(mut self, report: bool) -> Self {
		self.report_skipped = report;
		self
	}
}
