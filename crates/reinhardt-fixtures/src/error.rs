//! Error types for the fixtures module.
//!
//! Unknown fixture keys are not errors: lookups return `None` for them.
//! The variants below cover registration conflicts and the persistence
//! helpers in [`crate::store`].

use thiserror::Error;

/// Errors that can occur while registering or persisting fixtures.
#[derive(Debug, Error)]
pub enum FixtureError {
	/// Two constructors were registered under the same key.
	#[error("Duplicate fixture key: {key}")]
	DuplicateKey {
		/// The key registered twice.
		key: String,
	},

	/// No stored row matches the record's primary key.
	#[error("Record not found: {table} (pk = {pk})")]
	RecordNotFound {
		/// Table the record belongs to.
		table: String,
		/// Primary key that was looked up.
		pk: i64,
	},

	/// A row with the record's primary key already exists.
	#[error("Duplicate primary key: {table} (pk = {pk})")]
	DuplicatePrimaryKey {
		/// Table the record belongs to.
		table: String,
		/// Conflicting primary key.
		pk: i64,
	},

	/// The operation needs a persisted record but the primary key is unset.
	#[error("Missing primary key: {table}")]
	MissingPrimaryKey {
		/// Table the record belongs to.
		table: String,
	},

	/// A store operation failed for a specific entity.
	#[error("Failed to {action}: {entity} because of {source}")]
	Operation {
		/// Operation name (`create`, `update`, ...).
		action: &'static str,
		/// Debug rendering of the entity involved.
		entity: String,
		/// Underlying failure.
		#[source]
		source: Box<FixtureError>,
	},

	/// Store backend failure that has no more specific variant.
	#[error("Store error: {0}")]
	Store(String),

	/// JSON serialization/deserialization error.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

impl FixtureError {
	/// Wraps `source` with the action and entity that triggered it.
	pub fn operation(action: &'static str, entity: &impl std::fmt::Debug, source: Self) -> Self {
		Self::Operation {
			action,
			entity: format!("{:?}", entity),
			source: Box::new(source),
		}
	}
}

/// Result type alias for fixture operations.
pub type FixtureResult<T> = Result<T, FixtureError>;

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_duplicate_key_error() {
		let error = FixtureError::DuplicateKey {
			key: "rob_pike".to_string(),
		};
		assert_eq!(error.to_string(), "Duplicate fixture key: rob_pike");
	}

	#[rstest]
	fn test_record_not_found_error() {
		let error = FixtureError::RecordNotFound {
			table: "users".to_string(),
			pk: 7,
		};
		assert_eq!(error.to_string(), "Record not found: users (pk = 7)");
	}

	#[rstest]
	fn test_operation_error_keeps_source() {
		#[derive(Debug)]
		#[allow(dead_code)]
		struct Row {
			id: i64,
		}

		let error = FixtureError::operation(
			"delete",
			&Row { id: 3 },
			FixtureError::MissingPrimaryKey {
				table: "rows".to_string(),
			},
		);

		assert_eq!(
			error.to_string(),
			"Failed to delete: Row { id: 3 } because of Missing primary key: rows"
		);
		let source = std::error::Error::source(&error).unwrap();
		assert_eq!(source.to_string(), "Missing primary key: rows");
	}

	#[rstest]
	fn test_json_error_from() {
		let json_error: serde_json::Error =
			serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
		let error: FixtureError = json_error.into();
		assert!(matches!(error, FixtureError::Json(_)));
	}
}
