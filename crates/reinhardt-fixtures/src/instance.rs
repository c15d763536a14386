//! Option-driven instance construction.
//!
//! Fixtures are built from `T::default()` followed by a list of options,
//! each one a closure that assigns some fields. Options run left to right,
//! so a later option overwrites whatever an earlier one set.

/// A single field assignment applied to a freshly built entity.
pub type Opt<T> = Box<dyn FnOnce(&mut T) + Send + 'static>;

/// Ordered list of options.
pub type Opts<T> = Vec<Opt<T>>;

/// Boxes a closure as an [`Opt`].
///
/// # Example
///
/// ```
/// use reinhardt_fixtures::{Opt, build_instance, opt};
///
/// #[derive(Default)]
/// struct User {
///     name: String,
/// }
///
/// fn name(v: &str) -> Opt<User> {
///     let v = v.to_string();
///     opt(move |u: &mut User| u.name = v)
/// }
///
/// let user = build_instance(vec![name("Rob Pike")]);
/// assert_eq!(user.name, "Rob Pike");
/// ```
pub fn opt<T, F>(f: F) -> Opt<T>
where
	F: FnOnce(&mut T) + Send + 'static,
{
	Box::new(f)
}

/// Builds a zero-valued `T` and applies `opts` in order.
pub fn build_instance<T, I>(opts: I) -> T
where
	T: Default,
	I: IntoIterator<Item = Opt<T>>,
{
	let mut instance = T::default();
	for apply in opts {
		apply(&mut instance);
	}
	instance
}

/// Builds a `T` with `defaults` applied first and `opts` after them.
///
/// Caller options win over defaults that touch the same field.
///
/// # Example
///
/// ```
/// use reinhardt_fixtures::{build_with_defaults, opt};
///
/// #[derive(Default)]
/// struct Article {
///     title: String,
/// }
///
/// let article: Article = build_with_defaults(
///     vec![opt(|a: &mut Article| a.title = "X".into())],
///     vec![opt(|a: &mut Article| a.title = "default".into())],
/// );
/// assert_eq!(article.title, "X");
/// ```
pub fn build_with_defaults<T: Default>(opts: Opts<T>, defaults: Opts<T>) -> T {
	build_instance(defaults.into_iter().chain(opts))
}
