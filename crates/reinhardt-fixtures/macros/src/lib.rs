//! Procedural macros for reinhardt-fixtures.
//!
//! This crate provides the `#[fixtures]` attribute, which turns an impl
//! block of `new_<key>` constructors into a fixture host.

use proc_macro::TokenStream;
use syn::{ItemImpl, parse_macro_input};

mod fixtures_attr;

/// Registers the `new_<key>` constructors of an impl block.
///
/// Every method named `new_<key>` that takes `&self` and exactly one
/// `Opts<Entity>` (or `Vec<Opt<Entity>>`) parameter and returns `Entity`
/// is registered under `<key>`. Methods that carry the prefix but differ
/// in shape are recorded as skipped and reported at registration time.
/// Other methods are left alone.
///
/// # Arguments
///
/// - `entity = Type` - The entity type the constructors build (required)
/// - `getters = Name` - Also generate a `pub trait Name` with one method
///   per key, implemented for `Fixtures<Self>`
///
/// # Example
///
/// ```ignore
/// use reinhardt_fixtures::prelude::*;
///
/// pub struct UserFactory;
///
/// #[fixtures(entity = User, getters = UserFixtures)]
/// impl UserFactory {
///     pub fn new_rob_pike(&self, opts: Opts<User>) -> User {
///         build_with_defaults(opts, vec![name("Rob Pike")])
///     }
///
///     // Skipped: the parameter is not `Opts<User>`
///     pub fn new_anonymous(&self, id: u32) -> User {
///         User::with_id(id)
///     }
/// }
/// ```
///
/// This generates:
///
/// ```ignore
/// impl reinhardt_fixtures::FixtureHost for UserFactory {
///     type Entity = User;
///
///     fn register(
///         registry: &mut reinhardt_fixtures::DispatcherBuilder<Self>,
///     ) -> reinhardt_fixtures::FixtureResult<()> {
///         registry.constructor("new_rob_pike", Self::new_rob_pike)?;
///         registry.skip("new_anonymous", "expected exactly one `Opts<Entity>` parameter");
///         Ok(())
///     }
/// }
///
/// pub trait UserFixtures {
///     fn rob_pike(&self, opts: Opts<User>) -> Option<FixtureRef<User>>;
/// }
///
/// impl UserFixtures for reinhardt_fixtures::Fixtures<UserFactory> {
///     fn rob_pike(&self, opts: Opts<User>) -> Option<FixtureRef<User>> {
///         self.get("rob_pike", opts)
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn fixtures(args: TokenStream, input: TokenStream) -> TokenStream {
	let mut attrs = fixtures_attr::FixturesArgs::default();
	let parser = syn::meta::parser(|meta| attrs.parse(meta));
	parse_macro_input!(args with parser);
	let input = parse_macro_input!(input as ItemImpl);

	fixtures_attr::fixtures_impl(attrs, input)
		.unwrap_or_else(|e| e.to_compile_error())
		.into()
}
