//! User fixtures.

use reinhardt_fixtures::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
	pub id: i64,
	pub name: String,
	pub email: String,
}

impl Record for User {
	const TABLE: &'static str = "users";

	fn pk(&self) -> i64 {
		self.id
	}

	fn set_pk(&mut self, pk: i64) {
		self.id = pk;
	}
}

pub fn name(v: &str) -> Opt<User> {
	let v = v.to_string();
	opt(move |u: &mut User| u.name = v)
}

pub fn email(v: &str) -> Opt<User> {
	let v = v.to_string();
	opt(move |u: &mut User| u.email = v)
}

pub struct UserFactory;

#[fixtures(entity = User, getters = UserFixtures)]
impl UserFactory {
	pub fn new_rob_pike(&self, opts: Opts<User>) -> User {
		build_with_defaults(opts, vec![name("Rob Pike"), email("rob@golang.org")])
	}

	pub fn new_ken_thompson(&self, opts: Opts<User>) -> User {
		build_with_defaults(opts, vec![name("Ken Thompson"), email("ken@golang.org")])
	}

	pub fn new_robert_griesemer(&self, opts: Opts<User>) -> User {
		build_with_defaults(
			opts,
			vec![name("Robert Griesemer"), email("gri@golang.org")],
		)
	}
}

pub fn user_fixtures() -> Fixtures<UserFactory> {
	Fixtures::new(UserFactory).unwrap()
}
