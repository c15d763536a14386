//! Article fixtures that depend on user fixtures.

use reinhardt_fixtures::prelude::*;
use serde::{Deserialize, Serialize};

use super::users::{User, UserFactory, UserFixtures};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Article {
	pub id: i64,
	pub author_id: i64,
	pub title: String,
	pub body: String,
	#[serde(skip)]
	pub author: Option<FixtureRef<User>>,
}

impl Record for Article {
	const TABLE: &'static str = "articles";

	fn pk(&self) -> i64 {
		self.id
	}

	fn set_pk(&mut self, pk: i64) {
		self.id = pk;
	}

	fn before_create(&mut self) {
		if let Some(author) = &self.author {
			self.author_id = author.read().id;
		}
	}

	fn refresh_from(&mut self, stored: Self) {
		let author = self.author.take();
		*self = Self { author, ..stored };
	}
}

pub fn title(v: &str) -> Opt<Article> {
	let v = v.to_string();
	opt(move |a: &mut Article| a.title = v)
}

pub fn body(v: &str) -> Opt<Article> {
	let v = v.to_string();
	opt(move |a: &mut Article| a.body = v)
}

pub fn author(user: Option<FixtureRef<User>>) -> Opt<Article> {
	opt(move |a: &mut Article| a.author = user)
}

pub struct ArticleFactory {
	pub users: Fixtures<UserFactory>,
}

impl ArticleFactory {
	pub fn new() -> FixtureResult<Self> {
		Ok(Self {
			users: Fixtures::new(UserFactory)?,
		})
	}
}

#[fixtures(entity = Article, getters = ArticleFixtures)]
impl ArticleFactory {
	pub fn new_five_rules(&self, opts: Opts<Article>) -> Article {
		build_with_defaults(
			opts,
			vec![
				title("Rob Pike's 5 Rules of Programming"),
				body("Rule 1. You can't tell where a program is going to spend its time."),
				author(self.users.rob_pike(vec![])),
			],
		)
	}

	pub fn new_go_proverbs(&self, opts: Opts<Article>) -> Article {
		build_with_defaults(
			opts,
			vec![
				title("Go Proverbs"),
				body("Don't communicate by sharing memory, share memory by communicating."),
				author(self.users.rob_pike(vec![])),
			],
		)
	}

	pub fn new_a_brief_introduction(&self, opts: Opts<Article>) -> Article {
		build_with_defaults(
			opts,
			vec![
				title("A Brief Introduction"),
				body("The C programming language was devised in the early 1970s."),
				author(self.users.ken_thompson(vec![])),
			],
		)
	}
}

pub fn article_fixtures() -> Fixtures<ArticleFactory> {
	Fixtures::new(ArticleFactory::new().unwrap()).unwrap()
}

/// Registry whose authors come from an existing user registry.
pub fn article_fixtures_with(users: Fixtures<UserFactory>) -> Fixtures<ArticleFactory> {
	Fixtures::new(ArticleFactory { users }).unwrap()
}
