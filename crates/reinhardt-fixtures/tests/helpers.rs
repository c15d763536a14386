//! Test helpers for reinhardt-fixtures tests.
//!
//! Two fixture hosts modelled on a small blog: users, and articles that
//! reference users through a shared registry.

#![allow(dead_code)]

#[path = "helpers/users.rs"]
pub mod users;

#[path = "helpers/articles.rs"]
pub mod articles;
