//! Database seeding functionality
//!
//! This module provides functionality to seed the database with initial data.
//! It includes seeding for default categories that need to be populated when
//! the application starts.

pub mod category;

pub use category::seed_categories;
