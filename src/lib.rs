//! # Noticeboard API Library
//!
//! This library provides the core functionality for the noticeboard content
//! service: the content entity store, the visibility evaluator, the archival
//! manager and its audit trail, plus handlers and server configuration.

pub mod actor;
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod lifecycle;
pub mod models;
pub mod repositories;
pub mod seeds;
pub mod server;
pub mod telemetry;
pub mod visibility;
pub use migration;
