//! # Climb Log Backend
//!
//! Reporting layer for a personal climbing logbook.
//!
//! Climbers record sessions and the climbs attempted in them (discipline,
//! grade, ascent type). This crate stores those records and aggregates them
//! into dashboard statistics: hardest grade per discipline, session counts,
//! grade pyramids, monthly progress and recent activity. The backend exposes
//! a REST API via Axum.
//!
//! ## Architecture
//!
//! - [`grades`]: the grade ordering table that makes "hardest" well defined
//! - [`models`]: canonical climb/session records shared by every store
//! - [`services`]: pure aggregation functions over climb records
//! - [`db`]: repository traits, in-memory and Postgres stores, ingestion
//! - [`routes`] / [`api`]: response and request types
//! - [`http`]: Axum router and handlers

// RepositoryError carries rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;
pub mod db;
pub mod grades;
pub mod models;
pub mod routes;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
