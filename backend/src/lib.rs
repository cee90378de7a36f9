//! FitTrack backend
//!
//! HTTP API over the `fittrack-shared` metrics core: accounts, the body
//! profile, the four record kinds and the dashboard, backed by PostgreSQL.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
