//! REST backend for tracking university group projects.
//!
//! A project carries metadata, a member list and an embedded list of Kanban
//! tasks. Its completion percentage and status are derived from those tasks
//! and its deadline, and are recomputed on every read and write.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod service;
