//! `remark_import` - comment importers for remark-style comment storage
//!
//! This crate converts third-party comment exports into normalized
//! [`model::Comment`] records and bulk-inserts them into a [`storage::Store`].
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`migrator`] - Importers (Cusdis) and the shared save loop
//! - [`model`] - Data types (Comment, Locator, User, PostInfo)
//! - [`storage`] - `Store` trait and the `SQLite` backend
//! - [`config`] - Database configuration
//! - [`error`] - Error types and handling
//! - [`logging`] - tracing subscriber setup
//! - [`util`] - Hashing helpers

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod logging;
pub mod migrator;
pub mod model;
pub mod storage;
pub mod util;

pub use error::{Error, Result};
pub use migrator::{Cusdis, Importer, ImporterKind};
pub use storage::{SqliteStorage, Store};
