//! Backlog: Persistent Feature Work-Queue
//!
//! A prioritized backlog of independently verifiable features, stored in a
//! local transactional store and reconciled against a directory of markdown
//! spec files without ever regressing recorded progress.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod init;
pub mod logging;
pub mod project;
pub mod queue;
pub mod spec;
pub mod store;
pub mod sync;
pub mod types;
