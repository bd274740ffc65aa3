//! Modules layer - Infrastructure components for external integrations
//!
//! Contains adapters for resources outside the process, such as the shared folder on disk.

pub mod shared_folder;
