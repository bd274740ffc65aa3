//! Shared folder module for file management
//!
//! Provides access to the on-disk shared folder that backs the file catalog:
//! path resolution confined to the root, uploads, text editing and removal.

mod disk;

pub use disk::SharedFolder;
