mod access_tracker;
mod file_service;

pub use access_tracker::AccessTracker;
pub use file_service::FileService;
