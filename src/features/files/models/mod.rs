mod file;

pub use file::{file_type_of, FileRecord, FileRecordPatch, FileRecordRow, Modifier, NewFileRecord};
