mod sync_dto;

pub use sync_dto::*;
