/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Admin role - unrestricted access to every team's files
pub const ROLE_ADMIN: &str = "admin";

/// Manager role - manages the files of their own team and may trigger rescans
pub const ROLE_MANAGER: &str = "manager";

/// Member role - reads and edits the files of their own team
pub const ROLE_MEMBER: &str = "member";

// =============================================================================
// FILE EDITING
// =============================================================================

/// Extensions that can be opened in the in-browser text editor
pub const EDITABLE_EXTENSIONS: &[&str] = &[
    "txt", "csv", "md", "py", "json", "html", "js", "css", "log",
];
