/// Application-wide constants to avoid magic values throughout the codebase.
///
/// This module centralizes all magic strings, numbers, and other literal values
/// used across the application, making them easier to maintain and modify.
/// HTTP status code constants
pub mod http_status {
    /// HTTP 200 OK - the only status counted as a successful probe
    pub const OK: u16 = 200;
    /// HTTP 301 Moved Permanently - permanent redirect
    pub const MOVED_PERMANENTLY: u16 = 301;
    /// HTTP 404 Not Found - resource not found
    pub const NOT_FOUND: u16 = 404;
    /// HTTP 500 Internal Server Error - server error
    pub const INTERNAL_SERVER_ERROR: u16 = 500;
}

/// Worker pool sizing constants
pub mod pool {
    /// Workers allotted per file in a batch
    pub const WORKERS_PER_FILE: usize = 8;
    /// Width used for an empty batch, and the floor for every other batch
    pub const MIN_POOL_WIDTH: usize = 4;
    /// Upper bound accepted by configuration validation
    pub const MAX_WORKERS_PER_FILE: usize = 1024;
}

/// Statistics reporting constants
pub mod reporting {
    /// A threshold report is emitted whenever a file's total hits a multiple of this
    pub const REPORT_INTERVAL: u64 = 10_000;
}

/// Timeout and redirect constants
pub mod timeouts {
    /// Maximum reasonable timeout in seconds (24 hours)
    pub const MAX_TIMEOUT_SECONDS: u64 = 86_400;
    /// Redirects followed when nothing else is configured
    pub const DEFAULT_MAX_REDIRECTS: usize = 10;
    /// Upper bound accepted by configuration validation
    pub const MAX_REDIRECTS_LIMIT: usize = 50;
}

/// File and directory constants
pub mod files {
    /// Directory scanned when neither the CLI nor a config file names one
    pub const DEFAULT_INPUT_DIR: &str = "inputData";
    /// Config file looked up in the working directory and its parents
    pub const CONFIG_FILE_NAME: &str = ".urlsweep.toml";
    /// How many parent directories are searched for a config file
    pub const CONFIG_SEARCH_DEPTH: usize = 3;
}

/// Fixed console messages
pub mod messages {
    /// Printed before discovery starts
    pub const STARTUP: &str = "Executing...";
    /// Printed after every discovered file has been reported
    pub const BATCH_COMPLETE: &str = "Finished processing all existing files.";
    /// Prefix of the diagnostic emitted when a file cannot be streamed
    pub const FILE_ERROR_PREFIX: &str = "Error processing lines in file: ";
}
