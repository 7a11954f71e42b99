use crate::logging::LogFormat;

/// Default bind address; all interfaces so desktop clients on the LAN can reach it.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Well-known port clients connect to.
pub const DEFAULT_PORT: u16 = 8888;

/// Fixed worker pool size.
pub const DEFAULT_WORKERS: usize = 10;

/// Accepted connections that may wait for a worker before new ones are turned away.
pub const DEFAULT_QUEUE_CAPACITY: usize = 32;

/// Longest request line accepted (1 MiB).
pub const DEFAULT_MAX_REQUEST_BYTES: usize = 1024 * 1024;

/// Default log filter expression used by the binaries.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Owned default bind address.
pub fn default_host() -> String {
    DEFAULT_HOST.to_owned()
}

/// Default listening port.
pub const fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Default worker count.
pub const fn default_workers() -> usize {
    DEFAULT_WORKERS
}

/// Default backlog queue capacity.
pub const fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

/// Default request size limit.
pub const fn default_max_request_bytes() -> usize {
    DEFAULT_MAX_REQUEST_BYTES
}

/// Default log filter expression used by the binaries.
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binaries.
pub fn default_log_format() -> LogFormat {
    LogFormat::Json
}
