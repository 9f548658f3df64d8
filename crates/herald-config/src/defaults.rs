/// Default log filter expression used when the host supplies none.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default capacity of the buffer placed in front of streamed log output.
///
/// One page, so a non-follow stream reaches the transport in page-sized
/// writes.
pub const DEFAULT_STREAM_BUFFER_BYTES: usize = 4096;

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format.
pub const fn default_log_format() -> crate::logging::LogFormat {
    crate::logging::LogFormat::Json
}

/// Default stream buffer capacity, for serde.
pub const fn default_stream_buffer_bytes() -> usize {
    DEFAULT_STREAM_BUFFER_BYTES
}
