//! Process-wide tracing setup shared by the shiptrack binaries.

/// Initialize structured logging for the process.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Subscriber configuration (filters, JSON formatting).
pub mod tracing;
