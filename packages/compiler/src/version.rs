//! Version Information

/// Version of the compiler crate, embedded in tooling output.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
