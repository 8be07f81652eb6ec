//! Version command for gitter-stream.

/// The current version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn version_string() -> String {
    format!("gitter-stream {}", VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_not_empty() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_version_string() {
        assert!(version_string().starts_with("gitter-stream "));
        assert!(version_string().ends_with(VERSION));
    }
}
