//! Compile-time build information.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// `tickrate <version> (<date>, <commit>)`
pub fn version_line() -> String {
    format!(
        "tickrate {} ({}, {})",
        env!("CARGO_PKG_VERSION"),
        BUILD_DATE,
        BUILD_COMMIT
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_commit_format() {
        // 7 chars or "unknown"
        assert!(BUILD_COMMIT == "unknown" || BUILD_COMMIT.len() == 7);
    }

    #[test]
    fn test_version_line() {
        let line = version_line();
        assert!(line.starts_with("tickrate "));
        assert!(line.contains(BUILD_DATE));
    }
}
