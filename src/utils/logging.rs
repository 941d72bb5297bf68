// ============================================================================
// Logging
// Optional tracing subscriber for binaries and tests using this crate
// ============================================================================

/// Install a plain `fmt` subscriber at `level`.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_logging(level: tracing::Level) -> bool {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_rejected() {
        let _ = init_logging(tracing::Level::DEBUG);
        assert!(!init_logging(tracing::Level::INFO));
    }
}
