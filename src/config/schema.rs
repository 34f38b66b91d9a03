//! Configuration schema definitions.

/// Default buffer capacity when no size spec is given on the command line.
pub const DEFAULT_SIZE_SPEC: &str = "4KiB";

/// Runtime configuration for one relay instance.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Initial buffer capacity in bytes.
    pub capacity: u64,

    /// Line-buffered mode: flush each time this delimiter is buffered.
    /// `None` means plain fill-triggered buffering.
    pub line_delimiter: Option<u8>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            capacity: 4096,
            line_delimiter: None,
        }
    }
}
