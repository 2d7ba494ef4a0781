//! CLI configuration.

/// Defaults for the `campaign` binary; command line flags override them.
#[derive(Debug, Clone)]
pub struct Config {
    /// Tracing filter used when `RUST_LOG` is not set.
    pub log_filter: String,

    /// Emit JSON lines instead of text.
    pub json: bool,

    /// Number of turns the demo computation plans.
    pub steps: u32,

    /// Simulated work per turn (milliseconds).
    pub step_ms: u64,

    /// Confirm cancellation without prompting.
    pub auto_confirm: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: "campaign=info,campaign_runner=info,campaign_session=info".to_string(),
            json: false,
            steps: 20,
            step_ms: 200,
            auto_confirm: false,
        }
    }
}
