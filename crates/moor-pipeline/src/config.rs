use std::time::Duration;

use moor_types::HashWidth;

/// Configuration for an anchoring run.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Number of linked anchors fanned out after the root is included.
    pub fanout: usize,
    /// Hash width for every derived identifier.
    pub width: HashWidth,
    /// Schema descriptor hashed with the ledger timestamp into the root
    /// hash. The timestamp makes each run's root unique.
    pub schema: String,
    /// Base string for per-item links; item `i` anchors
    /// `"{link_base}/{timestamp}/{i}"`.
    pub link_base: String,
    /// How long the process waits after completion so in-flight
    /// finalization can land before the connection goes away.
    pub grace: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fanout: 10_000,
            width: HashWidth::W256,
            schema: "{ name, company }".into(),
            link_base: "https://moor-ledger.org/anchor".into(),
            grace: Duration::from_secs(30),
        }
    }
}
