use dg_core::{DgError, ErrorInfo};
use serde::{Deserialize, Serialize};

/// Options controlling how connection and curvature cells are evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineOpts {
    /// Worker threads used for independent output cells. `1` runs inline.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Re-normalize every curvature entry after construction.
    #[serde(default = "default_simplify")]
    pub simplify_curvature: bool,
}

fn default_concurrency() -> usize {
    1
}

fn default_simplify() -> bool {
    true
}

impl Default for EngineOpts {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            simplify_curvature: default_simplify(),
        }
    }
}

impl EngineOpts {
    /// Options evaluating on `threads` workers.
    pub fn with_concurrency(threads: usize) -> Self {
        Self {
            concurrency: threads,
            ..Self::default()
        }
    }

    /// Checks that the options describe a runnable configuration.
    pub fn validate(&self) -> Result<(), DgError> {
        if self.concurrency == 0 {
            return Err(DgError::Config(
                ErrorInfo::new("invalid-concurrency", "concurrency must be at least 1")
                    .with_context("concurrency", self.concurrency),
            ));
        }
        Ok(())
    }
}
