//! Configuration for the pipeline module.

use serde::{Deserialize, Serialize};

/// Tuning knobs for a pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Capacity of the extract → encode handoff channel.
    /// `0` sizes it to the number of selected titles.
    #[serde(default)]
    pub handoff_capacity: usize,

    /// Maximum number of source units extracting at once. `0` is unlimited.
    #[serde(default)]
    pub max_concurrent_units: usize,
}

impl PipelineConfig {
    /// Channel capacity for a run over `total_titles` titles.
    pub fn effective_capacity(&self, total_titles: usize) -> usize {
        let capacity = if self.handoff_capacity == 0 {
            total_titles
        } else {
            self.handoff_capacity
        };
        capacity.max(1)
    }

    /// Unit concurrency limit, `None` when unlimited.
    pub fn unit_limit(&self) -> Option<usize> {
        (self.max_concurrent_units > 0).then_some(self.max_concurrent_units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_defaults_to_title_count() {
        let config = PipelineConfig::default();
        assert_eq!(config.effective_capacity(7), 7);
        assert_eq!(config.effective_capacity(0), 1);
    }

    #[test]
    fn test_explicit_capacity_wins() {
        let config = PipelineConfig {
            handoff_capacity: 1,
            ..Default::default()
        };
        assert_eq!(config.effective_capacity(7), 1);
    }

    #[test]
    fn test_unit_limit() {
        assert_eq!(PipelineConfig::default().unit_limit(), None);
        let config = PipelineConfig {
            max_concurrent_units: 2,
            ..Default::default()
        };
        assert_eq!(config.unit_limit(), Some(2));
    }
}
