use serde::{Deserialize, Serialize};

/// Tuning for a single solve run.
///
/// Every field has a default, so a partial (or empty) JSON object is a valid config.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Hard cap on solve loop transitions. Derived from the grid size when unset.
    pub max_iterations: Option<usize>,
    /// Transitions allowed per grid cell when `max_iterations` is unset
    pub iterations_per_cell: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: None,
            iterations_per_cell: 4,
        }
    }
}

impl SolverConfig {
    pub fn iteration_limit(&self, width: usize, height: usize) -> usize {
        self.max_iterations.unwrap_or_else(|| {
            width
                .saturating_mul(height)
                .saturating_mul(self.iterations_per_cell)
                .saturating_add(1)
        })
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_limit_scales_with_grid() {
        let config = SolverConfig::default();
        assert_eq!(config.iteration_limit(10, 5), 201);

        let config = SolverConfig {
            max_iterations: Some(7),
            ..Default::default()
        };
        assert_eq!(config.iteration_limit(10, 5), 7);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SolverConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SolverConfig::default());

        let config: SolverConfig = serde_json::from_str(r#"{"max_iterations": 12}"#).unwrap();
        assert_eq!(config.max_iterations, Some(12));
        assert_eq!(config.iterations_per_cell, 4);
    }
}
