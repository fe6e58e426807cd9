//! Colony configuration.
//!
//! [`ColonyConfig`] holds the parameters shared by every single-colony
//! variant. Variant-specific parameters live on the policy structs in
//! [`crate::variants`].

use crate::error::{check_positive, check_range, ConfigError};
use crate::path::PathOrder;

/// Parameters of a single-colony run.
///
/// # Presets
///
/// Each variant has a preset reproducing its published defaults:
///
/// ```
/// use u_antpath::colony::ColonyConfig;
///
/// let config = ColonyConfig::acs().with_ants(20).with_seed(7);
/// assert_eq!(config.max_iterations, 30);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColonyConfig {
    /// Agents per iteration (`m`). Wider exploration per iteration.
    pub ants: usize,

    /// Iteration budget (`nc`). The only termination condition, and the
    /// denominator of every adaptive schedule.
    pub max_iterations: usize,

    /// Pheromone exponent.
    pub alpha: f64,

    /// Heuristic exponent.
    pub beta: f64,

    /// Evaporation rate in (0, 1). ACS-style variants use it for the local
    /// update.
    pub rho: f64,

    /// Exploitation threshold of the pseudo-random-proportional rule.
    ///
    /// Variants with a q0 schedule use this as the schedule's base value.
    pub q0: f64,

    /// Initial pheromone strength.
    pub t0: f64,

    /// Deposit scale `Q`.
    pub deposit: f64,

    /// Length difference under which two paths are ranked by turn count.
    pub tie_tolerance: f64,

    /// Construct independent tours concurrently when the policy allows it.
    /// Requires the `parallel` feature; ignored otherwise.
    pub parallel: bool,

    /// Random seed for reproducibility. `None` draws one at random.
    pub seed: Option<u64>,
}

impl Default for ColonyConfig {
    fn default() -> Self {
        Self::ant_system()
    }
}

impl ColonyConfig {
    /// Ant System defaults.
    pub fn ant_system() -> Self {
        Self {
            ants: 20,
            max_iterations: 100,
            alpha: 1.0,
            beta: 0.2,
            rho: 0.5,
            q0: 0.0,
            t0: 10.0,
            deposit: 300.0,
            tie_tolerance: PathOrder::DEFAULT_TOLERANCE,
            parallel: false,
            seed: None,
        }
    }

    /// Ant Colony System defaults. `rho` is the local update rate.
    pub fn acs() -> Self {
        Self {
            ants: 50,
            max_iterations: 30,
            rho: 0.1,
            q0: 0.3,
            t0: 1.0 / 800.0,
            deposit: 1.0,
            ..Self::ant_system()
        }
    }

    /// Modified adaptive ACO defaults. `q0` is the initial threshold.
    pub fn maaco() -> Self {
        Self {
            ants: 50,
            max_iterations: 100,
            beta: 7.0,
            rho: 0.2,
            q0: 0.5,
            t0: 1.0,
            deposit: 2.5,
            ..Self::ant_system()
        }
    }

    /// Multi-strategy adaptable ACO defaults.
    pub fn ihmaco() -> Self {
        Self {
            ants: 50,
            max_iterations: 30,
            beta: 7.0,
            rho: 0.2,
            q0: 0.1,
            t0: 1.0,
            deposit: 2.5,
            ..Self::ant_system()
        }
    }

    /// Improved adaptive ACO defaults. Initial pheromone equals the
    /// deposit scale.
    pub fn iaaco() -> Self {
        Self {
            ants: 50,
            max_iterations: 30,
            beta: 7.0,
            rho: 0.5,
            q0: 0.15,
            t0: 2.5,
            deposit: 2.5,
            ..Self::ant_system()
        }
    }

    pub fn with_ants(mut self, n: usize) -> Self {
        self.ants = n;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    pub fn with_rho(mut self, rho: f64) -> Self {
        self.rho = rho;
        self
    }

    pub fn with_q0(mut self, q0: f64) -> Self {
        self.q0 = q0;
        self
    }

    pub fn with_t0(mut self, t0: f64) -> Self {
        self.t0 = t0;
        self
    }

    pub fn with_deposit(mut self, q: f64) -> Self {
        self.deposit = q;
        self
    }

    pub fn with_tie_tolerance(mut self, eps: f64) -> Self {
        self.tie_tolerance = eps;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Comparator configured with this run's tie tolerance.
    pub fn path_order(&self) -> PathOrder {
        PathOrder::new(self.tie_tolerance)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ants == 0 {
            return Err(ConfigError::ZeroCount("ants"));
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::ZeroCount("max_iterations"));
        }
        check_range("alpha", self.alpha, 0.0, f64::MAX, "non-negative")?;
        check_range("beta", self.beta, 0.0, f64::MAX, "non-negative")?;
        if !(self.rho > 0.0 && self.rho < 1.0) {
            return Err(ConfigError::out_of_range("rho", self.rho, "in (0, 1)"));
        }
        check_range("q0", self.q0, 0.0, 1.0, "in [0, 1]")?;
        check_positive("t0", self.t0)?;
        check_positive("deposit", self.deposit)?;
        check_range("tie_tolerance", self.tie_tolerance, 0.0, f64::MAX, "non-negative")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        for config in [
            ColonyConfig::ant_system(),
            ColonyConfig::acs(),
            ColonyConfig::maaco(),
            ColonyConfig::ihmaco(),
            ColonyConfig::iaaco(),
        ] {
            assert!(config.validate().is_ok(), "{config:?}");
        }
    }

    #[test]
    fn test_default_is_ant_system() {
        let config = ColonyConfig::default();
        assert_eq!(config.ants, 20);
        assert_eq!(config.max_iterations, 100);
        assert!((config.deposit - 300.0).abs() < 1e-12);
        assert!((config.tie_tolerance - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_builder() {
        let config = ColonyConfig::maaco()
            .with_ants(10)
            .with_max_iterations(5)
            .with_alpha(2.0)
            .with_tie_tolerance(0.0)
            .with_seed(3);
        assert_eq!(config.ants, 10);
        assert_eq!(config.max_iterations, 5);
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.path_order().tolerance(), 0.0);
    }

    #[test]
    fn test_validate_rejects() {
        assert_eq!(
            ColonyConfig::default().with_ants(0).validate(),
            Err(ConfigError::ZeroCount("ants"))
        );
        assert_eq!(
            ColonyConfig::default().with_max_iterations(0).validate(),
            Err(ConfigError::ZeroCount("max_iterations"))
        );
        assert!(ColonyConfig::default().with_rho(0.0).validate().is_err());
        assert!(ColonyConfig::default().with_rho(1.0).validate().is_err());
        assert!(ColonyConfig::default().with_q0(1.5).validate().is_err());
        assert!(ColonyConfig::default().with_t0(0.0).validate().is_err());
        assert!(ColonyConfig::default().with_deposit(-1.0).validate().is_err());
        assert!(ColonyConfig::default().with_beta(f64::NAN).validate().is_err());
        assert!(ColonyConfig::default().with_tie_tolerance(-0.1).validate().is_err());
    }
}
