//! Multi-tribe configuration.

use crate::error::{check_positive, check_range, ConfigError};
use crate::path::PathOrder;

/// How an agent chooses the point it steers toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    /// Steer straight for the goal.
    Direct,
    /// Steer for a point on the tribe's best path, further along for
    /// agents that run earlier in the iteration.
    Interpolated,
    /// Steer for a random later point on the tribe's best path.
    Random,
}

impl Role {
    fn slot(self) -> usize {
        match self {
            Role::Direct => 0,
            Role::Interpolated => 1,
            Role::Random => 2,
        }
    }
}

/// Parameters of a multi-tribe run.
///
/// # Examples
///
/// ```
/// use u_antpath::tribes::TribeConfig;
///
/// let config = TribeConfig::default().with_tribes(2).with_seed(9);
/// assert!(config.validate().is_ok());
/// assert!(TribeConfig::default().with_tribes(4).validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TribeConfig {
    /// Agents per tribe per iteration.
    pub ants: usize,

    /// Iteration budget.
    pub max_iterations: usize,

    /// Number of tribes, 1 to 3.
    pub tribes: usize,

    /// Local update rate toward `t0`.
    pub rho: f64,

    /// Initial pheromone and local update target.
    pub t0: f64,

    /// Exploitation threshold.
    pub q0: f64,

    /// Base `a` of the angle heuristic `a^cos θ`.
    pub angle_base: f64,

    /// `(alpha, beta)` per role: direct, interpolated, random.
    pub role_exponents: [(f64, f64); 3],

    /// Role of iteration `k` is `role_cycle[k % len]`.
    pub role_cycle: Vec<Role>,

    /// Length difference under which paths are ranked by turn count.
    pub tie_tolerance: f64,

    /// Random seed. `None` draws one at random.
    pub seed: Option<u64>,
}

impl Default for TribeConfig {
    fn default() -> Self {
        use Role::*;
        Self {
            ants: 7,
            max_iterations: 30,
            tribes: 3,
            rho: 0.8,
            t0: 1.0,
            q0: 0.7,
            angle_base: 10.0,
            role_exponents: [(4.0, 4.0), (2.0, 4.0), (2.0, 2.0)],
            role_cycle: vec![Direct, Interpolated, Direct, Direct, Random, Direct],
            tie_tolerance: PathOrder::DEFAULT_TOLERANCE,
            seed: None,
        }
    }
}

impl TribeConfig {
    pub const MAX_TRIBES: usize = 3;

    pub fn with_ants(mut self, n: usize) -> Self {
        self.ants = n;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_tribes(mut self, n: usize) -> Self {
        self.tribes = n;
        self
    }

    pub fn with_rho(mut self, rho: f64) -> Self {
        self.rho = rho;
        self
    }

    pub fn with_t0(mut self, t0: f64) -> Self {
        self.t0 = t0;
        self
    }

    pub fn with_q0(mut self, q0: f64) -> Self {
        self.q0 = q0;
        self
    }

    pub fn with_angle_base(mut self, a: f64) -> Self {
        self.angle_base = a;
        self
    }

    pub fn with_role_exponents(mut self, role: Role, alpha: f64, beta: f64) -> Self {
        self.role_exponents[role.slot()] = (alpha, beta);
        self
    }

    pub fn with_role_cycle(mut self, cycle: Vec<Role>) -> Self {
        self.role_cycle = cycle;
        self
    }

    pub fn with_tie_tolerance(mut self, eps: f64) -> Self {
        self.tie_tolerance = eps;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// `(alpha, beta)` used by `role`.
    pub fn exponents(&self, role: Role) -> (f64, f64) {
        self.role_exponents[role.slot()]
    }

    /// Role of the iteration numbered `number`.
    pub fn role_at(&self, number: usize) -> Role {
        self.role_cycle
            .get(number % self.role_cycle.len().max(1))
            .copied()
            .unwrap_or(Role::Direct)
    }

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
        if self.tribes == 0 {
            return Err(ConfigError::ZeroCount("tribes"));
        }
        if self.tribes > Self::MAX_TRIBES {
            return Err(ConfigError::out_of_range(
                "tribes",
                self.tribes as f64,
                "between 1 and 3",
            ));
        }
        if self.role_cycle.is_empty() {
            return Err(ConfigError::ZeroCount("role_cycle"));
        }
        if !(self.rho > 0.0 && self.rho < 1.0) {
            return Err(ConfigError::out_of_range("rho", self.rho, "in (0, 1)"));
        }
        check_positive("t0", self.t0)?;
        check_range("q0", self.q0, 0.0, 1.0, "in [0, 1]")?;
        check_positive("angle_base", self.angle_base)?;
        for &(alpha, beta) in &self.role_exponents {
            check_range("alpha", alpha, 0.0, f64::MAX, "non-negative")?;
            check_range("beta", beta, 0.0, f64::MAX, "non-negative")?;
        }
        check_range("tie_tolerance", self.tie_tolerance, 0.0, f64::MAX, "non-negative")?;
        Ok(())
    }
}
