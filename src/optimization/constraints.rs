//! optimization::constraints — penalty-based constraint composition.
//!
//! Purpose
//! -------
//! Turn a constrained log-likelihood into a continuous surrogate that an
//! unconstrained optimizer can search. Each constraint inspects a candidate
//! parameter vector and either accepts it or returns a non-negative penalty
//! together with a feasible substitute.
//!
//! Key behaviors
//! -------------
//! - [`ConstraintSet::apply`] runs constraints in declared order; the
//!   substitute returned by constraint *i* is the candidate handed to
//!   constraint *i + 1*, and penalties are summed.
//! - The effective objective is `ℓ(β′) − Σ penalty`, where `β′` is the last
//!   substitute. When the summed penalty is exactly zero the original `β` is
//!   evaluated (see [`Penalized::evaluation_point`]).
//! - Penalties and substitutes are validated on every call; an unusable
//!   answer (negative or non-finite penalty, non-finite or wrongly sized
//!   substitute) is reported as [`OptError::InvalidConstraint`].
//!
//! Conventions
//! -----------
//! - Constraints work in log-likelihood units: the penalty is *subtracted*
//!   from `ℓ`, which the optimizer adapter then negates into a cost.
//! - Closures `Fn(&Theta) -> ConstraintCheck` are constraints, so ad-hoc
//!   bounds do not need a named type.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::types::Theta,
};

/// Answer of a single constraint for one candidate vector.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintCheck {
    /// Candidate is feasible; no penalty, no substitute.
    Satisfied,
    /// Candidate is infeasible. `penalty` grows with the distance to the
    /// feasible region and `substitute` is a nearby feasible vector whose
    /// own penalty is zero.
    Violated { penalty: f64, substitute: Theta },
}

/// A single parameter constraint.
pub trait Constraint: Send + Sync {
    fn check(&self, theta: &Theta) -> ConstraintCheck;
}

impl<F> Constraint for F
where
    F: Fn(&Theta) -> ConstraintCheck + Send + Sync,
{
    fn check(&self, theta: &Theta) -> ConstraintCheck {
        self(theta)
    }
}

/// `θ[index] > limit`, enforced with a margin.
///
/// When `θ[index] ≤ limit` the penalty is `limit − θ[index] + tolerance` and
/// the substitute moves the coordinate to `limit + tolerance`, leaving the
/// other coordinates untouched. The penalty is the distance to the
/// substitute, so it is strictly positive on the boundary itself as long as
/// `tolerance > 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LowerBound {
    pub index: usize,
    pub limit: f64,
    pub tolerance: f64,
}

impl LowerBound {
    pub fn new(index: usize, limit: f64, tolerance: f64) -> Self {
        Self { index, limit, tolerance }
    }
}

impl Constraint for LowerBound {
    fn check(&self, theta: &Theta) -> ConstraintCheck {
        match theta.get(self.index) {
            Some(&value) if value > self.limit => ConstraintCheck::Satisfied,
            Some(&value) => {
                let mut substitute = theta.clone();
                substitute[self.index] = self.limit + self.tolerance;
                let penalty = (self.limit - value) + self.tolerance;
                ConstraintCheck::Violated { penalty, substitute }
            }
            // A bound on a coordinate that does not exist cannot be repaired;
            // surface it through substitute validation.
            None => ConstraintCheck::Violated { penalty: 0.0, substitute: Theta::zeros(0) },
        }
    }
}

/// Result of running every constraint on one candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct Penalized {
    /// Feasible replacement, present only when the summed penalty is positive.
    pub point: Option<Theta>,
    /// Sum of all penalties, `≥ 0`.
    pub penalty: f64,
}

impl Penalized {
    /// Vector the log-likelihood should be evaluated at.
    pub fn evaluation_point<'a>(&'a self, theta: &'a Theta) -> &'a Theta {
        self.point.as_ref().unwrap_or(theta)
    }

    pub fn is_binding(&self) -> bool {
        self.point.is_some()
    }
}

/// Ordered, dynamically sized list of constraints.
#[derive(Default)]
pub struct ConstraintSet {
    constraints: Vec<Box<dyn Constraint>>,
}

impl ConstraintSet {
    pub const fn new() -> Self {
        Self { constraints: Vec::new() }
    }

    pub fn with<C: Constraint + 'static>(mut self, constraint: C) -> Self {
        self.push(constraint);
        self
    }

    pub fn push<C: Constraint + 'static>(&mut self, constraint: C) {
        self.constraints.push(Box::new(constraint));
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Run all constraints on `theta` and compose their answers.
    ///
    /// # Errors
    /// - [`OptError::InvalidConstraint`] when a constraint reports a negative
    ///   or non-finite penalty, or a substitute that is non-finite or has a
    ///   different length than `theta`.
    pub fn apply(&self, theta: &Theta) -> OptResult<Penalized> {
        let mut candidate: Option<Theta> = None;
        let mut total = 0.0;
        for (index, constraint) in self.constraints.iter().enumerate() {
            let current = candidate.as_ref().unwrap_or(theta);
            match constraint.check(current) {
                ConstraintCheck::Satisfied => {}
                ConstraintCheck::Violated { penalty, substitute } => {
                    validate_answer(index, penalty, &substitute, theta.len())?;
                    total += penalty;
                    candidate = Some(substitute);
                }
            }
        }
        if total == 0.0 {
            return Ok(Penalized { point: None, penalty: 0.0 });
        }
        Ok(Penalized { point: candidate, penalty: total })
    }
}

impl std::fmt::Debug for ConstraintSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstraintSet").field("len", &self.constraints.len()).finish()
    }
}

/// Shared empty set for models without constraints.
pub static NO_CONSTRAINTS: ConstraintSet = ConstraintSet::new();

fn validate_answer(index: usize, penalty: f64, substitute: &Theta, dim: usize) -> OptResult<()> {
    if !penalty.is_finite() {
        return Err(OptError::InvalidConstraint { index, reason: "penalty must be finite" });
    }
    if penalty < 0.0 {
        return Err(OptError::InvalidConstraint { index, reason: "penalty must be non-negative" });
    }
    if substitute.len() != dim {
        return Err(OptError::InvalidConstraint {
            index,
            reason: "substitute length differs from the parameter vector",
        });
    }
    if substitute.iter().any(|v| !v.is_finite()) {
        return Err(OptError::InvalidConstraint { index, reason: "substitute must be finite" });
    }
    Ok(())
}
