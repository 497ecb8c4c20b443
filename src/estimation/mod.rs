//! estimation — models, datasets, and the maximum-likelihood driver.
//!
//! Purpose
//! -------
//! Sit between concrete statistical models and the optimizer: describe what
//! a model offers ([`Model`], [`Inventory`]), hold the data it is fitted on
//! ([`Dataset`]), run the fit ([`maximum_likelihood`]), and report the
//! outcome ([`Estimate`]).
//!
//! Key behaviors
//! -------------
//! - A caller passes a requested [`Inventory`]; the estimate is populated
//!   with `requested ∧ supported` and nothing else.
//! - Likelihood models get the numerical driver for free through the
//!   default [`Model::estimate`]; closed-form models override it and reuse
//!   [`driver::assemble`] for the shared outputs.
//! - Each call builds its own optimizer adapter and model context; calls on
//!   different threads do not interact.
//!
//! Downstream usage
//! ----------------
//! ```no_run
//! use constrained_mle::estimation::{Dataset, Inventory, Model};
//! use constrained_mle::models::Probit;
//! use constrained_mle::optimization::loglik_optimizer::EstimationParams;
//! use ndarray::array;
//!
//! let data = Dataset::new(array![[0.0, 1.0, -0.3], [1.0, 1.0, 0.8], [0.0, 1.0, 0.1]])?;
//! let est = Probit.estimate(&data, Inventory::all(), &EstimationParams::default())?;
//! println!("{:?} converged={}", est.parameters(), est.converged());
//! # Ok::<(), constrained_mle::optimization::errors::OptError>(())
//! ```

pub mod dataset;
pub mod driver;
pub mod estimate;
pub mod inventory;
pub mod model;

pub use self::dataset::Dataset;
pub use self::driver::{assemble, maximum_likelihood};
pub use self::estimate::{CovarianceStatus, Estimate, EstimateStatus};
pub use self::inventory::Inventory;
pub use self::model::{MAX_MODEL_NAME_LEN, Model, ParameterCount, Sampler};

pub mod prelude {
    pub use super::dataset::Dataset;
    pub use super::driver::maximum_likelihood;
    pub use super::estimate::Estimate;
    pub use super::inventory::Inventory;
    pub use super::model::{Model, Sampler};
}
