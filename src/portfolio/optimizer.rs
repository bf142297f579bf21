//! # Weight Optimizer
//!
//! $$
//! \max_{\mathbf{w}}\ \mu^\top\mathbf{w}
//! \quad\text{s.t.}\quad \textstyle\sum_i w_i = 1,\ 0 \le w_i \le 1
//! $$
//!
//! Linear expected-return maximization over the long-only simplex. The
//! objective is linear in the weights, so the optimum sits at a simplex
//! vertex: all weight on the highest-mean asset, modulo solver tolerance.
//! Portfolio variance is reported by [`evaluate`] but does not enter the
//! objective.
//!
//! The simplex constraints are enforced by construction: the solver works
//! on an unconstrained parameter vector mapped onto the simplex by
//! softmax, and starts at the zero vector, i.e. the uniform 1/N portfolio.

use argmin::core::CostFunction;
use argmin::core::Executor;
use argmin::core::TerminationReason;
use argmin::core::TerminationStatus;
use argmin::solver::neldermead::NelderMead;
use ndarray::Array1;
use ndarray::Array2;
use ndarray::array;

use crate::error::Error;
use crate::error::Result;
use crate::portfolio::types::OptimizerConfig;

fn softmax(x: &[f64]) -> Vec<f64> {
  if x.is_empty() {
    return Vec::new();
  }

  let max_x = x.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
  let exps: Vec<f64> = x.iter().map(|&v| (v - max_x).exp()).collect();
  let sum: f64 = exps.iter().sum();

  if sum < 1e-15 {
    vec![1.0 / x.len() as f64; x.len()]
  } else {
    exps.iter().map(|&e| e / sum).collect()
  }
}

struct LinearReturnCost {
  mu: Array1<f64>,
}

impl CostFunction for LinearReturnCost {
  type Param = Vec<f64>;
  type Output = f64;

  fn cost(&self, x: &Self::Param) -> std::result::Result<Self::Output, argmin::core::Error> {
    let w = softmax(x);
    let port_ret: f64 = w.iter().zip(self.mu.iter()).map(|(wi, mi)| wi * mi).sum();

    Ok(-port_ret)
  }
}

/// Maximize expected return over the long-only, fully invested simplex.
///
/// Single attempt: any termination other than convergence within
/// `config.sd_tolerance` is an [`Error::Optimization`] carrying the
/// solver's termination status, never a fallback weight vector. The
/// returned weights are clipped to [0,1] and renormalized, so they sum to
/// 1 within 1e-6.
pub fn optimize(
  mu: &Array1<f64>,
  cov: &Array2<f64>,
  config: &OptimizerConfig,
) -> Result<Array1<f64>> {
  let n = mu.len();
  assert_eq!(cov.dim(), (n, n), "covariance must be N x N");

  if n == 0 {
    return Err(Error::DataUnavailable {
      ticker: "*".to_string(),
      reason: "empty asset universe".to_string(),
    });
  }

  if n == 1 {
    return Ok(array![1.0]);
  }

  let x0 = vec![0.0; n];
  let mut simplex = Vec::with_capacity(n + 1);
  simplex.push(x0);
  for i in 0..n {
    let mut point = vec![0.0; n];
    point[i] = 1.0;
    simplex.push(point);
  }

  let cost = LinearReturnCost { mu: mu.clone() };
  let solver = NelderMead::new(simplex)
    .with_sd_tolerance(config.sd_tolerance)
    .map_err(|err| Error::Optimization {
      status: err.to_string(),
    })?;

  let result = Executor::new(cost, solver)
    .configure(|state| state.max_iters(config.max_iters))
    .run()
    .map_err(|err| Error::Optimization {
      status: err.to_string(),
    })?;

  match &result.state.termination_status {
    TerminationStatus::Terminated(
      TerminationReason::SolverConverged | TerminationReason::TargetCostReached,
    ) => {}
    other => {
      return Err(Error::Optimization {
        status: format!("{other:?}"),
      });
    }
  }

  let best_x = result.state.best_param.ok_or_else(|| Error::Optimization {
    status: "solver returned no parameter".to_string(),
  })?;

  let mut w = softmax(&best_x);
  for wi in w.iter_mut() {
    *wi = wi.clamp(0.0, 1.0);
  }

  let total: f64 = w.iter().sum();
  if !total.is_finite() || total <= 0.0 {
    return Err(Error::Optimization {
      status: format!("degenerate weight mass {total}"),
    });
  }
  for wi in w.iter_mut() {
    *wi /= total;
  }

  Ok(Array1::from_vec(w))
}

/// Expected return and volatility of a weight vector: `μᵀw` and
/// `sqrt(wᵀΣw)`, the variance floored at zero before the root.
pub fn evaluate(weights: &Array1<f64>, mu: &Array1<f64>, cov: &Array2<f64>) -> (f64, f64) {
  let expected_return = weights.dot(mu);
  let variance = weights.dot(&cov.dot(weights));

  (expected_return, variance.max(0.0).sqrt())
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;
  use ndarray::array;

  use super::*;

  fn two_asset_inputs() -> (Array1<f64>, Array2<f64>) {
    let mu = array![0.01, 0.02];
    let cov = array![[0.0004, 0.0001], [0.0001, 0.0009]];
    (mu, cov)
  }

  #[test]
  fn concentrates_on_highest_mean_asset() {
    let (mu, cov) = two_asset_inputs();

    let w = optimize(&mu, &cov, &OptimizerConfig::default()).unwrap();
    let (expected_return, volatility) = evaluate(&w, &mu, &cov);

    assert!((w[1] - 1.0).abs() < 1e-3);
    assert_abs_diff_eq!(expected_return, 0.02, epsilon = 1e-4);
    assert_abs_diff_eq!(volatility, 0.03, epsilon = 1e-4);
  }

  #[test]
  fn weights_stay_on_the_simplex() {
    let mu = array![0.05, 0.049, 0.048, 0.01];
    let cov = Array2::eye(4) * 0.01;

    let w = optimize(&mu, &cov, &OptimizerConfig::default()).unwrap();

    let sum: f64 = w.sum();
    assert!((sum - 1.0).abs() < 1e-6);
    for &wi in w.iter() {
      assert!((0.0..=1.0).contains(&wi));
    }
  }

  #[test]
  fn single_asset_takes_full_weight() {
    let mu = array![0.015];
    let cov = array![[0.0025]];

    let w = optimize(&mu, &cov, &OptimizerConfig::default()).unwrap();
    let (expected_return, volatility) = evaluate(&w, &mu, &cov);

    assert_eq!(w[0], 1.0);
    assert_abs_diff_eq!(expected_return, 0.015, epsilon = 1e-12);
    assert_abs_diff_eq!(volatility, 0.05, epsilon = 1e-12);
  }

  #[test]
  fn solve_is_deterministic() {
    let (mu, cov) = two_asset_inputs();

    let first = optimize(&mu, &cov, &OptimizerConfig::default()).unwrap();
    let second = optimize(&mu, &cov, &OptimizerConfig::default()).unwrap();

    assert_eq!(first, second);
  }

  #[test]
  fn exhausted_iteration_budget_is_an_error() {
    let (mu, cov) = two_asset_inputs();
    let config = OptimizerConfig {
      max_iters: 1,
      ..OptimizerConfig::default()
    };

    let result = optimize(&mu, &cov, &config);
    assert!(matches!(result, Err(Error::Optimization { .. })));
  }

  #[test]
  fn evaluate_matches_hand_computation() {
    let (mu, cov) = two_asset_inputs();
    let w = array![0.5, 0.5];

    let (expected_return, volatility) = evaluate(&w, &mu, &cov);

    assert_abs_diff_eq!(expected_return, 0.015, epsilon = 1e-12);
    // wᵀΣw = 0.25 * (0.0004 + 2 * 0.0001 + 0.0009)
    assert_abs_diff_eq!(volatility, (0.25_f64 * 0.0015).sqrt(), epsilon = 1e-12);
  }
}
