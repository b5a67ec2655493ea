//! Class-weighted, L2-penalized logistic regression
//!
//! Minimizes the sample-weighted log-loss plus `||w||^2 / (2C)` (the intercept
//! is not penalized), averaged over the total sample weight. Fitting uses
//! Newton steps with a backtracking line search, which is insensitive to the
//! very different scales of deal size, premium and length.

use anyhow::Result;
use faer::linalg::solvers::SpSolver;
use faer::{Mat, Side};
use rayon::prelude::*;

use super::error::PrepareError;

/// Default inverse regularization strength
pub const DEFAULT_C: f64 = 1.0;
/// Default iteration cap
pub const DEFAULT_MAX_ITER: usize = 1000;
/// Default tolerance on the largest gradient component
pub const DEFAULT_TOL: f64 = 1e-4;

/// Armijo sufficient-decrease constant
const ARMIJO: f64 = 1e-4;
/// Maximum step halvings per iteration
const MAX_HALVINGS: usize = 50;

/// How training rows are weighted by class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassWeight {
    /// Every row weighs 1
    Uniform,
    /// Row weight `n / (2 * n_class)`, so both classes carry equal total weight
    Balanced,
}

/// Binary logistic regression classifier
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    /// Inverse regularization strength
    pub c: f64,
    pub max_iter: usize,
    pub tol: f64,
    pub class_weight: ClassWeight,
    coefficients: Option<Vec<f64>>,
    intercept: f64,
    class_weights: [f64; 2],
    n_iter: usize,
    converged: bool,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LogisticRegression {
    /// Balanced class weights, `C = 1`, 1000 iterations
    pub fn new() -> Self {
        Self {
            c: DEFAULT_C,
            max_iter: DEFAULT_MAX_ITER,
            tol: DEFAULT_TOL,
            class_weight: ClassWeight::Balanced,
            coefficients: None,
            intercept: 0.0,
            class_weights: [1.0, 1.0],
            n_iter: 0,
            converged: false,
        }
    }

    pub fn with_c(mut self, c: f64) -> Self {
        self.c = c;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    pub fn with_class_weight(mut self, class_weight: ClassWeight) -> Self {
        self.class_weight = class_weight;
        self
    }

    /// Fit on a dense design matrix and 0/1 labels
    pub fn fit(&mut self, x: &Mat<f64>, y: &[u8]) -> Result<&mut Self> {
        let n = x.nrows();
        let p = x.ncols();

        if n != y.len() {
            anyhow::bail!("Label count {} does not match row count {}", y.len(), n);
        }
        if n == 0 {
            return Err(PrepareError::EmptyTrainingSet.into());
        }

        let n_pos = y.iter().filter(|&&v| v == 1).count();
        if n_pos == 0 {
            return Err(PrepareError::SingleClass("Terminated").into());
        }
        if n_pos == n {
            return Err(PrepareError::SingleClass("Completed").into());
        }

        self.class_weights = match self.class_weight {
            ClassWeight::Uniform => [1.0, 1.0],
            ClassWeight::Balanced => [
                n as f64 / (2.0 * (n - n_pos) as f64),
                n as f64 / (2.0 * n_pos as f64),
            ],
        };

        let d = p + 1;
        let xa = Mat::from_fn(n, d, |i, j| if j < p { x[(i, j)] } else { 1.0 });
        let targets: Vec<f64> = y.iter().map(|&v| f64::from(v)).collect();
        let weights: Vec<f64> = y.iter().map(|&v| self.class_weights[v as usize]).collect();
        let total_weight: f64 = weights.iter().sum();

        let problem = Problem {
            xa: &xa,
            targets: &targets,
            weights: &weights,
            total_weight,
            penalty: 1.0 / self.c,
            n_coef: p,
        };

        let mut beta = vec![0.0; d];
        let mut n_iter = 0;
        let mut converged = false;

        while n_iter < self.max_iter {
            let z = problem.linear_predictor(&beta);
            let probs: Vec<f64> = z.par_iter().map(|&v| sigmoid(v)).collect();

            let grad = problem.gradient(&beta, &probs);
            if max_abs(&grad) < self.tol {
                converged = true;
                break;
            }

            let hessian = problem.hessian(&probs);
            let step = cholesky_solve(&hessian, &grad).ok_or(PrepareError::SingularSystem)?;

            let f0 = problem.objective(&beta, &z);
            let slope: f64 = grad.iter().zip(step.iter()).map(|(g, s)| g * s).sum();

            let mut t = 1.0;
            let mut accepted = None;
            for _ in 0..MAX_HALVINGS {
                let candidate: Vec<f64> = beta
                    .iter()
                    .zip(step.iter())
                    .map(|(b, s)| b - t * s)
                    .collect();
                let f = problem.objective(&candidate, &problem.linear_predictor(&candidate));
                if f <= f0 - ARMIJO * t * slope {
                    accepted = Some(candidate);
                    break;
                }
                t *= 0.5;
            }

            n_iter += 1;
            match accepted {
                Some(next) => beta = next,
                // No decrease possible at machine precision
                None => {
                    converged = max_abs(&grad) < self.tol;
                    break;
                }
            }
        }

        if !converged && n_iter >= self.max_iter {
            let z = problem.linear_predictor(&beta);
            let probs: Vec<f64> = z.par_iter().map(|&v| sigmoid(v)).collect();
            converged = max_abs(&problem.gradient(&beta, &probs)) < self.tol;
        }

        self.intercept = beta[p];
        beta.truncate(p);
        self.coefficients = Some(beta);
        self.n_iter = n_iter;
        self.converged = converged;

        Ok(self)
    }

    /// Probability of the positive (Completed) class for every row
    pub fn predict_proba(&self, x: &Mat<f64>) -> Result<Vec<f64>> {
        let coefficients = self.coefficients.as_ref().ok_or(PrepareError::NotFitted)?;

        if x.ncols() != coefficients.len() {
            anyhow::bail!(
                "Expected {} encoded features, got {}",
                coefficients.len(),
                x.ncols()
            );
        }

        let w = Mat::from_fn(coefficients.len(), 1, |i, _| coefficients[i]);
        let z = x * &w;

        Ok((0..x.nrows())
            .map(|i| sigmoid(z[(i, 0)] + self.intercept))
            .collect())
    }

    pub fn is_fitted(&self) -> bool {
        self.coefficients.is_some()
    }

    pub fn coefficients(&self) -> Option<&[f64]> {
        self.coefficients.as_deref()
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Row weights applied to (Terminated, Completed) during the last fit
    pub fn class_weights(&self) -> [f64; 2] {
        self.class_weights
    }

    /// Newton iterations taken by the last fit
    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    /// Whether the last fit met the gradient tolerance
    pub fn converged(&self) -> bool {
        self.converged
    }
}

/// Borrowed view of the optimization problem for one fit
struct Problem<'a> {
    /// Design matrix with a trailing column of ones for the intercept
    xa: &'a Mat<f64>,
    targets: &'a [f64],
    weights: &'a [f64],
    total_weight: f64,
    penalty: f64,
    /// Number of penalized coefficients (all but the intercept)
    n_coef: usize,
}

impl Problem<'_> {
    fn linear_predictor(&self, beta: &[f64]) -> Vec<f64> {
        let b = Mat::from_fn(beta.len(), 1, |i, _| beta[i]);
        let z = self.xa * &b;
        (0..z.nrows()).map(|i| z[(i, 0)]).collect()
    }

    fn objective(&self, beta: &[f64], z: &[f64]) -> f64 {
        let loss: f64 = z
            .iter()
            .zip(self.targets.iter())
            .zip(self.weights.iter())
            .map(|((&zi, &yi), &wi)| wi * (softplus(zi) - yi * zi))
            .sum();
        let ridge: f64 = beta[..self.n_coef].iter().map(|b| b * b).sum();
        (loss + 0.5 * self.penalty * ridge) / self.total_weight
    }

    fn gradient(&self, beta: &[f64], probs: &[f64]) -> Vec<f64> {
        let n = probs.len();
        let residual = Mat::from_fn(n, 1, |i, _| self.weights[i] * (probs[i] - self.targets[i]));
        let g = self.xa.transpose() * &residual;

        (0..beta.len())
            .map(|j| {
                let ridge = if j < self.n_coef {
                    self.penalty * beta[j]
                } else {
                    0.0
                };
                (g[(j, 0)] + ridge) / self.total_weight
            })
            .collect()
    }

    fn hessian(&self, probs: &[f64]) -> Mat<f64> {
        let n = self.xa.nrows();
        let d = self.xa.ncols();
        let scale: Vec<f64> = (0..n)
            .map(|i| (self.weights[i] * probs[i] * (1.0 - probs[i])).sqrt())
            .collect();
        let scaled = Mat::from_fn(n, d, |i, j| scale[i] * self.xa[(i, j)]);

        let mut h = scaled.transpose() * &scaled;
        for j in 0..d {
            if j < self.n_coef {
                h[(j, j)] += self.penalty;
            }
            for k in 0..d {
                h[(j, k)] /= self.total_weight;
            }
        }
        h
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// `ln(1 + e^z)` without overflow
fn softplus(z: f64) -> f64 {
    if z > 0.0 {
        z + (-z).exp().ln_1p()
    } else {
        z.exp().ln_1p()
    }
}

fn max_abs(v: &[f64]) -> f64 {
    v.iter().fold(0.0, |acc, x| acc.max(x.abs()))
}

/// Solve the symmetric positive-definite system `a x = b` by Cholesky
/// factorization. A tiny ridge is added once if the matrix is not numerically
/// positive definite.
fn cholesky_solve(a: &Mat<f64>, b: &[f64]) -> Option<Vec<f64>> {
    let n = a.nrows();
    if n != a.ncols() || n != b.len() {
        return None;
    }

    let llt = match a.cholesky(Side::Lower) {
        Ok(llt) => llt,
        Err(_) => {
            let ridge =
                1e-10 * (0..n).map(|i| a[(i, i)].abs()).sum::<f64>().max(1e-300) / n as f64;
            let mut reg = a.clone();
            for i in 0..n {
                reg[(i, i)] += ridge;
            }
            reg.cholesky(Side::Lower).ok()?
        }
    };

    let rhs = Mat::from_fn(n, 1, |i, _| b[i]);
    let x = llt.solve(rhs.as_ref());
    let solution: Vec<f64> = (0..n).map(|i| x[(i, 0)]).collect();

    solution.iter().all(|v| v.is_finite()).then_some(solution)
}
