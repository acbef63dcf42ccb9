//! Piecewise-linear interpolation over a strictly increasing domain.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when constructing an [`Interpolation`].
#[derive(Debug, Error, PartialEq)]
pub enum InterpolationError {
    #[error("Interpolation needs at least 2 domain points, got {0}")]
    DomainTooShort(usize),

    #[error("Domain has {0} points but range has {1}")]
    LengthMismatch(usize, usize),

    #[error("Domain is not strictly increasing at index {0}")]
    NotIncreasing(usize),

    #[error("Non-finite value at index {0}")]
    NonFinite(usize),
}

/// Behavior outside the domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extrapolate {
    /// Hold the value at the nearest domain endpoint.
    #[default]
    Clamp,
    /// Continue the slope of the outermost segment.
    Extend,
}

/// A piecewise-linear function defined by `(input, output)` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interpolation {
    input: Vec<f64>,
    output: Vec<f64>,
    extrapolate: Extrapolate,
}

impl Interpolation {
    /// Build a function from matching domain and range sequences.
    pub fn new(
        input: Vec<f64>,
        output: Vec<f64>,
        extrapolate: Extrapolate,
    ) -> Result<Self, InterpolationError> {
        if input.len() < 2 {
            return Err(InterpolationError::DomainTooShort(input.len()));
        }
        if input.len() != output.len() {
            return Err(InterpolationError::LengthMismatch(input.len(), output.len()));
        }
        if let Some(i) = input
            .iter()
            .zip(&output)
            .position(|(x, y)| !x.is_finite() || !y.is_finite())
        {
            return Err(InterpolationError::NonFinite(i));
        }
        if let Some(i) = input.windows(2).position(|w| w[1] <= w[0]) {
            return Err(InterpolationError::NotIncreasing(i + 1));
        }

        Ok(Self {
            input,
            output,
            extrapolate,
        })
    }

    /// Clamping function through the given points.
    pub fn clamped(input: Vec<f64>, output: Vec<f64>) -> Result<Self, InterpolationError> {
        Self::new(input, output, Extrapolate::Clamp)
    }

    /// Domain points in ascending order.
    pub fn input(&self) -> &[f64] {
        &self.input
    }

    /// Output value for each domain point.
    pub fn output(&self) -> &[f64] {
        &self.output
    }

    /// Evaluate the function at `x`.
    ///
    /// NaN evaluates as `x = 0`, the first page.
    pub fn eval(&self, x: f64) -> f64 {
        let last = self.input.len() - 1;
        let x = if x.is_nan() { 0.0 } else { x };

        // Index of the segment [i, i + 1] that covers x (or the outermost one).
        let segment = self.input.partition_point(|&p| p <= x).clamp(1, last) - 1;

        if self.extrapolate == Extrapolate::Clamp {
            if x <= self.input[0] {
                return self.output[0];
            }
            if x >= self.input[last] {
                return self.output[last];
            }
        }

        let (x0, x1) = (self.input[segment], self.input[segment + 1]);
        let (y0, y1) = (self.output[segment], self.output[segment + 1]);
        y0 + (x - x0) * (y1 - y0) / (x1 - x0)
    }
}
