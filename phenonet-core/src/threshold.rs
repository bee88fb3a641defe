//! Threshold sets and parsing of user-supplied cutoffs.

use serde::{Deserialize, Serialize};

use crate::error::ThresholdError;
use crate::types::Direction;

/// Whether edges carry one ancestry's p-value or two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    Single,
    Comparison,
}

/// Cutoffs for one filter pass. Never mutated; build a new one per change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSet {
    /// Edges need `pvalue < p_max`.
    pub p_max: f64,
    /// In comparison mode, edges also need `pvalue2 < p_max2`.
    pub p_max2: Option<f64>,
    /// Edges need `weight > beta_min`.
    pub beta_min: f64,
    /// `Neutral` disables the direction predicate.
    pub direction: Direction,
}

impl Default for ThresholdSet {
    fn default() -> Self {
        Self {
            p_max: 1e-4,
            p_max2: None,
            beta_min: 0.0,
            direction: Direction::Neutral,
        }
    }
}

impl ThresholdSet {
    pub fn with_p_max(self, p_max: f64) -> Self {
        Self { p_max, ..self }
    }

    pub fn with_p_max2(self, p_max2: Option<f64>) -> Self {
        Self { p_max2, ..self }
    }

    pub fn with_beta_min(self, beta_min: f64) -> Self {
        Self { beta_min, ..self }
    }

    pub fn with_direction(self, direction: Direction) -> Self {
        Self { direction, ..self }
    }

    /// Build from raw text input as typed on the command line.
    pub fn parse(
        pvalue: &str,
        pvalue2: Option<&str>,
        beta: &str,
        direction: &str,
    ) -> Result<Self, ThresholdError> {
        Ok(Self {
            p_max: parse_pvalue_cutoff(pvalue)?,
            p_max2: pvalue2.map(parse_pvalue_cutoff).transpose()?,
            beta_min: parse_beta_cutoff(beta)?,
            direction: parse_direction(direction)?,
        })
    }
}

/// Parse a p-value cutoff.
///
/// A bare non-positive number is a base-10 exponent (`-4` → 1e-4). Anything
/// else must be a literal in (0, 1] such as `1e-04` or `0.05`.
pub fn parse_pvalue_cutoff(raw: &str) -> Result<f64, ThresholdError> {
    let trimmed = raw.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| ThresholdError::PValue(raw.to_string()))?;
    if !value.is_finite() {
        return Err(ThresholdError::PValue(raw.to_string()));
    }
    let literal = trimmed.contains(['e', 'E']) || value > 0.0;
    if literal {
        if value > 0.0 && value <= 1.0 {
            Ok(value)
        } else {
            Err(ThresholdError::PValue(raw.to_string()))
        }
    } else {
        Ok(exponent_to_pvalue(value))
    }
}

pub fn exponent_to_pvalue(exponent: f64) -> f64 {
    10f64.powf(exponent)
}

/// Format an integer exponent the way the overview weight columns name it:
/// `-4` → `1e-04`.
pub fn pvalue_label(exponent: i32) -> String {
    if exponent < 0 {
        format!("1e-{:02}", -exponent)
    } else {
        format!("1e+{exponent:02}")
    }
}

/// Parse a beta cutoff in [0, 1].
pub fn parse_beta_cutoff(raw: &str) -> Result<f64, ThresholdError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ThresholdError::Beta(raw.to_string()))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ThresholdError::Beta(raw.to_string()))
    }
}

/// Parse a direction flag: `-1`, `0`, `1` or `+1`.
pub fn parse_direction(raw: &str) -> Result<Direction, ThresholdError> {
    raw.trim()
        .trim_start_matches('+')
        .parse::<i8>()
        .ok()
        .and_then(Direction::from_i8)
        .ok_or_else(|| ThresholdError::Direction(raw.to_string()))
}
