//! Engine configuration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Remaining amount at or below which a lot counts as exhausted (`0.0001`).
pub const DEFAULT_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 4);

/// What to do with a conversion whose consumed cost basis is zero.
///
/// This happens when the queue it drew from was empty, or held only
/// zero-cost lots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroCostPolicy {
    /// Do not create the downstream lot; record the acquisition as dropped.
    #[default]
    Drop,
    /// Create the downstream lot with a cost basis of zero.
    CreateZeroCostLot,
}

impl FromStr for ZeroCostPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "drop" => Ok(Self::Drop),
            "keep" | "create" | "create_zero_cost_lot" => Ok(Self::CreateZeroCostLot),
            _ => Err(format!("unknown zero-cost policy: {s}")),
        }
    }
}

impl fmt::Display for ZeroCostPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Drop => write!(f, "drop"),
            Self::CreateZeroCostLot => write!(f, "create_zero_cost_lot"),
        }
    }
}

/// Tunables for one engine run.
///
/// # Examples
///
/// ```
/// use fifochain_core::{EngineConfig, ZeroCostPolicy};
/// use rust_decimal_macros::dec;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.epsilon, dec!(0.0001));
/// assert_eq!(config.zero_cost_policy, ZeroCostPolicy::Drop);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Exhaustion and shortfall threshold.
    pub epsilon: Decimal,
    /// Handling of zero-cost conversions.
    pub zero_cost_policy: ZeroCostPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            zero_cost_policy: ZeroCostPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Set the epsilon.
    #[must_use]
    pub const fn with_epsilon(mut self, epsilon: Decimal) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the zero-cost policy.
    #[must_use]
    pub const fn with_zero_cost_policy(mut self, policy: ZeroCostPolicy) -> Self {
        self.zero_cost_policy = policy;
        self
    }
}
