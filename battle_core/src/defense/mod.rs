//! Defense system - Resistance mitigation and shields

mod mitigation;
mod shield;

pub use mitigation::{
    effective_resistance, mitigate, mitigate_with, reduction_fraction, reduction_fraction_with,
    resolve_mitigation, resolve_mitigation_with, MitigatedDamage,
};
pub use shield::{absorb_with_shields, tick_shields, total_shield, ShieldAbsorption, ShieldInstance};

/// Defense calculation constants
pub mod constants {
    /// Resistance formula constant: `reduction = r / (r + CONSTANT)`
    pub const RESISTANCE_CONSTANT: f64 = 1000.0;

    /// Hard cap on damage reduction from a single resistance
    pub const MAX_DAMAGE_REDUCTION: f64 = 0.90;
}
