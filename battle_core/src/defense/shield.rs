//! Shields - Temporary damage absorption consumed oldest-first

use serde::{Deserialize, Serialize};

/// A single shield on a character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShieldInstance {
    pub id: String,
    pub current_amount: f64,
    pub max_amount: f64,
    pub duration_in_turns: i32,
}

impl ShieldInstance {
    pub fn new(id: impl Into<String>, amount: f64, duration_in_turns: i32) -> Self {
        let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
        ShieldInstance {
            id: id.into(),
            current_amount: amount,
            max_amount: amount,
            duration_in_turns,
        }
    }

    pub fn is_active(&self) -> bool {
        self.current_amount > 0.0 && self.duration_in_turns > 0
    }
}

/// Outcome of pushing damage through a shield list
#[derive(Debug, Clone, PartialEq)]
pub struct ShieldAbsorption {
    /// Shields left after absorption, creation order preserved
    pub shields: Vec<ShieldInstance>,
    /// Damage soaked by shields
    pub absorbed: f64,
    /// Damage that spills through to health
    pub overflow: f64,
}

/// Sum of all remaining shield amounts
pub fn total_shield(shields: &[ShieldInstance]) -> f64 {
    shields
        .iter()
        .filter(|s| s.is_active())
        .map(|s| s.current_amount)
        .sum()
}

/// Absorb `damage` starting from the oldest shield
///
/// Fully consumed shields are dropped from the returned list.
pub fn absorb_with_shields(shields: &[ShieldInstance], damage: f64) -> ShieldAbsorption {
    let mut remaining = if damage.is_finite() { damage.max(0.0) } else { 0.0 };
    let mut absorbed = 0.0;
    let mut kept = Vec::with_capacity(shields.len());

    for shield in shields.iter().filter(|s| s.is_active()) {
        let mut shield = shield.clone();
        if remaining > 0.0 {
            let soaked = remaining.min(shield.current_amount);
            shield.current_amount -= soaked;
            remaining -= soaked;
            absorbed += soaked;
        }
        if shield.current_amount > 0.0 {
            kept.push(shield);
        }
    }

    ShieldAbsorption {
        shields: kept,
        absorbed,
        overflow: remaining,
    }
}

/// Advance shield durations by one turn
///
/// Expired shields are removed along with whatever they had left; the
/// remainder is not refunded anywhere.
pub fn tick_shields(shields: &[ShieldInstance]) -> Vec<ShieldInstance> {
    shields
        .iter()
        .map(|s| ShieldInstance {
            duration_in_turns: s.duration_in_turns - 1,
            ..s.clone()
        })
        .filter(ShieldInstance::is_active)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_absorption() {
        let shields = vec![
            ShieldInstance::new("a", 20.0, 3),
            ShieldInstance::new("b", 10.0, 3),
        ];
        let result = absorb_with_shields(&shields, 25.0);

        assert!((result.absorbed - 25.0).abs() < f64::EPSILON);
        assert!(result.overflow.abs() < f64::EPSILON);
        assert_eq!(result.shields.len(), 1);
        assert_eq!(result.shields[0].id, "b");
        assert!((result.shields[0].current_amount - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_overflow_spills_to_health() {
        let shields = vec![ShieldInstance::new("a", 15.0, 2)];
        let result = absorb_with_shields(&shields, 40.0);
        assert!((result.overflow - 25.0).abs() < f64::EPSILON);
        assert!(result.shields.is_empty());
    }

    #[test]
    fn test_original_list_untouched() {
        let shields = vec![ShieldInstance::new("a", 15.0, 2)];
        let _ = absorb_with_shields(&shields, 10.0);
        assert!((shields[0].current_amount - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_expired_shield_removed_without_refund() {
        let shields = vec![
            ShieldInstance::new("short", 50.0, 1),
            ShieldInstance::new("long", 10.0, 3),
        ];
        let ticked = tick_shields(&shields);
        assert_eq!(ticked.len(), 1);
        assert_eq!(ticked[0].id, "long");
        assert!((total_shield(&ticked) - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_total_shield_ignores_inactive() {
        let shields = vec![
            ShieldInstance::new("a", 10.0, 0),
            ShieldInstance::new("b", 7.0, 2),
        ];
        assert!((total_shield(&shields) - 7.0).abs() < f64::EPSILON);
    }
}
