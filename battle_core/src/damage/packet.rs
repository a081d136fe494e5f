//! DamagePacket - Raw damage split by type, before mitigation

use serde::{Deserialize, Serialize};

/// Raw outgoing damage for one hit
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DamagePacket {
    pub physical: f64,
    pub magic: f64,
    /// Bypasses armor and magic resist
    pub true_damage: f64,
    /// Whether this hit was a critical strike
    #[serde(default)]
    pub is_critical: bool,
}

impl DamagePacket {
    pub fn new(physical: f64, magic: f64, true_damage: f64) -> Self {
        DamagePacket {
            physical,
            magic,
            true_damage,
            is_critical: false,
        }
    }

    pub fn physical(amount: f64) -> Self {
        Self::new(amount, 0.0, 0.0)
    }

    pub fn magic(amount: f64) -> Self {
        Self::new(0.0, amount, 0.0)
    }

    /// Total raw damage across all types
    pub fn total(&self) -> f64 {
        self.physical + self.magic + self.true_damage
    }

    /// Multiply every damage type
    pub fn scaled(&self, factor: f64) -> Self {
        DamagePacket {
            physical: self.physical * factor,
            magic: self.magic * factor,
            true_damage: self.true_damage * factor,
            is_critical: self.is_critical,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total() <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packet_total() {
        let packet = DamagePacket::new(10.0, 20.0, 5.0);
        assert!((packet.total() - 35.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_scaled_keeps_crit_flag() {
        let mut packet = DamagePacket::physical(40.0);
        packet.is_critical = true;
        let scaled = packet.scaled(2.0);
        assert!((scaled.physical - 80.0).abs() < f64::EPSILON);
        assert!(scaled.is_critical);
    }

    #[test]
    fn test_empty_packet() {
        assert!(DamagePacket::default().is_empty());
        assert!(!DamagePacket::magic(1.0).is_empty());
    }
}
