//! Derived shield values.
//!
//! Pure functions turning entity level and capacity inputs into shield
//! behavior. They hold no state and are safe to call from any thread.

/// Simulation ticks per second.
pub const TICKS_PER_SECOND: u32 = 20;

const COEFFICIENT_SCALE: f64 = 0.02;
const COEFFICIENT_EXPONENT: f64 = 1.76;

const BASE_REGEN_RATE: f64 = 15.0;
const REGEN_PER_MAX_SHIELD: f64 = 0.05;

const PLAYER_DEPLETED_DELAY_SECS: u32 = 6;
const PLAYER_DELAY_SECS: u32 = 2;
const NON_PLAYER_DELAY_SECS: u32 = 3;

/// Shield coefficient for an entity at `level` against `base_level`.
///
/// `1 + 0.02 * (level - base_level)^1.76`
///
/// A level below the base raises a negative number to a fractional
/// power, which yields NaN. The NaN is returned as is.
///
/// # Examples
///
/// ```rust
/// use weapon_affix::calculator::shield_coefficient;
///
/// assert_eq!(shield_coefficient(50, 50), 1.0);
/// assert!((shield_coefficient(51, 50) - 1.02).abs() < 1e-12);
/// assert!(shield_coefficient(10, 50).is_nan());
/// ```
pub fn shield_coefficient(level: i32, base_level: i32) -> f64 {
    let diff = f64::from(level) - f64::from(base_level);
    1.0 + COEFFICIENT_SCALE * diff.powf(COEFFICIENT_EXPONENT)
}

/// Shield regenerated per second for a shield of capacity `max_shield`.
///
/// `15 + 0.05 * max_shield`. Negative inputs are not clamped.
pub fn shield_regen_rate(max_shield: f64) -> f64 {
    BASE_REGEN_RATE + REGEN_PER_MAX_SHIELD * max_shield
}

/// Ticks to wait before the shield starts regenerating.
///
/// Players wait longer after their shield has been fully depleted.
/// Non-players always wait the same time.
///
/// # Examples
///
/// ```rust
/// use weapon_affix::calculator::shield_regen_delay;
///
/// assert_eq!(shield_regen_delay(true, true), 120);
/// assert_eq!(shield_regen_delay(true, false), 40);
/// assert_eq!(shield_regen_delay(false, true), 60);
/// ```
pub fn shield_regen_delay(is_player: bool, is_depleted: bool) -> u32 {
    let seconds = match (is_player, is_depleted) {
        (true, true) => PLAYER_DEPLETED_DELAY_SECS,
        (true, false) => PLAYER_DELAY_SECS,
        (false, _) => NON_PLAYER_DELAY_SECS,
    };
    seconds * TICKS_PER_SECOND
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coefficient_matches_formula() {
        let expected = 1.0 + 0.02 * 50f64.powf(1.76);
        assert!((shield_coefficient(100, 50) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_coefficient_at_base_level() {
        assert_eq!(shield_coefficient(0, 0), 1.0);
    }

    #[test]
    fn test_coefficient_below_base_is_nan() {
        let direct = 1.0 + 0.02 * (-40f64).powf(1.76);
        assert!(direct.is_nan());
        assert!(shield_coefficient(10, 50).is_nan());
    }

    #[test]
    fn test_coefficient_extreme_levels() {
        let value = shield_coefficient(i32::MAX, i32::MIN);
        assert!(value.is_finite());
        assert!(value > 1.0);
    }

    #[test]
    fn test_regen_rate_linear() {
        assert_eq!(shield_regen_rate(0.0), 15.0);
        assert_eq!(shield_regen_rate(1000.0), 65.0);
        assert!(shield_regen_rate(-300.0).abs() < 1e-9);
    }

    #[test]
    fn test_regen_delay_table() {
        assert_eq!(shield_regen_delay(true, true), 120);
        assert_eq!(shield_regen_delay(true, false), 40);
        assert_eq!(shield_regen_delay(false, true), 60);
        assert_eq!(shield_regen_delay(false, false), 60);
    }
}
