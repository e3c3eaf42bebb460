//! Search and grid configuration.
//!
//! Both structs are plain data with sensible defaults; with the `serde`
//! feature enabled they can be loaded from any serde format.

use crate::geom::Vec3;

/// Default cost of a diagonal step (√2).
pub const DEFAULT_DIAGONAL_COST: f32 = std::f32::consts::SQRT_2;

/// Lower and upper bounds accepted for [`NavConfig::diagonal_cost`].
pub const DIAGONAL_COST_RANGE: (f32, f32) = (1.0, 2.0);

/// Movement rules shared by every search over a [`Grid`](crate::Grid).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NavConfig {
    /// Enumerate the four diagonal neighbours as well as the cardinals.
    pub allow_diagonal: bool,
    /// Reject a diagonal step unless both cells sharing an edge with the
    /// source and the destination are walkable.
    pub prevent_diagonal_cutting: bool,
    /// Cost multiplier of a diagonal step. Clamped to
    /// [`DIAGONAL_COST_RANGE`] by [`NavConfig::clamped`].
    pub diagonal_cost: f32,
    /// Extra integration cost added by the flow field when the bearing
    /// towards the target is more than 15° off the nearest cardinal or
    /// diagonal axis. Zero disables the penalty.
    pub angle_penalty: f32,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            allow_diagonal: true,
            prevent_diagonal_cutting: true,
            diagonal_cost: DEFAULT_DIAGONAL_COST,
            angle_penalty: 0.0,
        }
    }
}

impl NavConfig {
    /// Set `allow_diagonal` (builder).
    pub fn with_diagonal(mut self, allow: bool) -> Self {
        self.allow_diagonal = allow;
        self
    }

    /// Set `prevent_diagonal_cutting` (builder).
    pub fn with_corner_cutting_prevented(mut self, prevent: bool) -> Self {
        self.prevent_diagonal_cutting = prevent;
        self
    }

    /// Set `diagonal_cost`, clamped to [`DIAGONAL_COST_RANGE`] (builder).
    pub fn with_diagonal_cost(mut self, cost: f32) -> Self {
        self.diagonal_cost = cost;
        self.clamped()
    }

    /// Set `angle_penalty`, clamped to be non-negative (builder).
    pub fn with_angle_penalty(mut self, penalty: f32) -> Self {
        self.angle_penalty = penalty;
        self.clamped()
    }

    /// Return a copy with every field inside its accepted range.
    ///
    /// A NaN diagonal cost falls back to [`DEFAULT_DIAGONAL_COST`]; a NaN
    /// angle penalty falls back to zero.
    pub fn clamped(mut self) -> Self {
        let (lo, hi) = DIAGONAL_COST_RANGE;
        self.diagonal_cost = if self.diagonal_cost.is_nan() {
            DEFAULT_DIAGONAL_COST
        } else {
            self.diagonal_cost.clamp(lo, hi)
        };
        self.angle_penalty = if self.angle_penalty.is_nan() {
            0.0
        } else {
            self.angle_penalty.max(0.0)
        };
        self
    }
}

/// Dimensions and placement of a [`Grid`](crate::Grid).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridConfig {
    pub width: i32,
    pub height: i32,
    pub cell_size: f32,
    /// World-space centre of the grid.
    pub origin: Vec3,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 50,
            height: 50,
            cell_size: 100.0,
            origin: Vec3::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = NavConfig::default();
        assert!(cfg.allow_diagonal);
        assert!(cfg.prevent_diagonal_cutting);
        assert!((cfg.diagonal_cost - 1.414_213_5).abs() < 1e-6);
        assert_eq!(cfg.angle_penalty, 0.0);
    }

    #[test]
    fn diagonal_cost_is_clamped() {
        assert_eq!(NavConfig::default().with_diagonal_cost(0.5).diagonal_cost, 1.0);
        assert_eq!(NavConfig::default().with_diagonal_cost(3.0).diagonal_cost, 2.0);
        assert_eq!(NavConfig::default().with_diagonal_cost(1.5).diagonal_cost, 1.5);
        assert_eq!(
            NavConfig::default().with_diagonal_cost(f32::NAN).diagonal_cost,
            DEFAULT_DIAGONAL_COST
        );
    }

    #[test]
    fn clamped_repairs_hand_built_config() {
        let cfg = NavConfig {
            diagonal_cost: 9.0,
            angle_penalty: -2.0,
            ..NavConfig::default()
        }
        .clamped();
        assert_eq!(cfg.diagonal_cost, 2.0);
        assert_eq!(cfg.angle_penalty, 0.0);
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn nav_config_round_trip() {
        let cfg = NavConfig::default()
            .with_diagonal(false)
            .with_angle_penalty(0.25);
        let json = serde_json::to_string(&cfg).unwrap();
        let back: NavConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let cfg: GridConfig = serde_json::from_str(r#"{ "width": 8 }"#).unwrap();
        assert_eq!(cfg.width, 8);
        assert_eq!(cfg.height, 50);
        assert_eq!(cfg.cell_size, 100.0);
    }
}
