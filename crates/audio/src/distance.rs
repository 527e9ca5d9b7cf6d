use serde::{Deserialize, Serialize};

/// Maps source-to-listener distance to a gain in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DistanceModel {
    /// Inverse-distance spreading from 1 unit out, silent past `radius`.
    Cutoff { radius: f32 },
    /// Inverse-distance attenuation clamped between `min` and `max`, never culled.
    Inverse { min: f32, max: f32 },
}

impl Default for DistanceModel {
    fn default() -> Self {
        Self::Cutoff { radius: 10.0 }
    }
}

impl DistanceModel {
    /// Reference distance below which spreading does not boost the gain.
    const REFERENCE: f32 = 1.0;

    pub fn is_valid(&self) -> bool {
        match *self {
            Self::Cutoff { radius } => radius.is_finite() && radius > 0.0,
            Self::Inverse { min, max } => {
                min.is_finite() && max.is_finite() && min > 0.0 && max >= min
            }
        }
    }

    pub fn gain(&self, distance: f32) -> f32 {
        match *self {
            Self::Cutoff { radius } => {
                if distance > radius {
                    0.0
                } else {
                    Self::REFERENCE / distance.max(Self::REFERENCE)
                }
            }
            Self::Inverse { min, max } => (min / distance.clamp(min, max)).clamp(0.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn cutoff_is_full_gain_up_close() {
        let m = DistanceModel::Cutoff { radius: 10.0 };
        assert_eq!(m.gain(0.0), 1.0);
        assert_eq!(m.gain(1.0), 1.0);
    }

    #[test]
    fn cutoff_spreads_then_culls() {
        let m = DistanceModel::Cutoff { radius: 10.0 };
        assert_relative_eq!(m.gain(4.0), 0.25);
        assert_relative_eq!(m.gain(10.0), 0.1);
        assert_eq!(m.gain(10.01), 0.0);
    }

    #[test]
    fn inverse_never_culls() {
        let m = DistanceModel::Inverse { min: 1.0, max: 100.0 };
        assert_relative_eq!(m.gain(2.0), 0.5);
        assert_relative_eq!(m.gain(1000.0), 0.01);
        assert!(m.gain(2.0) > m.gain(10.0));
    }

    #[test]
    fn validation() {
        assert!(DistanceModel::default().is_valid());
        assert!(!DistanceModel::Cutoff { radius: 0.0 }.is_valid());
        assert!(!DistanceModel::Cutoff { radius: f32::NAN }.is_valid());
        assert!(!DistanceModel::Inverse { min: 5.0, max: 1.0 }.is_valid());
    }
}
