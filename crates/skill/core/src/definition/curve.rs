//! Experience curves.

/// Shape of the experience requirement between consecutive levels.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CurveKind {
    /// `base * level`
    Linear,
    /// `floor(base * multiplier^(level - 1))`
    #[default]
    Exponential,
    /// Supplied by the skill's behavior.
    Custom,
}

/// Leveling curve kind plus its parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelingCurve {
    pub kind: CurveKind,
    pub base_experience: u64,
    #[cfg_attr(feature = "serde", serde(default = "LevelingCurve::default_multiplier"))]
    pub multiplier: f64,
}

impl LevelingCurve {
    pub const DEFAULT_MULTIPLIER: f64 = 1.1;

    #[cfg(feature = "serde")]
    fn default_multiplier() -> f64 {
        Self::DEFAULT_MULTIPLIER
    }

    pub const fn linear(base_experience: u64) -> Self {
        Self {
            kind: CurveKind::Linear,
            base_experience,
            multiplier: 1.0,
        }
    }

    pub const fn exponential(base_experience: u64, multiplier: f64) -> Self {
        Self {
            kind: CurveKind::Exponential,
            base_experience,
            multiplier,
        }
    }

    pub const fn custom(base_experience: u64, multiplier: f64) -> Self {
        Self {
            kind: CurveKind::Custom,
            base_experience,
            multiplier,
        }
    }

    /// Experience needed to advance from `level` to `level + 1` for the two
    /// built-in kinds. Returns `None` for [`CurveKind::Custom`].
    ///
    /// The result is never below 1 so level-up loops always make progress.
    pub fn builtin_requirement(&self, level: u32) -> Option<u64> {
        let level = level.max(1);
        let raw = match self.kind {
            CurveKind::Linear => self.base_experience.saturating_mul(level as u64),
            CurveKind::Exponential => exponential_requirement(
                self.base_experience,
                self.multiplier,
                level,
            ),
            CurveKind::Custom => return None,
        };
        Some(raw.max(1))
    }
}

impl Default for LevelingCurve {
    fn default() -> Self {
        Self::exponential(100, Self::DEFAULT_MULTIPLIER)
    }
}

/// `floor(base * multiplier^(level - 1))`, saturating at `u64::MAX`.
pub fn exponential_requirement(base: u64, multiplier: f64, level: u32) -> u64 {
    let exponent = level.saturating_sub(1) as i32;
    let value = (base as f64 * multiplier.powi(exponent)).floor();
    if value >= u64::MAX as f64 {
        u64::MAX
    } else {
        value as u64
    }
}
