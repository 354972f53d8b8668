//! Value range of a slider and the value/percentage mapping.

use glide_foundation::TreeError;
use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum SliderError {
    NonFiniteBound { min: f64, max: f64 },
    InvertedRange { min: f64, max: f64 },
    InvalidStep { step: f64 },
    /// Mounting the slider's elements failed, usually because the parent is gone.
    Tree(TreeError),
}

impl fmt::Display for SliderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SliderError::NonFiniteBound { min, max } => {
                write!(f, "slider bounds must be finite (min {min}, max {max})")
            }
            SliderError::InvertedRange { min, max } => {
                write!(f, "slider max {max} is below min {min}")
            }
            SliderError::InvalidStep { step } => {
                write!(f, "slider step {step} must be finite and not negative")
            }
            SliderError::Tree(err) => write!(f, "cannot mount slider: {err}"),
        }
    }
}

impl std::error::Error for SliderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SliderError::Tree(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TreeError> for SliderError {
    fn from(err: TreeError) -> Self {
        SliderError::Tree(err)
    }
}

// Beyond this many decimals f64 noise dominates.
const MAX_DECIMALS: usize = 12;
// Tiny continuous spans may need more, up to what `10f64.powi` can represent.
const MAX_CONTINUOUS_DECIMALS: i32 = 300;

/// Validated `[min, max]` range with an optional step.
///
/// A step of `0` disables quantisation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliderRange {
    min: f64,
    max: f64,
    step: f64,
}

impl SliderRange {
    pub fn new(min: f64, max: f64, step: f64) -> Result<Self, SliderError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(SliderError::NonFiniteBound { min, max });
        }
        if max < min {
            return Err(SliderError::InvertedRange { min, max });
        }
        if !step.is_finite() || step < 0.0 {
            return Err(SliderError::InvalidStep { step });
        }
        Ok(Self { min, max, step })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn is_degenerate(&self) -> bool {
        self.span() <= 0.0
    }

    /// Where `value` sits in the range, as a percentage in `[0, 100]`.
    ///
    /// A degenerate range always reports 0.
    pub fn percent_of(&self, value: f64) -> f64 {
        if self.is_degenerate() || !value.is_finite() {
            return 0.0;
        }
        ((value - self.min) / self.span() * 100.0).clamp(0.0, 100.0)
    }

    /// Value at `percent` of the range, snapped to the step grid and clamped.
    pub fn value_at(&self, percent: f64) -> f64 {
        if self.is_degenerate() {
            return self.min;
        }
        let percent = if percent.is_finite() {
            percent.clamp(0.0, 100.0)
        } else {
            0.0
        };
        self.snap(self.min + percent / 100.0 * self.span())
    }

    /// Rounds `raw` to the nearest step from `min`, never leaving the range.
    pub fn snap(&self, raw: f64) -> f64 {
        let raw = raw.clamp(self.min, self.max);
        if self.step <= 0.0 {
            return round_to(raw, self.continuous_decimals()).clamp(self.min, self.max);
        }
        let last_step = (self.span() / self.step + 1e-9).floor();
        let steps = ((raw - self.min) / self.step).round().min(last_step);
        let snapped = self.min + steps * self.step;
        round_to(snapped, self.decimals()).clamp(self.min, self.max)
    }

    fn decimals(&self) -> usize {
        decimal_places(self.step).max(decimal_places(self.min))
    }

    /// Precision kept for continuous values: MAX_DECIMALS significant digits
    /// across the span, and never fewer decimals than `min` carries.
    fn continuous_decimals(&self) -> usize {
        let span = self.span();
        if !(span > 0.0) {
            return MAX_DECIMALS;
        }
        let magnitude = span.log10().ceil() as i32;
        let decimals = (MAX_DECIMALS as i32 - magnitude).clamp(0, MAX_CONTINUOUS_DECIMALS);
        (decimals as usize).max(decimal_places(self.min))
    }
}

impl Default for SliderRange {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 100.0,
            step: 1.0,
        }
    }
}

fn decimal_places(value: f64) -> usize {
    let text = value.abs().to_string();
    text.split_once('.')
        .map(|(_, fraction)| fraction.len().min(MAX_DECIMALS))
        .unwrap_or(0)
}

fn round_to(value: f64, decimals: usize) -> f64 {
    // `decimals` is capped at MAX_DECIMALS, so the cast cannot overflow.
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_configuration() {
        assert_eq!(
            SliderRange::new(10.0, 0.0, 1.0),
            Err(SliderError::InvertedRange { min: 10.0, max: 0.0 })
        );
        assert!(matches!(
            SliderRange::new(f64::NAN, 1.0, 1.0),
            Err(SliderError::NonFiniteBound { .. })
        ));
        assert_eq!(
            SliderRange::new(0.0, 1.0, -0.5),
            Err(SliderError::InvalidStep { step: -0.5 })
        );
        assert!(SliderRange::new(0.0, 1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn snaps_to_nearest_step() {
        let range = SliderRange::new(0.0, 100.0, 10.0).unwrap();
        assert_eq!(range.value_at(44.0), 40.0);
        assert_eq!(range.value_at(46.0), 50.0);
        assert_eq!(range.value_at(100.0), 100.0);
    }

    #[test]
    fn steps_are_counted_from_min() {
        let range = SliderRange::new(5.0, 25.0, 10.0).unwrap();
        assert_eq!(range.value_at(40.0), 15.0);
        assert_eq!(range.value_at(0.0), 5.0);
    }

    #[test]
    fn uneven_step_never_overshoots_max() {
        let range = SliderRange::new(0.0, 10.0, 4.0).unwrap();
        assert_eq!(range.value_at(100.0), 8.0);
        assert_eq!(range.value_at(50.0), 4.0);
    }

    #[test]
    fn fractional_steps_are_normalised() {
        let range = SliderRange::new(0.0, 1.0, 0.1).unwrap();
        assert_eq!(range.value_at(30.0), 0.3);
        assert_eq!(range.value_at(70.0), 0.7);
    }

    #[test]
    fn zero_step_is_continuous() {
        let range = SliderRange::new(0.0, 200.0, 0.0).unwrap();
        assert_eq!(range.value_at(12.5), 25.0);
    }

    #[test]
    fn continuous_values_survive_percent_round_trip() {
        let range = SliderRange::new(0.0, 3.0, 0.0).unwrap();
        for value in [1.0, 0.25, 2.7, 1.234567] {
            assert_eq!(range.value_at(range.percent_of(value)), value);
        }
    }

    #[test]
    fn large_ranges_round_trip_whole_values() {
        let range = SliderRange::new(0.0, 1e9, 1.0).unwrap();
        assert_eq!(range.value_at(range.percent_of(123_456_789.0)), 123_456_789.0);
    }

    #[test]
    fn tiny_continuous_ranges_keep_their_precision() {
        let range = SliderRange::new(0.0, 0.001, 0.0).unwrap();
        assert_eq!(range.value_at(50.0), 0.0005);
        assert_eq!(range.snap(0.000_123_456), 0.000_123_456);
    }

    #[test]
    fn degenerate_range_maps_to_min() {
        let range = SliderRange::new(7.0, 7.0, 1.0).unwrap();
        assert_eq!(range.percent_of(7.0), 0.0);
        assert_eq!(range.value_at(80.0), 7.0);
    }

    #[test]
    fn percent_of_clamps_out_of_range_values() {
        let range = SliderRange::default();
        assert_eq!(range.percent_of(40.0), 40.0);
        assert_eq!(range.percent_of(-5.0), 0.0);
        assert_eq!(range.percent_of(250.0), 100.0);
    }

    #[test]
    fn error_messages_name_the_problem() {
        let err = SliderRange::new(0.0, 1.0, -1.0).unwrap_err();
        assert_eq!(err.to_string(), "slider step -1 must be finite and not negative");
    }
}
