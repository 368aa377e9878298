/// Maps a raw value against a maximum to a rendered percentage.
///
/// The raw value and the computed percentage are both kept so a rendering
/// collaborator can read either. The percentage is clamped at 100 even when
/// the value overshoots the maximum, which guards against floating-point
/// overshoot on the final tick.
///
/// `max` must be greater than zero; this is a caller precondition and is
/// not enforced here.
#[derive(Debug, Clone)]
pub struct Progress {
    value: f64,
    max: f64,
    percentage: f64,
}

impl Progress {
    pub fn new(max: f64) -> Self {
        Self {
            value: 0.0,
            max,
            percentage: 0.0,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    pub fn set_value(&mut self, value: f64) {
        self.percentage = if value < self.max {
            value * 100.0 / self.max
        } else {
            100.0
        };
        self.value = value;
    }

    /// Changing the maximum does not rescale the stored percentage; only
    /// subsequent `set_value` calls see the new maximum.
    pub fn set_max(&mut self, max: f64) {
        self.max = max;
    }

    pub fn reset(&mut self) {
        self.set_value(0.0);
    }

    /// Force the tracker to its maximum, rendering as exactly 100%.
    pub fn complete(&mut self) {
        self.set_value(self.max);
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new(100.0)
    }
}
