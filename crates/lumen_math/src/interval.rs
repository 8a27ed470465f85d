/// A closed range of ray parameters `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    #[inline]
    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    /// Same lower bound, upper bound pulled in to `max`.
    ///
    /// Used by closest-hit scans: every accepted hit tightens the range
    /// the remaining candidates are tested against.
    #[inline]
    pub fn with_max(&self, max: f64) -> Interval {
        Interval::new(self.min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_contains() {
        let interval = Interval::new(0.001, 10.0);

        // Inclusive bounds
        assert!(interval.contains(0.001));
        assert!(interval.contains(10.0));
        assert!(interval.contains(5.0));

        assert!(!interval.contains(0.0));
        assert!(!interval.contains(10.1));
        assert!(!interval.contains(f64::NAN));
    }

    #[test]
    fn test_interval_with_max() {
        let interval = Interval::new(0.001, f64::INFINITY);
        assert!(interval.contains(1e300));

        let tightened = interval.with_max(4.0);
        assert_eq!(tightened.min, 0.001);
        assert_eq!(tightened.max, 4.0);
        assert!(tightened.contains(4.0));
        assert!(!tightened.contains(4.5));
    }
}
