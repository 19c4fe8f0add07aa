//! Bounded stepping counter.

use thiserror::Error;

/// Counter construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CounterError {
    #[error("min {min} is greater than max {max}")]
    InvalidRange { min: i64, max: i64 },

    #[error("default value {value} is outside [{min}, {max}]")]
    DefaultOutOfRange { value: i64, min: i64, max: i64 },

    #[error("step must be positive, got {0}")]
    InvalidStep(i64),
}

/// Result type for counter construction.
pub type Result<T> = std::result::Result<T, CounterError>;

/// Counter settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterOptions {
    pub default_value: i64,
    pub min: i64,
    pub max: i64,
    pub step: i64,
}

impl Default for CounterOptions {
    fn default() -> Self {
        Self {
            default_value: 0,
            min: i64::MIN,
            max: i64::MAX,
            step: 1,
        }
    }
}

/// Integer that never leaves `[min, max]`.
#[derive(Debug, Clone)]
pub struct Counter {
    value: i64,
    options: CounterOptions,
}

impl Counter {
    /// Create a counter at `options.default_value`.
    pub fn new(options: CounterOptions) -> Result<Self> {
        let CounterOptions {
            default_value,
            min,
            max,
            step,
        } = options;

        if min > max {
            return Err(CounterError::InvalidRange { min, max });
        }
        if !(min..=max).contains(&default_value) {
            return Err(CounterError::DefaultOutOfRange {
                value: default_value,
                min,
                max,
            });
        }
        if step <= 0 {
            return Err(CounterError::InvalidStep(step));
        }

        Ok(Self {
            value: default_value,
            options,
        })
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn options(&self) -> &CounterOptions {
        &self.options
    }

    pub fn increment(&mut self) -> i64 {
        self.set_value(self.value.saturating_add(self.options.step))
    }

    pub fn decrement(&mut self) -> i64 {
        self.set_value(self.value.saturating_sub(self.options.step))
    }

    /// Set the value, clamped into range. Returns the stored value.
    pub fn set_value(&mut self, value: i64) -> i64 {
        self.value = value.clamp(self.options.min, self.options.max);
        self.value
    }

    /// Return to the default value.
    pub fn reset(&mut self) -> i64 {
        self.set_value(self.options.default_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounded(default_value: i64, min: i64, max: i64, step: i64) -> Counter {
        Counter::new(CounterOptions {
            default_value,
            min,
            max,
            step,
        })
        .expect("valid options")
    }

    #[test]
    fn test_steps_and_clamps() {
        let mut counter = bounded(0, -5, 5, 2);

        assert_eq!(counter.increment(), 2);
        assert_eq!(counter.increment(), 4);
        assert_eq!(counter.increment(), 5);
        assert_eq!(counter.increment(), 5);
        assert_eq!(counter.set_value(-100), -5);
        assert_eq!(counter.decrement(), -5);
        assert_eq!(counter.reset(), 0);
    }

    #[test]
    fn test_never_leaves_range() {
        let mut counter = bounded(3, 0, 10, 3);
        // Deterministic mixed sequence.
        for i in 0..200u32 {
            if i.wrapping_mul(2_654_435_761) % 7 < 4 {
                counter.increment();
            } else {
                counter.decrement();
            }
            assert!((0..=10).contains(&counter.value()));
        }
        assert_eq!(counter.reset(), 3);
    }

    #[test]
    fn test_extremes_do_not_overflow() {
        let mut counter = Counter::new(CounterOptions {
            default_value: i64::MAX,
            step: 10,
            ..CounterOptions::default()
        })
        .expect("valid options");
        assert_eq!(counter.increment(), i64::MAX);
        counter.set_value(i64::MIN);
        assert_eq!(counter.decrement(), i64::MIN);
    }

    #[test]
    fn test_invalid_options() {
        let err = Counter::new(CounterOptions {
            min: 5,
            max: 1,
            ..CounterOptions::default()
        })
        .unwrap_err();
        assert_eq!(err, CounterError::InvalidRange { min: 5, max: 1 });

        let err = Counter::new(CounterOptions {
            default_value: 20,
            min: 0,
            max: 10,
            step: 1,
        })
        .unwrap_err();
        assert!(matches!(err, CounterError::DefaultOutOfRange { value: 20, .. }));

        let err = Counter::new(CounterOptions {
            step: 0,
            ..CounterOptions::default()
        })
        .unwrap_err();
        assert_eq!(err, CounterError::InvalidStep(0));
    }
}
