//! Parameter checks shared by every scheme
//!
//! Each scheme describes its own rules through a [`Validator`], which keeps
//! collecting after the first failure so the caller can report every broken
//! constraint at once.

use crate::error::{Constraint, ModulationError, Result, Violation};

#[derive(Debug, Default)]
pub struct Validator {
    violations: Vec<Violation>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// `value` must be finite and strictly greater than zero
    pub fn positive(mut self, field: &'static str, value: f64) -> Self {
        if !(value.is_finite() && value > 0.0) {
            self.violations.push(Violation::new(field, Constraint::Positive));
        }
        self
    }

    /// `value` must be finite and zero or greater
    pub fn non_negative(mut self, field: &'static str, value: f64) -> Self {
        if !(value.is_finite() && value >= 0.0) {
            self.violations
                .push(Violation::new(field, Constraint::NonNegative));
        }
        self
    }

    /// `bits` must be non-empty, match `^[01]+$` and fit into `capacity` samples
    pub fn bit_stream(mut self, field: &'static str, bits: &str, capacity: usize) -> Self {
        if bits.is_empty() {
            self.violations.push(Violation::new(field, Constraint::NonEmpty));
        } else if !bits.bytes().all(|b| b == b'0' || b == b'1') {
            self.violations.push(Violation::new(field, Constraint::Binary));
        } else if bits.len() > capacity {
            self.violations
                .push(Violation::new(field, Constraint::AtMost(capacity)));
        }
        self
    }

    pub fn finish(self) -> Result<()> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ModulationError::InvalidParameter(self.violations))
        }
    }
}
