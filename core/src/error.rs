use std::fmt;
use thiserror::Error;

/// The rule a parameter broke
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    /// Strictly greater than zero (and finite)
    Positive,
    /// Zero or greater (and finite)
    NonNegative,
    /// Must contain at least one element
    NonEmpty,
    /// Only the characters '0' and '1'
    Binary,
    /// No more than this many elements
    AtMost(usize),
    /// One of the listed spellings
    OneOf(&'static [&'static str]),
}

/// A single failed check, naming the offending field
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub field: &'static str,
    pub constraint: Constraint,
}

impl Violation {
    pub fn new(field: &'static str, constraint: Constraint) -> Self {
        Self { field, constraint }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.constraint {
            Constraint::Positive => write!(f, "{} must be greater than 0", self.field),
            Constraint::NonNegative => write!(f, "{} must not be negative", self.field),
            Constraint::NonEmpty => write!(f, "{} must not be empty", self.field),
            Constraint::Binary => write!(f, "{} may only contain '0' and '1'", self.field),
            Constraint::AtMost(limit) => {
                write!(f, "{} must not be longer than {}", self.field, limit)
            }
            Constraint::OneOf(options) => {
                write!(f, "{} must be one of: {}", self.field, options.join(", "))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModulationError {
    #[error("Invalid parameter: {}", join_violations(.0))]
    InvalidParameter(Vec<Violation>),
}

impl ModulationError {
    pub fn invalid(field: &'static str, constraint: Constraint) -> Self {
        ModulationError::InvalidParameter(vec![Violation::new(field, constraint)])
    }

    /// Every constraint that failed, in the order it was checked
    pub fn violations(&self) -> &[Violation] {
        match self {
            ModulationError::InvalidParameter(violations) => violations,
        }
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, ModulationError>;
