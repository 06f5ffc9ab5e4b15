//! Solver configuration.

use serde::Deserialize;

use crate::primitive::Primitive;

/// Dialect defaults used when the graph leaves a choice open.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Type of a leaf with no bound and no preferred type
    pub(crate) default_type: Primitive,
    /// Preferred type of decimal integer literals
    pub(crate) integer_preferred: Primitive,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_type: Primitive::Real,
            integer_preferred: Primitive::Real,
        }
    }
}

impl Config {
    /// Create a new Config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the type given to wholly unconstrained leaves.
    pub fn default_type(mut self, value: Primitive) -> Self {
        self.default_type = value;
        self
    }

    /// Set the preferred type of decimal integer literals.
    pub fn integer_preferred(mut self, value: Primitive) -> Self {
        self.integer_preferred = value;
        self
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
