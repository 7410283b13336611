//! Supported IANA timezone names.

use std::collections::BTreeSet;

use chrono_tz::TZ_VARIANTS;

/// Read-only set of the IANA timezone names the client accepts.
///
/// Built once at startup and shared behind an [`std::sync::Arc`]; handlers and the
/// registration schema both read from the same instance.
#[derive(Debug, Clone)]
pub struct TimezoneSet {
    names: BTreeSet<&'static str>,
}

impl TimezoneSet {
    /// Collect every zone compiled into the timezone database.
    pub fn new() -> Self {
        Self {
            names: TZ_VARIANTS.iter().map(|tz| tz.name()).collect(),
        }
    }

    /// Whether `name` is a supported timezone identifier. Matching is case-sensitive.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Supported names in lexicographic order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.names.iter().copied()
    }

    /// Number of supported names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when no zone is supported.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for TimezoneSet {
    fn default() -> Self {
        Self::new()
    }
}
