//! Built-in `$$` variables.

use crate::config::ComputeOptions;
use bson::Bson;
use std::fmt;

/// Variables that read from the evaluation context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemVariable {
    /// The top-level document of the current evaluation.
    Root,
    /// The document at the current recursion level.
    Current,
    /// Absent value; projection uses it to drop a field.
    Remove,
}

impl SystemVariable {
    pub const ALL: [Self; 3] = [Self::Root, Self::Current, Self::Remove];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Root => "$$ROOT",
            Self::Current => "$$CURRENT",
            Self::Remove => "$$REMOVE",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.name() == name)
    }

    /// `options` must already carry the root binding.
    #[must_use]
    pub fn evaluate<'a>(
        self,
        document: &'a Bson,
        options: &ComputeOptions<'a>,
    ) -> Option<&'a Bson> {
        match self {
            Self::Root => Some(options.root.unwrap_or(document)),
            Self::Current => Some(document),
            Self::Remove => None,
        }
    }
}

impl fmt::Display for SystemVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Directives interpreted by `redact`. `compute_value` passes them through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RedactVariable {
    Keep,
    Prune,
    Descend,
}

impl RedactVariable {
    pub const ALL: [Self; 3] = [Self::Keep, Self::Prune, Self::Descend];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Keep => "$$KEEP",
            Self::Prune => "$$PRUNE",
            Self::Descend => "$$DESCEND",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.name() == name)
    }

    /// Recognizes a computed value that carries a directive.
    #[must_use]
    pub fn from_value(value: &Bson) -> Option<Self> {
        match value {
            Bson::String(s) => Self::from_name(s),
            _ => None,
        }
    }
}

impl fmt::Display for RedactVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
