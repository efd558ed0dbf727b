use std::fmt;

/// Operator category. Decides the calling convention an operator is wrapped into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OperatorCategory {
    Accumulator,
    Expression,
    Pipeline,
    Projection,
    Query,
}

impl OperatorCategory {
    pub const ALL: [Self; 5] =
        [Self::Accumulator, Self::Expression, Self::Pipeline, Self::Projection, Self::Query];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accumulator => "ACCUMULATOR",
            Self::Expression => "EXPRESSION",
            Self::Pipeline => "PIPELINE",
            Self::Projection => "PROJECTION",
            Self::Query => "QUERY",
        }
    }
}

impl fmt::Display for OperatorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
