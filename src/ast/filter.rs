use serde::{Deserialize, Serialize};

use super::expr::Expr;
use super::operators::{CompareOp, DistanceOp, DistanceUnit, SpatialOp};

/// A predicate tree over feature attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Filter {
    /// Matches everything.
    Include,
    /// Matches nothing.
    Exclude,
    And { filters: Vec<Filter> },
    Or { filters: Vec<Filter> },
    Not { filter: Box<Filter> },
    Compare {
        #[serde(rename = "operator")]
        op: CompareOp,
        left: Expr,
        right: Expr,
    },
    Between { expr: Expr, lower: Expr, upper: Expr },
    IsNull { expr: Expr },
    Like(LikeFilter),
    Spatial(SpatialFilter),
    Distance(DistanceFilter),
}

impl Filter {
    pub fn and(filters: Vec<Filter>) -> Self {
        Filter::And { filters }
    }

    pub fn or(filters: Vec<Filter>) -> Self {
        Filter::Or { filters }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(filter: Filter) -> Self {
        Filter::Not {
            filter: Box::new(filter),
        }
    }

    pub fn compare(op: CompareOp, left: Expr, right: Expr) -> Self {
        Filter::Compare { op, left, right }
    }

    pub fn between(expr: Expr, lower: Expr, upper: Expr) -> Self {
        Filter::Between { expr, lower, upper }
    }

    pub fn is_null(expr: Expr) -> Self {
        Filter::IsNull { expr }
    }

    pub fn like(expr: Expr, pattern: impl Into<String>) -> Self {
        Filter::Like(LikeFilter::new(expr, pattern))
    }

    pub fn spatial(op: SpatialOp, left: Expr, right: Expr) -> Self {
        Filter::Spatial(SpatialFilter { op, left, right })
    }

    pub fn distance(
        op: DistanceOp,
        left: Expr,
        right: Expr,
        distance: f64,
        units: Option<DistanceUnit>,
    ) -> Self {
        Filter::Distance(DistanceFilter {
            op,
            left,
            right,
            distance,
            units,
        })
    }
}

/// Pattern match against a string expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikeFilter {
    pub expr: Expr,
    pub pattern: String,
    #[serde(default = "default_wildcard")]
    pub wildcard: char,
    #[serde(default = "default_single_char")]
    pub single_char: char,
    #[serde(default = "default_escape")]
    pub escape: char,
    #[serde(default = "default_match_case")]
    pub match_case: bool,
}

fn default_wildcard() -> char {
    '%'
}

fn default_single_char() -> char {
    '_'
}

fn default_escape() -> char {
    '\\'
}

fn default_match_case() -> bool {
    true
}

impl LikeFilter {
    /// A case-sensitive pattern using `%`, `_` and `\`.
    pub fn new(expr: Expr, pattern: impl Into<String>) -> Self {
        Self {
            expr,
            pattern: pattern.into(),
            wildcard: default_wildcard(),
            single_char: default_single_char(),
            escape: default_escape(),
            match_case: default_match_case(),
        }
    }

    pub fn match_case(mut self, match_case: bool) -> Self {
        self.match_case = match_case;
        self
    }

    pub fn special_chars(mut self, wildcard: char, single_char: char, escape: char) -> Self {
        self.wildcard = wildcard;
        self.single_char = single_char;
        self.escape = escape;
        self
    }
}

impl From<LikeFilter> for Filter {
    fn from(like: LikeFilter) -> Self {
        Filter::Like(like)
    }
}

/// Binary spatial relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialFilter {
    #[serde(rename = "relation")]
    pub op: SpatialOp,
    pub left: Expr,
    pub right: Expr,
}

/// Distance relation between two geometries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceFilter {
    #[serde(rename = "relation")]
    pub op: DistanceOp,
    pub left: Expr,
    pub right: Expr,
    pub distance: f64,
    #[serde(default)]
    pub units: Option<DistanceUnit>,
}
