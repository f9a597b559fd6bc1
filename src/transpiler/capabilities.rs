//! Capability sets: which filter and function kinds a dialect can translate.

use std::collections::BTreeSet;
use std::fmt;

use crate::ast::*;

/// One translatable node kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    Include,
    Exclude,
    And,
    Or,
    Not,
    Compare(CompareOp),
    Between,
    IsNull,
    Like,
    Spatial(SpatialOp),
    Distance(DistanceOp),
    Function(FunctionName),
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Include => write!(f, "INCLUDE"),
            Capability::Exclude => write!(f, "EXCLUDE"),
            Capability::And => write!(f, "AND"),
            Capability::Or => write!(f, "OR"),
            Capability::Not => write!(f, "NOT"),
            Capability::Compare(op) => write!(f, "{}", op.as_sql()),
            Capability::Between => write!(f, "BETWEEN"),
            Capability::IsNull => write!(f, "IS NULL"),
            Capability::Like => write!(f, "LIKE"),
            Capability::Spatial(op) => write!(f, "{}", op),
            Capability::Distance(op) => write!(f, "{}", op),
            Capability::Function(name) => write!(f, "{}()", name),
        }
    }
}

/// An immutable-after-construction set of capabilities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities {
    supported: BTreeSet<Capability>,
}

impl Capabilities {
    pub fn new() -> Self {
        Self::default()
    }

    /// What every SQL database handles: logic, comparisons, BETWEEN,
    /// NULL checks and LIKE.
    pub fn base() -> Self {
        let mut caps = Self::new();
        caps.extend([
            Capability::Include,
            Capability::Exclude,
            Capability::And,
            Capability::Or,
            Capability::Not,
            Capability::Between,
            Capability::IsNull,
            Capability::Like,
        ]);
        caps.extend(CompareOp::ALL.into_iter().map(Capability::Compare));
        caps
    }

    pub fn add(&mut self, capability: Capability) {
        self.supported.insert(capability);
    }

    pub fn with(mut self, capability: Capability) -> Self {
        self.add(capability);
        self
    }

    pub fn supports(&self, capability: &Capability) -> bool {
        self.supported.contains(capability)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Capability> {
        self.supported.iter()
    }

    pub fn len(&self) -> usize {
        self.supported.len()
    }

    pub fn is_empty(&self) -> bool {
        self.supported.is_empty()
    }

    /// Whether every node of `filter`, functions included, is supported.
    pub fn fully_supports(&self, filter: &Filter) -> bool {
        self.first_unsupported(filter).is_none()
    }

    /// The first node kind of `filter` (depth first) outside this set.
    pub fn first_unsupported(&self, filter: &Filter) -> Option<Capability> {
        let own = match filter {
            Filter::Include => Capability::Include,
            Filter::Exclude => Capability::Exclude,
            Filter::And { .. } => Capability::And,
            Filter::Or { .. } => Capability::Or,
            Filter::Not { .. } => Capability::Not,
            Filter::Compare { op, .. } => Capability::Compare(*op),
            Filter::Between { .. } => Capability::Between,
            Filter::IsNull { .. } => Capability::IsNull,
            Filter::Like(_) => Capability::Like,
            Filter::Spatial(s) => Capability::Spatial(s.op),
            Filter::Distance(d) => Capability::Distance(d.op),
        };
        if !self.supports(&own) {
            return Some(own);
        }

        match filter {
            Filter::Include | Filter::Exclude => None,
            Filter::And { filters } | Filter::Or { filters } => {
                filters.iter().find_map(|f| self.first_unsupported(f))
            }
            Filter::Not { filter } => self.first_unsupported(filter),
            Filter::Compare { left, right, .. } => self
                .first_unsupported_expr(left)
                .or_else(|| self.first_unsupported_expr(right)),
            Filter::Between { expr, lower, upper } => [expr, lower, upper]
                .into_iter()
                .find_map(|e| self.first_unsupported_expr(e)),
            Filter::IsNull { expr } => self.first_unsupported_expr(expr),
            Filter::Like(like) => self.first_unsupported_expr(&like.expr),
            Filter::Spatial(s) => self
                .first_unsupported_expr(&s.left)
                .or_else(|| self.first_unsupported_expr(&s.right)),
            Filter::Distance(d) => self
                .first_unsupported_expr(&d.left)
                .or_else(|| self.first_unsupported_expr(&d.right)),
        }
    }

    fn first_unsupported_expr(&self, expr: &Expr) -> Option<Capability> {
        match expr {
            Expr::Property(_) | Expr::Literal(_) => None,
            Expr::Function(function) => {
                let own = Capability::Function(function.name.clone());
                if !self.supports(&own) {
                    return Some(own);
                }
                function
                    .args
                    .iter()
                    .find_map(|arg| self.first_unsupported_expr(arg))
            }
        }
    }
}

impl Extend<Capability> for Capabilities {
    fn extend<T: IntoIterator<Item = Capability>>(&mut self, iter: T) {
        self.supported.extend(iter);
    }
}

impl FromIterator<Capability> for Capabilities {
    fn from_iter<T: IntoIterator<Item = Capability>>(iter: T) -> Self {
        Self {
            supported: iter.into_iter().collect(),
        }
    }
}
