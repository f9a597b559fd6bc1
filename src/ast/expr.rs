use serde::{Deserialize, Serialize};
use std::fmt;

use super::values::Literal;
use crate::error::{FilterError, FilterResult};

/// An expression operand inside a filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    /// Reference to a feature attribute (column).
    Property(String),
    /// Constant value.
    Literal(Literal),
    /// Function call.
    Function(Function),
}

impl Expr {
    pub fn property(name: impl Into<String>) -> Self {
        Expr::Property(name.into())
    }

    pub fn literal(value: impl Into<Literal>) -> Self {
        Expr::Literal(value.into())
    }

    pub fn function(name: impl AsRef<str>, args: Vec<Expr>) -> Self {
        Expr::Function(Function::new(name, args))
    }

    pub fn as_property(&self) -> Option<&str> {
        match self {
            Expr::Property(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Expr::Literal(lit) => Some(lit),
            _ => None,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Property(name) => write!(f, "{}", name),
            Expr::Literal(lit) => write!(f, "{}", lit),
            Expr::Function(func) => write!(f, "{}", func),
        }
    }
}

/// Filter functions with a known meaning. Anything else is kept by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FunctionName {
    StrConcat,
    StrEndsWith,
    StrStartsWith,
    StrEqualsIgnoreCase,
    StrIndexOf,
    StrLength,
    StrToLowerCase,
    StrToUpperCase,
    StrSubstring,
    StrSubstringStart,
    StrTrim,
    Abs,
    Ceil,
    Floor,
    Other(String),
}

impl FunctionName {
    const KNOWN: [FunctionName; 14] = [
        FunctionName::StrConcat,
        FunctionName::StrEndsWith,
        FunctionName::StrStartsWith,
        FunctionName::StrEqualsIgnoreCase,
        FunctionName::StrIndexOf,
        FunctionName::StrLength,
        FunctionName::StrToLowerCase,
        FunctionName::StrToUpperCase,
        FunctionName::StrSubstring,
        FunctionName::StrSubstringStart,
        FunctionName::StrTrim,
        FunctionName::Abs,
        FunctionName::Ceil,
        FunctionName::Floor,
    ];

    /// Resolve a function name, case-insensitively.
    pub fn parse(name: &str) -> Self {
        Self::KNOWN
            .iter()
            .find(|known| known.as_str().eq_ignore_ascii_case(name))
            .cloned()
            .unwrap_or_else(|| FunctionName::Other(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            FunctionName::StrConcat => "strConcat",
            FunctionName::StrEndsWith => "strEndsWith",
            FunctionName::StrStartsWith => "strStartsWith",
            FunctionName::StrEqualsIgnoreCase => "strEqualsIgnoreCase",
            FunctionName::StrIndexOf => "strIndexOf",
            FunctionName::StrLength => "strLength",
            FunctionName::StrToLowerCase => "strToLowerCase",
            FunctionName::StrToUpperCase => "strToUpperCase",
            FunctionName::StrSubstring => "strSubstring",
            FunctionName::StrSubstringStart => "strSubstringStart",
            FunctionName::StrTrim => "strTrim",
            FunctionName::Abs => "abs",
            FunctionName::Ceil => "ceil",
            FunctionName::Floor => "floor",
            FunctionName::Other(name) => name,
        }
    }
}

impl From<String> for FunctionName {
    fn from(name: String) -> Self {
        FunctionName::parse(&name)
    }
}

impl From<FunctionName> for String {
    fn from(name: FunctionName) -> Self {
        name.as_str().to_string()
    }
}

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A function call expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: FunctionName,
    #[serde(default)]
    pub args: Vec<Expr>,
}

impl Function {
    pub fn new(name: impl AsRef<str>, args: Vec<Expr>) -> Self {
        Self {
            name: FunctionName::parse(name.as_ref()),
            args,
        }
    }

    /// Positional argument, or an arity error naming this function.
    pub fn arg(&self, index: usize) -> FilterResult<&Expr> {
        self.args.get(index).ok_or_else(|| FilterError::Arity {
            function: self.name.to_string(),
            expected: index + 1,
            found: self.args.len(),
        })
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, ")")
    }
}
