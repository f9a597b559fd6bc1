use crate::ast::*;
use crate::transpiler::capabilities::{Capabilities, Capability};

/// Functions PostGIS can translate when function encoding is enabled.
pub const ENCODED_FUNCTIONS: [FunctionName; 14] = [
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

/// Base SQL capabilities plus every spatial and distance relation, and the
/// string/math functions when `encode_functions` is set.
pub fn postgis_capabilities(encode_functions: bool) -> Capabilities {
    let mut caps = Capabilities::base();
    caps.extend(SpatialOp::ALL.into_iter().map(Capability::Spatial));
    caps.extend(DistanceOp::ALL.into_iter().map(Capability::Distance));
    if encode_functions {
        caps.extend(ENCODED_FUNCTIONS.into_iter().map(Capability::Function));
    }
    caps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spatial_always_supported() {
        let caps = postgis_capabilities(false);
        for op in SpatialOp::ALL {
            assert!(caps.supports(&Capability::Spatial(op)));
        }
        assert!(caps.supports(&Capability::Distance(DistanceOp::Beyond)));
        assert!(caps.supports(&Capability::Like));
    }

    #[test]
    fn test_functions_gated_by_flag() {
        let concat = Capability::Function(FunctionName::StrConcat);
        assert!(!postgis_capabilities(false).supports(&concat));
        assert!(postgis_capabilities(true).supports(&concat));
        assert_eq!(
            postgis_capabilities(true).len(),
            postgis_capabilities(false).len() + ENCODED_FUNCTIONS.len()
        );
    }

    #[test]
    fn test_unknown_function_never_supported() {
        let area = Capability::Function(FunctionName::Other("area".to_string()));
        assert!(!postgis_capabilities(true).supports(&area));
    }
}
