use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Binary comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl CompareOp {
    pub const ALL: [CompareOp; 6] = [
        CompareOp::Eq,
        CompareOp::Ne,
        CompareOp::Lt,
        CompareOp::Lte,
        CompareOp::Gt,
        CompareOp::Gte,
    ];

    /// SQL spelling of the operator.
    pub fn as_sql(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "<>",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
        }
    }
}

/// Binary spatial relations between two geometries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpatialOp {
    /// Envelope intersection.
    #[serde(rename = "bbox")]
    BBox,
    Contains,
    Crosses,
    Disjoint,
    Equals,
    Intersects,
    Overlaps,
    Touches,
    Within,
}

impl SpatialOp {
    pub const ALL: [SpatialOp; 9] = [
        SpatialOp::BBox,
        SpatialOp::Contains,
        SpatialOp::Crosses,
        SpatialOp::Disjoint,
        SpatialOp::Equals,
        SpatialOp::Intersects,
        SpatialOp::Overlaps,
        SpatialOp::Touches,
        SpatialOp::Within,
    ];

    /// The relation that holds when the two operands are exchanged.
    ///
    /// `a WITHIN b` is `b CONTAINS a`; every other relation is symmetric.
    pub fn converse(self) -> Self {
        match self {
            SpatialOp::Within => SpatialOp::Contains,
            SpatialOp::Contains => SpatialOp::Within,
            op => op,
        }
    }

    /// Whether operand order changes the meaning of the relation.
    pub fn is_directional(self) -> bool {
        self.converse() != self
    }

    /// Keyword used in the text filter syntax.
    pub fn keyword(&self) -> &'static str {
        match self {
            SpatialOp::BBox => "BBOX",
            SpatialOp::Contains => "CONTAINS",
            SpatialOp::Crosses => "CROSSES",
            SpatialOp::Disjoint => "DISJOINT",
            SpatialOp::Equals => "EQUALS",
            SpatialOp::Intersects => "INTERSECTS",
            SpatialOp::Overlaps => "OVERLAPS",
            SpatialOp::Touches => "TOUCHES",
            SpatialOp::Within => "WITHIN",
        }
    }
}

impl fmt::Display for SpatialOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Distance-based spatial relations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceOp {
    /// Geometries are within the given distance of each other.
    #[serde(rename = "dwithin")]
    DWithin,
    /// Geometries are farther apart than the given distance.
    Beyond,
}

impl DistanceOp {
    pub const ALL: [DistanceOp; 2] = [DistanceOp::DWithin, DistanceOp::Beyond];

    pub fn keyword(&self) -> &'static str {
        match self {
            DistanceOp::DWithin => "DWITHIN",
            DistanceOp::Beyond => "BEYOND",
        }
    }
}

impl fmt::Display for DistanceOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Units a distance predicate can be expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    Meters,
    Kilometers,
    Feet,
    Miles,
    NauticalMiles,
}

impl DistanceUnit {
    /// Convert a distance in these units to meters.
    pub fn to_meters(self, distance: f64) -> f64 {
        match self {
            DistanceUnit::Meters => distance,
            DistanceUnit::Kilometers => distance * 1000.0,
            DistanceUnit::Feet => distance * 0.3048,
            DistanceUnit::Miles => distance * 1609.344,
            DistanceUnit::NauticalMiles => distance * 1852.0,
        }
    }
}

impl FromStr for DistanceUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "m" | "meter" | "meters" | "metre" | "metres" => Ok(DistanceUnit::Meters),
            "km" | "kilometer" | "kilometers" | "kilometre" | "kilometres" => {
                Ok(DistanceUnit::Kilometers)
            }
            "ft" | "foot" | "feet" => Ok(DistanceUnit::Feet),
            "mi" | "mile" | "miles" | "statute miles" => Ok(DistanceUnit::Miles),
            "nm" | "nautical miles" | "nautical_miles" => Ok(DistanceUnit::NauticalMiles),
            other => Err(format!("unknown distance unit '{}'", other)),
        }
    }
}
