use chrono::{NaiveDate, NaiveDateTime};
use geo_types::{Geometry, LineString};
use serde::{Deserialize, Serialize};
use std::fmt;
use wkt::{ToWkt, TryFromWkt};

use crate::error::{FilterError, FilterResult};
use crate::schema::Binding;

/// A constant value in a filter expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
    /// NULL value
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Float
    Float(f64),
    /// String
    String(String),
    /// Calendar date
    Date(NaiveDate),
    /// Date and time without zone
    Timestamp(NaiveDateTime),
    /// Geometry, optionally tagged with an SRID
    Geometry(GeometryValue),
}

impl Literal {
    /// Short name of the literal kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Literal::Null => "null",
            Literal::Bool(_) => "boolean",
            Literal::Int(_) => "integer",
            Literal::Float(_) => "float",
            Literal::String(_) => "string",
            Literal::Date(_) => "date",
            Literal::Timestamp(_) => "timestamp",
            Literal::Geometry(_) => "geometry",
        }
    }

    /// The value type this literal carries on its own.
    pub fn binding(&self) -> Option<Binding> {
        match self {
            Literal::Null => None,
            Literal::Bool(_) => Some(Binding::Boolean),
            Literal::Int(_) => Some(Binding::Long),
            Literal::Float(_) => Some(Binding::Double),
            Literal::String(_) => Some(Binding::String),
            Literal::Date(_) => Some(Binding::Date),
            Literal::Timestamp(_) => Some(Binding::Timestamp),
            Literal::Geometry(_) => Some(Binding::Geometry),
        }
    }

    /// Evaluate the literal as a geometry. Strings are read as WKT/EWKT; text
    /// that is not a geometry is a coercion failure like any other type.
    pub fn to_geometry(&self) -> FilterResult<GeometryValue> {
        match self {
            Literal::Geometry(value) => Ok(value.clone()),
            Literal::String(text) => GeometryValue::from_ewkt(text)
                .map_err(|_| FilterError::coercion("geometry", "string")),
            other => Err(FilterError::coercion("geometry", other.kind())),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => write!(f, "NULL"),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Int(n) => write!(f, "{}", n),
            Literal::Float(n) => write!(f, "{}", n),
            Literal::String(s) => write!(f, "'{}'", s),
            Literal::Date(d) => write!(f, "{}", d),
            Literal::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%dT%H:%M:%S%.f")),
            Literal::Geometry(g) => write!(f, "{}", g.to_ewkt()),
        }
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Bool(b)
    }
}

impl From<i32> for Literal {
    fn from(n: i32) -> Self {
        Literal::Int(n as i64)
    }
}

impl From<i64> for Literal {
    fn from(n: i64) -> Self {
        Literal::Int(n)
    }
}

impl From<f64> for Literal {
    fn from(n: f64) -> Self {
        Literal::Float(n)
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::String(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::String(s)
    }
}

impl From<GeometryValue> for Literal {
    fn from(g: GeometryValue) -> Self {
        Literal::Geometry(g)
    }
}

/// Shape of a geometry value.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Any geometry PostGIS can read back from WKT.
    Geometry(Geometry<f64>),
    /// A closed line string that is meant as a ring. There is no WKT ring
    /// literal on the SQL side, so rings are emitted as line strings.
    Ring(LineString<f64>),
}

/// A geometry literal with an optional SRID tag.
///
/// Serializes as EWKT (`SRID=4326;POINT(1 2)`); rings use the
/// `LINEARRING` keyword so they survive a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GeometryValue {
    pub shape: Shape,
    pub srid: Option<i32>,
}

impl GeometryValue {
    pub fn new(geometry: impl Into<Geometry<f64>>) -> Self {
        Self {
            shape: Shape::Geometry(geometry.into()),
            srid: None,
        }
    }

    /// Build a ring. The line string must be closed.
    pub fn ring(line: LineString<f64>) -> FilterResult<Self> {
        if !line.is_closed() || line.0.len() < 4 {
            return Err(FilterError::InvalidGeometry(
                "a linear ring must be closed and have at least four points".to_string(),
            ));
        }
        Ok(Self {
            shape: Shape::Ring(line),
            srid: None,
        })
    }

    pub fn with_srid(mut self, srid: i32) -> Self {
        self.srid = Some(srid);
        self
    }

    pub fn is_ring(&self) -> bool {
        matches!(self.shape, Shape::Ring(_))
    }

    /// Parse WKT or EWKT (`SRID=n;<wkt>`). `LINEARRING(...)` is accepted and
    /// produces a ring.
    pub fn from_ewkt(text: &str) -> FilterResult<Self> {
        let text = text.trim();
        let (srid, body) = split_srid(text)?;

        let value = if starts_with_keyword(body, "LINEARRING") {
            let line = format!("LINESTRING{}", &body["LINEARRING".len()..]);
            match parse_wkt(&line)? {
                Geometry::LineString(ls) => Self::ring(ls)?,
                _ => return Err(FilterError::InvalidGeometry(body.to_string())),
            }
        } else {
            Self::new(parse_wkt(body)?)
        };

        Ok(match srid {
            Some(srid) => value.with_srid(srid),
            None => value,
        })
    }

    /// The geometry as it can be written to SQL: rings become line strings.
    pub fn to_emittable(&self) -> Geometry<f64> {
        match &self.shape {
            Shape::Geometry(g) => g.clone(),
            Shape::Ring(ring) => Geometry::LineString(ring.clone()),
        }
    }

    /// Plain WKT of the emittable geometry, without SRID.
    pub fn to_wkt(&self) -> String {
        self.to_emittable().wkt_string()
    }

    /// EWKT including the SRID tag and the ring keyword.
    pub fn to_ewkt(&self) -> String {
        let mut body = self.to_wkt();
        if self.is_ring() && body.starts_with("LINESTRING") {
            body = format!("LINEARRING{}", &body["LINESTRING".len()..]);
        }
        match self.srid {
            Some(srid) => format!("SRID={};{}", srid, body),
            None => body,
        }
    }
}

impl TryFrom<String> for GeometryValue {
    type Error = FilterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        GeometryValue::from_ewkt(&value)
    }
}

impl From<GeometryValue> for String {
    fn from(value: GeometryValue) -> Self {
        value.to_ewkt()
    }
}

fn parse_wkt(text: &str) -> FilterResult<Geometry<f64>> {
    Geometry::<f64>::try_from_wkt_str(text)
        .map_err(|e| FilterError::InvalidGeometry(format!("{}: {}", text, e)))
}

fn split_srid(text: &str) -> FilterResult<(Option<i32>, &str)> {
    if !starts_with_keyword(text, "SRID=") {
        return Ok((None, text));
    }
    let rest = &text["SRID=".len()..];
    let (srid, body) = rest
        .split_once(';')
        .ok_or_else(|| FilterError::InvalidGeometry(format!("missing ';' after SRID in {}", text)))?;
    let srid = srid
        .trim()
        .parse::<i32>()
        .map_err(|_| FilterError::InvalidGeometry(format!("invalid SRID '{}'", srid)))?;
    Ok((Some(srid), body.trim()))
}

fn starts_with_keyword(text: &str, keyword: &str) -> bool {
    text.len() >= keyword.len()
        && text.is_char_boundary(keyword.len())
        && text[..keyword.len()].eq_ignore_ascii_case(keyword)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{line_string, point};

    #[test]
    fn test_parse_ewkt_srid() {
        let value = GeometryValue::from_ewkt("SRID=4326;POINT(1 2)").unwrap();
        assert_eq!(value.srid, Some(4326));
        assert_eq!(value.shape, Shape::Geometry(point!(x: 1.0, y: 2.0).into()));
    }

    #[test]
    fn test_parse_plain_wkt_has_no_srid() {
        let value = GeometryValue::from_ewkt("POINT(1 2)").unwrap();
        assert_eq!(value.srid, None);
        assert!(!value.is_ring());
    }

    #[test]
    fn test_linearring_parses_to_ring() {
        let value = GeometryValue::from_ewkt("LINEARRING(0 0, 1 0, 1 1, 0 0)").unwrap();
        assert!(value.is_ring());
        assert!(value.to_wkt().starts_with("LINESTRING"));
        assert!(value.to_ewkt().starts_with("LINEARRING"));
    }

    #[test]
    fn test_open_ring_is_rejected() {
        let open = line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 2.0, y: 2.0)];
        assert!(GeometryValue::ring(open).is_err());
        assert!(GeometryValue::from_ewkt("LINEARRING(0 0, 1 0, 1 1, 2 2)").is_err());
    }

    #[test]
    fn test_bad_srid() {
        let err = GeometryValue::from_ewkt("SRID=abc;POINT(1 2)").unwrap_err();
        assert!(matches!(err, FilterError::InvalidGeometry(_)));
    }

    #[test]
    fn test_to_geometry_coercion() {
        assert!(Literal::from("POINT(3 4)").to_geometry().is_ok());
        let err = Literal::Bool(true).to_geometry().unwrap_err();
        assert_eq!(err.to_string(), "Cannot convert boolean literal to geometry");
    }

    #[test]
    fn test_non_wkt_text_is_coercion_failure() {
        let err = Literal::from("hello").to_geometry().unwrap_err();
        assert!(matches!(err, FilterError::Coercion { expected: "geometry", found: "string" }));
    }

    #[test]
    fn test_geometry_serializes_as_ewkt() {
        let value = GeometryValue::new(point!(x: 1.0, y: 2.0)).with_srid(3857);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, format!("\"SRID=3857;{}\"", value.to_wkt()));
        let back: GeometryValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }
}
