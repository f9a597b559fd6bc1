//! Feature type metadata: which attributes exist and how they are stored.
//!
//! The translator consults this to pick geography vs geometry encodings, to
//! resolve constant SRIDs, and to coerce literals toward an attribute's type.

use serde::{Deserialize, Serialize};

/// Declared value type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Binding {
    String,
    Boolean,
    Short,
    Integer,
    Long,
    Float,
    Double,
    BigInteger,
    BigDecimal,
    Date,
    Time,
    Timestamp,
    Geometry,
}

impl Binding {
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Binding::Short
                | Binding::Integer
                | Binding::Long
                | Binding::Float
                | Binding::Double
                | Binding::BigInteger
                | Binding::BigDecimal
        )
    }

    pub fn is_integral(&self) -> bool {
        matches!(
            self,
            Binding::Short | Binding::Integer | Binding::Long | Binding::BigInteger
        )
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, Binding::Date | Binding::Time | Binding::Timestamp)
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Binding::String)
    }

    /// Standard SQL type name, used by `CAST(... AS ...)`.
    pub fn sql_type(&self) -> &'static str {
        match self {
            Binding::String => "VARCHAR",
            Binding::Boolean => "BOOLEAN",
            Binding::Short => "SMALLINT",
            Binding::Integer => "INTEGER",
            Binding::Long => "BIGINT",
            Binding::Float => "REAL",
            Binding::Double => "DOUBLE PRECISION",
            Binding::BigInteger => "NUMERIC",
            Binding::BigDecimal => "DECIMAL",
            Binding::Date => "DATE",
            Binding::Time => "TIME",
            Binding::Timestamp => "TIMESTAMP",
            Binding::Geometry => "GEOMETRY",
        }
    }
}

/// How a spatial column is stored natively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    /// Planar `geometry` column.
    #[default]
    Geometry,
    /// Geodetic `geography` column.
    Geography,
}

/// One attribute (column) of a feature type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDescriptor {
    pub name: String,
    pub binding: Binding,
    /// Native storage of a geometry attribute.
    #[serde(default)]
    pub storage: StorageKind,
    /// Declared SRID of a geometry attribute.
    #[serde(default)]
    pub srid: Option<i32>,
}

impl AttributeDescriptor {
    pub fn new(name: impl Into<String>, binding: Binding) -> Self {
        Self {
            name: name.into(),
            binding,
            storage: StorageKind::Geometry,
            srid: None,
        }
    }

    /// A `geometry` column with an optional declared SRID.
    pub fn geometry(name: impl Into<String>, srid: Option<i32>) -> Self {
        Self {
            srid,
            ..Self::new(name, Binding::Geometry)
        }
    }

    /// A `geography` column with an optional declared SRID.
    pub fn geography(name: impl Into<String>, srid: Option<i32>) -> Self {
        Self {
            storage: StorageKind::Geography,
            srid,
            ..Self::new(name, Binding::Geometry)
        }
    }

    pub fn is_geometry(&self) -> bool {
        self.binding == Binding::Geometry
    }
}

/// The attributes of one feature table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureType {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<AttributeDescriptor>,
}

impl FeatureType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, attribute: AttributeDescriptor) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Look up an attribute by name. Exact matches win over case-insensitive ones.
    pub fn attribute(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .or_else(|| {
                self.attributes
                    .iter()
                    .find(|a| a.name.eq_ignore_ascii_case(name))
            })
    }

    /// The first geometry attribute, if any.
    pub fn default_geometry(&self) -> Option<&AttributeDescriptor> {
        self.attributes.iter().find(|a| a.is_geometry())
    }
}
