//! Query predicates: the attribute `where` clause and the spatial envelope.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Attribute predicate sent as the `where` parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// `1=1`
    All,
    /// Exact match on a categorical field.
    Equals { field: String, value: String },
}

impl Filter {
    pub fn equals(field: &str, value: impl Into<String>) -> Self {
        Filter::Equals {
            field: field.to_string(),
            value: value.into(),
        }
    }

    /// `Equals` when a value is selected, `All` otherwise. An empty selection
    /// counts as no selection.
    pub fn matching(field: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => Filter::equals(field, v),
            _ => Filter::All,
        }
    }

    pub fn to_where(&self) -> String {
        match self {
            Filter::All => "1=1".to_string(),
            Filter::Equals { field, value } => {
                format!("{} = '{}'", field, value.replace('\'', "''"))
            }
        }
    }
}

/// Axis-aligned envelope in WGS84 degrees, the shape of a map viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extent {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl Extent {
    /// Envelope centred on `(x, y)` spanning `half_width`/`half_height` degrees
    /// either side.
    pub fn around(x: f64, y: f64, half_width: f64, half_height: f64) -> Self {
        Self {
            xmin: x - half_width,
            ymin: y - half_height,
            xmax: x + half_width,
            ymax: y + half_height,
        }
    }

    /// `xmin,ymin,xmax,ymax`, the compact envelope form ArcGIS accepts.
    pub fn to_geometry_param(&self) -> String {
        format!("{},{},{},{}", self.xmin, self.ymin, self.xmax, self.ymax)
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_geometry_param())
    }
}

impl FromStr for Extent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("invalid extent '{s}': {e}"))?;

        let &[xmin, ymin, xmax, ymax] = parts.as_slice() else {
            return Err(format!(
                "invalid extent '{s}': expected xmin,ymin,xmax,ymax"
            ));
        };

        if xmin > xmax || ymin > ymax {
            return Err(format!("invalid extent '{s}': min exceeds max"));
        }

        Ok(Extent {
            xmin,
            ymin,
            xmax,
            ymax,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_where_clause() {
        assert_eq!(Filter::All.to_where(), "1=1");
        assert_eq!(
            Filter::equals("NOMGEO", "La Paz").to_where(),
            "NOMGEO = 'La Paz'"
        );
    }

    #[test]
    fn test_where_clause_escapes_quotes() {
        assert_eq!(
            Filter::equals("PROYECTO", "Villa O'Neil").to_where(),
            "PROYECTO = 'Villa O''Neil'"
        );
    }

    #[test]
    fn test_matching_treats_empty_as_all() {
        assert_eq!(Filter::matching("NOMGEO", None), Filter::All);
        assert_eq!(Filter::matching("NOMGEO", Some("")), Filter::All);
        assert_eq!(
            Filter::matching("NOMGEO", Some("Loreto")),
            Filter::equals("NOMGEO", "Loreto")
        );
    }

    #[test]
    fn test_extent_parse() {
        let extent: Extent = "-115.3, 22.1, -105.3, 26.1".parse().unwrap();
        assert_eq!(extent.xmin, -115.3);
        assert_eq!(extent.ymax, 26.1);
        assert_eq!(extent.to_geometry_param(), "-115.3,22.1,-105.3,26.1");
    }

    #[test]
    fn test_extent_parse_rejects_bad_input() {
        assert!("1,2,3".parse::<Extent>().is_err());
        assert!("a,b,c,d".parse::<Extent>().is_err());
        assert!("5,0,1,1".parse::<Extent>().is_err());
    }

    #[test]
    fn test_extent_around() {
        let extent = Extent::around(-110.0, 24.0, 5.0, 3.0);
        assert_eq!(extent, Extent { xmin: -115.0, ymin: 21.0, xmax: -105.0, ymax: 27.0 });
    }
}
