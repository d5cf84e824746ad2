use serde::{Deserialize, Serialize};

/// How a geometry arrived on the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryForm {
    /// Legacy flat lon/lat token list, rendered as WKT
    CoordinateList,
    /// GeoJSON literal handed to the database unparsed
    GeoJson,
}

/// A request geometry, ready to be bound as a query parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Geometry {
    /// `POLYGON((lon lat,lon lat,...))` built from a coordinate list
    Polygon(String),
    /// GeoJSON text exactly as received
    GeoJson(String),
}

impl Geometry {
    pub fn form(&self) -> GeometryForm {
        match self {
            Geometry::Polygon(_) => GeometryForm::CoordinateList,
            Geometry::GeoJson(_) => GeometryForm::GeoJson,
        }
    }

    /// Text bound to the positional parameter
    pub fn as_param(&self) -> &str {
        match self {
            Geometry::Polygon(wkt) => wkt,
            Geometry::GeoJson(literal) => literal,
        }
    }

    pub fn into_param(self) -> String {
        match self {
            Geometry::Polygon(wkt) => wkt,
            Geometry::GeoJson(literal) => literal,
        }
    }
}

/// Include geometry plus an optional exclusion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeometryPredicate {
    pub include: Geometry,
    pub exclude: Option<Geometry>,
}

impl GeometryPredicate {
    pub fn new(include: Geometry) -> Self {
        Self { include, exclude: None }
    }

    pub fn excluding(mut self, exclude: Geometry) -> Self {
        self.exclude = Some(exclude);
        self
    }

    pub fn has_exclusion(&self) -> bool {
        self.exclude.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_form() {
        assert_eq!(
            Geometry::Polygon("POLYGON((0 0,1 1))".into()).form(),
            GeometryForm::CoordinateList
        );
        assert_eq!(Geometry::GeoJson("{}".into()).form(), GeometryForm::GeoJson);
    }

    #[test]
    fn test_predicate_builder() {
        let predicate = GeometryPredicate::new(Geometry::GeoJson("{\"type\":\"Point\"}".into()));
        assert!(!predicate.has_exclusion());

        let predicate = predicate.excluding(Geometry::Polygon("POLYGON((0 0,1 1))".into()));
        assert!(predicate.has_exclusion());
        assert_eq!(predicate.exclude.as_ref().unwrap().as_param(), "POLYGON((0 0,1 1))");
    }
}
