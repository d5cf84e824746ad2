use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// State and territory FIPS codes with no market data coverage:
/// American Samoa, Guam, Northern Mariana Islands, Puerto Rico, US Virgin Islands.
pub const EXCLUDED_FIPS: [u32; 5] = [60, 66, 69, 72, 78];

/// Check whether a state/territory code falls outside the covered dataset.
///
/// Codes arrive as text (`"39"`, `"072"`); anything that does not parse as an
/// integer is treated as covered, matching a lookup-with-default on the code.
pub fn is_fips_excluded(code: &str) -> bool {
    code.trim()
        .parse::<u32>()
        .map(|fips| EXCLUDED_FIPS.contains(&fips))
        .unwrap_or(false)
}

/// Outcome code carried in every market response body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorCode {
    #[default]
    Success,
    /// Statement or row-scan failure
    QueryFailure,
    /// The geospatial data store could not be reached
    ConnectionFailure,
}

impl ErrorCode {
    pub fn code(self) -> i32 {
        match self {
            ErrorCode::Success => 0,
            ErrorCode::QueryFailure => -1,
            ErrorCode::ConnectionFailure => -2,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(ErrorCode::Success),
            -1 => Some(ErrorCode::QueryFailure),
            -2 => Some(ErrorCode::ConnectionFailure),
            _ => None,
        }
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.code())
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = i32::deserialize(deserializer)?;
        ErrorCode::from_code(code)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown error code {}", code)))
    }
}

/// Common behaviour of the typed market records
pub trait MarketRecord: Default + Serialize {
    fn error(&self) -> ErrorCode;

    fn set_error(&mut self, error: ErrorCode);

    /// Empty record carrying only an error code
    fn failed(error: ErrorCode) -> Self {
        let mut record = Self::default();
        record.set_error(error);
        record
    }
}

/// Number of building footprints intersecting the region
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildingCount {
    pub error: ErrorCode,
    #[serde(rename = "buildingcount")]
    pub building_count: i64,
}

/// Building footprints intersecting the region, as GeoJSON strings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildingPolygons {
    pub error: ErrorCode,
    /// Always the number of rows returned
    #[serde(rename = "numbuildings")]
    pub num_buildings: usize,
    pub polygons: Vec<String>,
}

/// Average household income over intersecting buildings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncomeAverage {
    pub error: ErrorCode,
    #[serde(rename = "avgincome")]
    pub avg_income: f64,
    #[serde(rename = "avgerror")]
    pub avg_error: f64,
}

/// Broadband providers serving the region, fastest advertised download first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Competitors {
    pub error: ErrorCode,
    pub competitors: Vec<String>,
    #[serde(rename = "down_ad_speed")]
    pub max_down: Vec<f64>,
    #[serde(rename = "up_ad_speed")]
    pub max_up: Vec<f64>,
    /// Distinct technology codes per provider
    #[serde(rename = "tech_used")]
    pub tech_codes: Vec<Vec<i32>>,
}

/// RDOF auction census block groups in the region, as parallel columns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RdofAuctions {
    pub error: ErrorCode,
    #[serde(rename = "censusblockgroup")]
    pub census_block_group: Vec<String>,
    pub county: Vec<String>,
    pub geojson: Vec<String>,
    pub reserve: Vec<f64>,
    pub locations: Vec<i64>,
}

/// Whether precomputed market data covers any part of the region
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataAvailability {
    pub error: ErrorCode,
    pub data: bool,
}

macro_rules! impl_market_record {
    ($($record:ty),* $(,)?) => {
        $(
            impl MarketRecord for $record {
                fn error(&self) -> ErrorCode {
                    self.error
                }

                fn set_error(&mut self, error: ErrorCode) {
                    self.error = error;
                }
            }
        )*
    };
}

impl_market_record!(
    BuildingCount,
    BuildingPolygons,
    IncomeAverage,
    Competitors,
    RdofAuctions,
    DataAvailability,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fips_exclusion() {
        for code in ["60", "66", "69", "72", "78", "072"] {
            assert!(is_fips_excluded(code), "{} should be excluded", code);
        }
        for code in ["39", "06", "11", "not-a-code", ""] {
            assert!(!is_fips_excluded(code), "{} should be covered", code);
        }
    }

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::QueryFailure.code(), -1);
        assert_eq!(ErrorCode::ConnectionFailure.code(), -2);
        assert_eq!(ErrorCode::from_code(-2), Some(ErrorCode::ConnectionFailure));
        assert_eq!(ErrorCode::from_code(7), None);
    }

    #[test]
    fn test_failed_record_serializes_error_field() {
        let json = serde_json::to_value(BuildingCount::failed(ErrorCode::ConnectionFailure)).unwrap();
        assert_eq!(json["error"], -2);
        assert_eq!(json["buildingcount"], 0);
    }

    #[test]
    fn test_wire_field_names() {
        let competitors = Competitors {
            error: ErrorCode::Success,
            competitors: vec!["Acme Fiber".into()],
            max_down: vec![1000.0],
            max_up: vec![500.0],
            tech_codes: vec![vec![50]],
        };
        let json = serde_json::to_value(&competitors).unwrap();
        assert_eq!(json["error"], 0);
        assert_eq!(json["down_ad_speed"][0], 1000.0);
        assert_eq!(json["up_ad_speed"][0], 500.0);
        assert_eq!(json["tech_used"][0][0], 50);

        let income = serde_json::to_value(IncomeAverage::default()).unwrap();
        assert!(income.get("avgincome").is_some());
        assert!(income.get("avgerror").is_some());

        let rdof = serde_json::to_value(RdofAuctions::default()).unwrap();
        assert!(rdof.get("censusblockgroup").is_some());

        let polygons = serde_json::to_value(BuildingPolygons::default()).unwrap();
        assert_eq!(polygons["numbuildings"], 0);
    }
}
