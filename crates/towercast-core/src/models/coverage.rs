use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Parameters for one propagation simulation.
///
/// Every field always carries a value: either the one supplied on the request
/// or the fixed default below. Values are kept as the numeric text the caller
/// sent so the tool sees exactly what was asked for (`40.10` stays `40.10`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageRequest {
    /// Transmitter latitude in degrees
    pub latitude: String,
    /// Transmitter longitude in degrees
    pub longitude: String,
    /// Transmitter height above ground
    pub tx_height: String,
    /// Carrier frequency in MHz
    pub frequency: String,
    /// Effective radiated power in watts
    pub erp: String,
    /// Receiver height above ground
    pub rx_height: String,
    /// Terrain resolution ("rt") threshold passed through to the tool
    pub rt: String,
    /// Simulation radius
    pub radius: String,
    /// Raster resolution
    pub resolution: String,
    /// Propagation model id
    pub propagation_model: String,
}

impl Default for CoverageRequest {
    fn default() -> Self {
        Self {
            latitude: "51.849".to_string(),
            longitude: "-2.2299".to_string(),
            tx_height: "25".to_string(),
            frequency: "450".to_string(),
            erp: "20".to_string(),
            rx_height: "2".to_string(),
            rt: "10".to_string(),
            radius: "10".to_string(),
            resolution: "3600".to_string(),
            propagation_model: "3".to_string(),
        }
    }
}

impl CoverageRequest {
    /// Build a request from flat query parameters.
    ///
    /// Unknown keys are logged and ignored. A recognized key whose value is
    /// not a finite number keeps the default for that field.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let mut request = Self::default();

        for (key, value) in params {
            match key.as_str() {
                "lat" => assign(&mut request.latitude, key, value),
                "lng" => assign(&mut request.longitude, key, value),
                "txh" => assign(&mut request.tx_height, key, value),
                "freq" => assign(&mut request.frequency, key, value),
                "Erp" => assign(&mut request.erp, key, value),
                "rxh" => assign(&mut request.rx_height, key, value),
                "Rt" => assign(&mut request.rt, key, value),
                "R" => assign(&mut request.radius, key, value),
                "Res" => assign(&mut request.resolution, key, value),
                "Pm" => assign(&mut request.propagation_model, key, value),
                _ => tracing::warn!(key = %key, value = %value, "Unknown coverage argument"),
            }
        }

        request
    }
}

fn assign(slot: &mut String, key: &str, value: &str) {
    let text = value.trim();
    match text.parse::<f64>() {
        Ok(number) if number.is_finite() => *slot = text.to_string(),
        _ => tracing::warn!(key = %key, value = %value, "Unparseable coverage argument, keeping default"),
    }
}

/// Metadata describing one finished coverage job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageResult {
    /// Basename of the generated output; `<File>.png` and `<File>.ppm` live beside it
    #[serde(rename = "File")]
    pub file: String,

    /// Bounding box in the order the propagation tool prints it.
    /// Slots the tool did not report stay at 0.0.
    #[serde(rename = "BoundingBox")]
    pub bounding_box: [f64; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_defaults_when_empty() {
        let request = CoverageRequest::from_params(&HashMap::new());
        assert_eq!(request, CoverageRequest::default());
        assert_eq!(request.latitude, "51.849");
        assert_eq!(request.longitude, "-2.2299");
        assert_eq!(request.resolution, "3600");
        assert_eq!(request.propagation_model, "3");
    }

    #[test]
    fn test_recognized_keys_override_defaults() {
        let request = CoverageRequest::from_params(&params(&[
            ("lat", "40.1"),
            ("lng", "-83.5"),
            ("txh", "30"),
            ("freq", "5800"),
            ("Erp", "4"),
            ("rxh", "3"),
            ("Rt", "-90"),
            ("R", "5"),
            ("Res", "1200"),
            ("Pm", "1"),
        ]));

        assert_eq!(request.latitude, "40.1");
        assert_eq!(request.longitude, "-83.5");
        assert_eq!(request.tx_height, "30");
        assert_eq!(request.frequency, "5800");
        assert_eq!(request.erp, "4");
        assert_eq!(request.rx_height, "3");
        assert_eq!(request.rt, "-90");
        assert_eq!(request.radius, "5");
        assert_eq!(request.resolution, "1200");
        assert_eq!(request.propagation_model, "1");
    }

    #[test]
    fn test_numeric_text_is_kept_as_sent() {
        let request = CoverageRequest::from_params(&params(&[
            ("lat", "40.10"),
            ("Pm", "1.0"),
            ("Res", "3600.0"),
            ("R", " 7.5 "),
        ]));

        assert_eq!(request.latitude, "40.10");
        assert_eq!(request.propagation_model, "1.0");
        assert_eq!(request.resolution, "3600.0");
        assert_eq!(request.radius, "7.5");
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let request = CoverageRequest::from_params(&params(&[("foo", "bar"), ("lat", "10")]));
        assert_eq!(request.latitude, "10");
        assert_eq!(request.longitude, CoverageRequest::default().longitude);
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        // "erp" is not "Erp"
        let request = CoverageRequest::from_params(&params(&[("erp", "99")]));
        assert_eq!(request.erp, "20");
    }

    #[test]
    fn test_unparseable_value_keeps_default() {
        let request = CoverageRequest::from_params(&params(&[
            ("Res", "high"),
            ("lat", "NaN"),
            ("R", ""),
            ("Pm", "1; rm -rf /"),
        ]));
        assert_eq!(request, CoverageRequest::default());
    }

    #[test]
    fn test_result_serializes_with_wire_names() {
        let result = CoverageResult {
            file: "output-abc".to_string(),
            bounding_box: [51.9, 51.7, -2.1, -2.3],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["File"], "output-abc");
        assert_eq!(json["BoundingBox"][0], 51.9);
        assert_eq!(json["BoundingBox"].as_array().unwrap().len(), 4);
    }
}
