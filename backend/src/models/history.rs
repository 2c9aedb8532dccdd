//! Persisted history records.

use serde::{Deserialize, Serialize};

use super::air_quality::{AirQualityLevel, EstimationResult, InputSet};

/// One calculation run as stored in the history file.
///
/// The inputs are flattened next to the result so each element of the
/// persisted JSON array has the keys
/// `traffic, industry, burning, wind, pm25_value, level`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    #[serde(flatten)]
    pub inputs: InputSet,
    pub pm25_value: f64,
    pub level: AirQualityLevel,
}

impl HistoryRecord {
    pub fn new(inputs: InputSet, result: &EstimationResult) -> Self {
        Self {
            inputs,
            pm25_value: result.concentration,
            level: result.level,
        }
    }

    /// JSON has no representation for NaN or infinity.
    pub fn is_finite(&self) -> bool {
        let i = &self.inputs;
        [i.traffic, i.industry, i.burning, i.wind, self.pm25_value]
            .iter()
            .all(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_json_keys_are_flat() {
        let record = HistoryRecord::new(
            InputSet::new(100.0, 10.0, 0.0, 10.0),
            &EstimationResult::new(13.06, AirQualityLevel::Fair),
        );
        let value = serde_json::to_value(&record).unwrap();
        let obj = value.as_object().unwrap();

        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["burning", "industry", "level", "pm25_value", "traffic", "wind"]
        );
        assert_eq!(obj["level"], "Fair");
    }

    #[test]
    fn test_record_is_finite() {
        let inputs = InputSet::new(1.0, 1.0, 1.0, 1.0);
        let ok = HistoryRecord::new(inputs, &EstimationResult::new(6.0, AirQualityLevel::Good));
        assert!(ok.is_finite());

        let overflow = HistoryRecord::new(
            inputs,
            &EstimationResult::new(f64::INFINITY, AirQualityLevel::Poor),
        );
        assert!(!overflow.is_finite());
    }

    #[test]
    fn test_record_reads_persisted_shape() {
        let json = r#"{
            "traffic": 10.0,
            "industry": 2.0,
            "burning": 3.0,
            "wind": 8.0,
            "pm25_value": 6.5,
            "level": "Good"
        }"#;
        let record: HistoryRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.inputs, InputSet::new(10.0, 2.0, 3.0, 8.0));
        assert_eq!(record.level, AirQualityLevel::Good);
    }
}
