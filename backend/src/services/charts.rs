//! Chart data for the frontend.
//!
//! The backend does not render images; it returns the numeric series a client
//! needs to draw the threshold bar chart and the history trend line.

use serde::{Deserialize, Serialize};

use crate::algorithms::estimator::{FAIR_MAX, GOOD_MAX, POOR_SENSITIVE_MAX};
use crate::models::HistoryRecord;

/// Upper bound drawn for the top (Unhealthy) bar.
pub const UNHEALTHY_MAX: f64 = 150.4;

/// Unit label shared by every concentration axis.
pub const CONCENTRATION_AXIS_LABEL: &str = "PM2.5 Concentration (µg/m³)";

/// One bar of the threshold chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdBar {
    pub label: String,
    pub upper_bound: f64,
    /// Hex color, e.g. `#00e400`
    pub color: String,
}

/// Latest value plotted against the AQI band thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdChart {
    pub title: String,
    pub y_label: String,
    pub bars: Vec<ThresholdBar>,
    pub latest_value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// 1-based run number
    pub run: usize,
    pub value: f64,
}

/// Concentration of every run in history order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<TrendPoint>,
}

const THRESHOLD_BARS: [(&str, f64, &str); 4] = [
    ("Good", GOOD_MAX, "#00e400"),
    ("Moderate", FAIR_MAX, "#ffff00"),
    ("Unhealthy (Sensitive)", POOR_SENSITIVE_MAX, "#ff7e00"),
    ("Unhealthy", UNHEALTHY_MAX, "#ff0000"),
];

pub fn threshold_chart(concentration: f64) -> ThresholdChart {
    ThresholdChart {
        title: "Latest Value vs. AQI Levels".to_string(),
        y_label: CONCENTRATION_AXIS_LABEL.to_string(),
        bars: THRESHOLD_BARS
            .iter()
            .map(|(label, upper_bound, color)| ThresholdBar {
                label: label.to_string(),
                upper_bound: *upper_bound,
                color: color.to_string(),
            })
            .collect(),
        latest_value: concentration,
    }
}

/// Trend series of the history, or `None` when there is nothing to plot.
pub fn trend_chart(history: &[HistoryRecord]) -> Option<TrendChart> {
    if history.is_empty() {
        return None;
    }

    Some(TrendChart {
        title: "PM2.5 Trend from Simulation History".to_string(),
        x_label: "Simulation Run Number".to_string(),
        y_label: CONCENTRATION_AXIS_LABEL.to_string(),
        points: history
            .iter()
            .enumerate()
            .map(|(i, record)| TrendPoint {
                run: i + 1,
                value: record.pm25_value,
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::estimate;
    use crate::models::InputSet;

    #[test]
    fn test_threshold_chart_bars() {
        let chart = threshold_chart(13.06);
        assert_eq!(chart.latest_value, 13.06);

        let bounds: Vec<f64> = chart.bars.iter().map(|b| b.upper_bound).collect();
        assert_eq!(bounds, vec![12.0, 35.4, 55.4, 150.4]);
        assert_eq!(chart.bars[0].color, "#00e400");
        assert_eq!(chart.bars[3].label, "Unhealthy");
    }

    #[test]
    fn test_trend_chart_empty_history() {
        assert!(trend_chart(&[]).is_none());
    }

    #[test]
    fn test_trend_chart_numbers_runs_from_one() {
        let history: Vec<HistoryRecord> = [0.0, 100.0, 200.0]
            .iter()
            .map(|&traffic| {
                let inputs = InputSet::new(traffic, 0.0, 0.0, 0.0);
                HistoryRecord::new(inputs, &estimate(&inputs))
            })
            .collect();

        let chart = trend_chart(&history).unwrap();
        let runs: Vec<usize> = chart.points.iter().map(|p| p.run).collect();
        assert_eq!(runs, vec![1, 2, 3]);
        assert_eq!(chart.points[2].value, history[2].pm25_value);
    }
}
