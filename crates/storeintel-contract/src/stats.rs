use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatencyStats {
    pub samples: usize,
    pub min_ms: f64,
    pub max_ms: f64,
    pub mean_ms: f64,
    pub median_ms: f64,
}

pub fn compute_stats(samples_ms: &[f64]) -> Option<LatencyStats> {
    if samples_ms.is_empty() {
        return None;
    }

    let mut values = samples_ms.to_vec();
    values.sort_by(f64::total_cmp);

    let len = values.len();
    let sum: f64 = values.iter().sum();
    let median_ms = if len % 2 == 0 {
        (values[(len / 2) - 1] + values[len / 2]) / 2.0
    } else {
        values[len / 2]
    };

    Some(LatencyStats {
        samples: len,
        min_ms: values[0],
        max_ms: values[len - 1],
        mean_ms: sum / (len as f64),
        median_ms,
    })
}
