//! Suitability scoring.

use touchdown_core::constants::*;

use crate::config::ScannerConfig;

/// Raw measurements of an accepted candidate.
#[derive(Debug, Clone, Copy)]
pub struct SiteMetrics {
    pub flatness: f32,
    pub slope_deg: f32,
    pub size: f32,
    /// Distance to the nearest valid obstacle, `None` if none in range.
    pub clearance: Option<f32>,
}

/// Linear falloff from 1 at zero to 0 at `threshold`.
fn falloff(value: f32, threshold: f32) -> f32 {
    if threshold <= 0.0 {
        return 0.0;
    }
    (1.0 - value / threshold).clamp(0.0, 1.0)
}

/// Clearance credit: full at twice the minimum, linear from 0.5 to 1
/// between the minimum and twice it, at most 0.25 below the minimum.
pub fn clearance_score(distance: Option<f32>, min_clearance: f32) -> f32 {
    let Some(d) = distance else {
        return 1.0;
    };
    if min_clearance <= 0.0 {
        return 1.0;
    }
    let d = d.max(0.0);
    if d >= 2.0 * min_clearance {
        1.0
    } else if d >= min_clearance {
        0.5 + 0.5 * (d - min_clearance) / min_clearance
    } else {
        0.25 * d / min_clearance
    }
}

/// Weighted composite in [0, 1].
pub fn suitability_score(metrics: &SiteMetrics, config: &ScannerConfig) -> f32 {
    let flatness = falloff(metrics.flatness, config.max_flatness_deviation);
    let slope = falloff(metrics.slope_deg, config.max_slope_deg);
    let size = if config.min_site_size > 0.0 {
        (metrics.size / (2.0 * config.min_site_size)).clamp(0.0, 1.0)
    } else {
        1.0
    };
    let clearance = clearance_score(metrics.clearance, config.min_obstacle_clearance);

    let score = SCORE_WEIGHT_FLATNESS * flatness
        + SCORE_WEIGHT_SLOPE * slope
        + SCORE_WEIGHT_SIZE * size
        + SCORE_WEIGHT_CLEARANCE * clearance;
    if score.is_finite() {
        score.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_site_scores_one() {
        let config = ScannerConfig::default();
        let metrics = SiteMetrics {
            flatness: 0.0,
            slope_deg: 0.0,
            size: 2.0 * config.min_site_size,
            clearance: None,
        };
        assert!((suitability_score(&metrics, &config) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_score_components() {
        let config = ScannerConfig::default();
        let metrics = SiteMetrics {
            flatness: config.max_flatness_deviation,
            slope_deg: config.max_slope_deg,
            size: config.min_site_size,
            clearance: Some(config.min_obstacle_clearance),
        };
        // 0 + 0 + 0.2 * 0.5 + 0.2 * 0.5
        assert!((suitability_score(&metrics, &config) - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_clearance_score_bands() {
        assert_eq!(clearance_score(None, 10.0), 1.0);
        assert_eq!(clearance_score(Some(25.0), 10.0), 1.0);
        assert!((clearance_score(Some(15.0), 10.0) - 0.75).abs() < 1e-6);
        assert!((clearance_score(Some(10.0), 10.0) - 0.5).abs() < 1e-6);
        assert!((clearance_score(Some(6.0), 10.0) - 0.15).abs() < 1e-6);
        // Monotonic through the bands
        let mut last = 0.0;
        for i in 0..40 {
            let s = clearance_score(Some(i as f32), 10.0);
            assert!(s >= last, "score dropped at {i}");
            last = s;
        }
    }
}
