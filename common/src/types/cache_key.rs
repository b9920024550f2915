use crate::config::ClusteringConfig;
use crate::constants::CACHE_KEY_SCALE;
use crate::types::cluster::ClusterMode;
use crate::types::viewport::Viewport;

/// Low-cardinality signature of a clustering request:
/// (point count, zoom, center latitude, center longitude), each float rounded
/// to four decimal places.
///
/// The rounded zoom alone can straddle a threshold, so the key also carries
/// the clustering mode and whether lone grid cells are hidden, both taken from
/// the exact zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub point_count: usize,
    pub mode: ClusterMode,
    pub singletons_hidden: bool,
    pub zoom: i64,
    pub latitude: i64,
    pub longitude: i64,
}

fn quantize(value: f64) -> i64 {
    (value * CACHE_KEY_SCALE).round() as i64
}

impl CacheKey {
    pub fn new(point_count: usize, viewport: &Viewport, config: &ClusteringConfig) -> Self {
        let zoom = viewport.zoom_level;
        let mode = ClusterMode::for_zoom(zoom, config.individual_pin_threshold);
        Self {
            point_count,
            mode,
            singletons_hidden: mode == ClusterMode::Grid && zoom > config.singleton_filter_threshold,
            zoom: quantize(viewport.zoom_level),
            latitude: quantize(viewport.center.0),
            longitude: quantize(viewport.center.1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_precision_jitter_maps_to_same_key() {
        let config = ClusteringConfig::default();
        let a = Viewport::new((40.41681, -3.70381), (0.0120, 0.0120));
        let b = Viewport::new((40.41679, -3.70379), (0.01204, 0.0120));
        assert_eq!(CacheKey::new(25, &a, &config), CacheKey::new(25, &b, &config));
    }

    #[test]
    fn test_point_count_is_part_of_the_key() {
        let config = ClusteringConfig::default();
        let viewport = Viewport::new((40.4168, -3.7038), (0.012, 0.012));
        assert_ne!(
            CacheKey::new(25, &viewport, &config),
            CacheKey::new(26, &viewport, &config)
        );
    }

    #[test]
    fn test_negative_coordinates_round_to_nearest() {
        let viewport = Viewport::new((-33.86887, 151.20936), (0.5, 0.5));
        let key = CacheKey::new(1, &viewport, &ClusteringConfig::default());
        assert_eq!(key.latitude, -338689);
        assert_eq!(key.longitude, 1512094);
        assert_eq!(key.zoom, 5000);
    }

    #[test]
    fn test_zooms_rounding_together_across_pin_threshold_differ() {
        let config = ClusteringConfig::default();
        let grid = Viewport::new((40.402, -3.698), (0.00804, 0.00804));
        let pins = Viewport::new((40.402, -3.698), (0.00796, 0.00796));
        let grid_key = CacheKey::new(30, &grid, &config);
        let pins_key = CacheKey::new(30, &pins, &config);

        assert_eq!(grid_key.zoom, pins_key.zoom);
        assert_eq!(grid_key.mode, ClusterMode::Grid);
        assert_eq!(pins_key.mode, ClusterMode::IndividualPins);
        assert_ne!(grid_key, pins_key);
    }

    #[test]
    fn test_zooms_rounding_together_across_singleton_filter_differ() {
        let config = ClusteringConfig::default();
        let shown = Viewport::new((40.402, -3.698), (0.04996, 0.04996));
        let hidden = Viewport::new((40.402, -3.698), (0.05004, 0.05004));
        let shown_key = CacheKey::new(30, &shown, &config);
        let hidden_key = CacheKey::new(30, &hidden, &config);

        assert_eq!(shown_key.zoom, hidden_key.zoom);
        assert!(!shown_key.singletons_hidden);
        assert!(hidden_key.singletons_hidden);
        assert_ne!(shown_key, hidden_key);
    }
}
