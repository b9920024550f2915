use crate::messages::internal_messages::ComputeClusters;
use actix::prelude::*;
use colored::Color;
use common::config::ClusteringConfig;
use common::logger::Logger;
use common::types::cluster::{Cluster, ClusterMode};
use common::types::restaurant_point::RestaurantPoint;
use common::utils::squared_distance;
use std::collections::BTreeMap;

/// Groups `points` into map annotations for the given zoom and center.
///
/// Below `individual_pin_threshold` every restaurant gets its own pin, the
/// nearest `max_individual_pins` to `center` first. Otherwise restaurants are
/// bucketed into square grid cells whose size follows the zoom, and above
/// `singleton_filter_threshold` cells holding a single restaurant are left out.
///
/// Output order and ids depend only on the arguments: pins are ordered by
/// distance (ties keep input order) and cells by their grid coordinates.
pub fn cluster(
    points: &[RestaurantPoint],
    zoom: f64,
    _span: (f64, f64),
    center: (f64, f64),
    config: &ClusteringConfig,
) -> Vec<Cluster> {
    if points.is_empty() {
        return Vec::new();
    }

    match ClusterMode::for_zoom(zoom, config.individual_pin_threshold) {
        ClusterMode::IndividualPins => nearest_pins(points, center, config.max_individual_pins),
        ClusterMode::Grid => grid_clusters(points, zoom, config),
    }
}

/// Side of a grid cell, in degrees, for the given zoom.
pub fn cell_size(zoom: f64, config: &ClusteringConfig) -> f64 {
    (zoom * config.clustering_factor).max(config.min_grid_size)
}

fn nearest_pins(points: &[RestaurantPoint], center: (f64, f64), limit: usize) -> Vec<Cluster> {
    let mut by_distance: Vec<(f64, &RestaurantPoint)> = points
        .iter()
        .map(|point| (squared_distance(point.position(), center), point))
        .collect();
    by_distance.sort_by(|a, b| a.0.total_cmp(&b.0));

    by_distance
        .into_iter()
        .take(limit)
        .map(|(_, point)| Cluster::single(point.clone()))
        .collect()
}

fn grid_clusters(points: &[RestaurantPoint], zoom: f64, config: &ClusteringConfig) -> Vec<Cluster> {
    let size = cell_size(zoom, config);
    let mut cells: BTreeMap<(i64, i64), Vec<RestaurantPoint>> = BTreeMap::new();
    for point in points {
        let cell = (
            (point.latitude / size).floor() as i64,
            (point.longitude / size).floor() as i64,
        );
        cells.entry(cell).or_default().push(point.clone());
    }

    let hide_singletons = zoom > config.singleton_filter_threshold;
    cells
        .into_iter()
        .filter(|(_, members)| !(hide_singletons && members.len() == 1))
        .map(|(cell, members)| Cluster::from_cell(cell, members))
        .collect()
}

/// Runs the grid clusterer on its own thread, away from the coordinator's
/// event loop. Started through a `SyncArbiter`.
pub struct ClusteringService {
    pub config: ClusteringConfig,
    pub logger: Logger,
}

impl ClusteringService {
    pub fn new(config: ClusteringConfig, verbose: bool) -> Self {
        Self {
            config,
            logger: Logger::new("Clustering Service", Color::Magenta).with_verbose(verbose),
        }
    }
}

impl Actor for ClusteringService {
    type Context = SyncContext<Self>;
}

impl Handler<ComputeClusters> for ClusteringService {
    type Result = MessageResult<ComputeClusters>;

    fn handle(&mut self, msg: ComputeClusters, _ctx: &mut Self::Context) -> Self::Result {
        let viewport = msg.viewport;
        let clusters = cluster(
            &msg.points,
            viewport.zoom_level,
            viewport.span,
            viewport.center,
            &self.config,
        );
        self.logger.debug(format!(
            "Clustered {} restaurants into {} annotations at zoom {:.4}",
            msg.points.len(),
            clusters.len(),
            viewport.zoom_level
        ));
        MessageResult(clusters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::types::viewport::Viewport;
    use ntest::assert_about_eq;
    use std::collections::HashSet;

    fn point(id: &str, latitude: f64, longitude: f64) -> RestaurantPoint {
        RestaurantPoint::new(id, format!("Restaurant {}", id), latitude, longitude, false)
    }

    fn scattered(count: usize) -> Vec<RestaurantPoint> {
        (0..count)
            .map(|i| {
                let lat = 40.0 + ((i * 37) % 101) as f64 * 0.0013;
                let lon = -3.0 + ((i * 53) % 97) as f64 * 0.0017;
                point(&i.to_string(), lat, lon)
            })
            .collect()
    }

    #[test]
    fn test_empty_input_yields_no_clusters() {
        let config = ClusteringConfig::default();
        assert!(cluster(&[], 0.001, (0.001, 0.001), (0.0, 0.0), &config).is_empty());
        assert!(cluster(&[], 1.0, (1.0, 1.0), (0.0, 0.0), &config).is_empty());
    }

    #[test]
    fn test_partition_in_grid_mode() {
        let config = ClusteringConfig::default();
        let points = scattered(300);
        // Between the pin threshold and the singleton filter.
        let zoom = 0.03;
        let clusters = cluster(&points, zoom, (zoom, zoom), (40.05, -2.9), &config);

        let mut seen = HashSet::new();
        let mut total = 0;
        for c in &clusters {
            assert!(!c.is_empty());
            for member in &c.members {
                assert!(seen.insert(member.id.clone()), "{} in two clusters", member.id);
                total += 1;
            }
        }
        assert_eq!(total, points.len());
    }

    #[test]
    fn test_pin_cap_and_distance_order() {
        let config = ClusteringConfig {
            max_individual_pins: 10,
            ..ClusteringConfig::default()
        };
        let points = scattered(40);
        let center = (40.06, -2.92);
        let clusters = cluster(&points, 0.005, (0.005, 0.005), center, &config);

        assert_eq!(clusters.len(), 10);
        let distances: Vec<f64> = clusters
            .iter()
            .map(|c| {
                assert!(c.is_singleton());
                squared_distance(c.centroid, center)
            })
            .collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));

        let nearest = points
            .iter()
            .map(|p| squared_distance(p.position(), center))
            .fold(f64::INFINITY, f64::min);
        assert_about_eq!(distances[0], nearest);
    }

    #[test]
    fn test_pin_ids_follow_restaurants() {
        let config = ClusteringConfig::default();
        let points = vec![point("a", 0.001, 0.0), point("b", 0.0005, 0.0)];
        let near_a = cluster(&points, 0.005, (0.005, 0.005), (0.001, 0.0), &config);
        let near_b = cluster(&points, 0.005, (0.005, 0.005), (0.0, 0.0), &config);

        assert_eq!(near_a[0].id, "restaurant_a");
        assert_eq!(near_b[0].id, "restaurant_b");
        let ids_a: HashSet<_> = near_a.iter().map(|c| c.id.clone()).collect();
        let ids_b: HashSet<_> = near_b.iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids_a, ids_b);
    }

    #[test]
    fn test_deterministic_ids_and_membership() {
        let config = ClusteringConfig::default();
        let points = scattered(250);
        for zoom in [0.005, 0.02, 0.2] {
            let first = cluster(&points, zoom, (zoom, zoom), (40.05, -2.9), &config);
            let second = cluster(&points, zoom, (zoom, zoom), (40.05, -2.9), &config);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_scenario_near_points_come_first() {
        let points = vec![
            point("far", 5.0, 5.0),
            point("origin", 0.0, 0.0),
            point("neighbor", 0.0001, 0.0001),
        ];

        let config = ClusteringConfig::default();
        let clusters = cluster(&points, 0.005, (0.005, 0.005), (0.0, 0.0), &config);
        let ids: Vec<&str> = clusters.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["restaurant_origin", "restaurant_neighbor", "restaurant_far"]
        );

        let capped = ClusteringConfig {
            max_individual_pins: 2,
            ..ClusteringConfig::default()
        };
        let clusters = cluster(&points, 0.005, (0.005, 0.005), (0.0, 0.0), &capped);
        let ids: Vec<&str> = clusters.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["restaurant_origin", "restaurant_neighbor"]);
    }

    #[test]
    fn test_scenario_one_cell_with_four_members() {
        let config = ClusteringConfig::default();
        let points = vec![
            point("1", 1.0012, 2.0011),
            point("2", 1.0034, 2.0042),
            point("3", 1.0056, 2.0073),
            point("4", 1.0078, 2.0094),
        ];
        // cell = max(0.5 * 0.015, 0.01) = 0.01, all four fall in (100, 200).
        let clusters = cluster(&points, 0.5, (0.5, 0.5), (1.0, 2.0), &config);

        assert_eq!(clusters.len(), 1);
        let only = &clusters[0];
        assert_eq!(only.id, "grid_100,200");
        assert_eq!(only.len(), 4);
        assert_about_eq!(only.centroid.0, (1.0012 + 1.0034 + 1.0056 + 1.0078) / 4.0);
        assert_about_eq!(only.centroid.1, (2.0011 + 2.0042 + 2.0073 + 2.0094) / 4.0);
    }

    #[test]
    fn test_singletons_hidden_only_above_filter_threshold() {
        let config = ClusteringConfig::default();
        let points = vec![
            point("pair-1", 10.0001, 10.0001),
            point("pair-2", 10.0002, 10.0002),
            point("lonely", 20.0, 20.0),
        ];

        let wide = cluster(&points, 0.5, (0.5, 0.5), (15.0, 15.0), &config);
        assert_eq!(wide.len(), 1);
        assert_eq!(wide[0].len(), 2);

        let medium = cluster(&points, 0.02, (0.02, 0.02), (15.0, 15.0), &config);
        assert_eq!(medium.len(), 2);
        assert!(medium.iter().any(|c| c.is_singleton()));
    }

    #[test]
    fn test_identical_coordinates_share_a_cell() {
        let config = ClusteringConfig::default();
        let points = vec![point("x", -0.505, 0.255), point("y", -0.505, 0.255)];
        let clusters = cluster(&points, 0.02, (0.02, 0.02), (0.0, 0.0), &config);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].id, "grid_-51,25");
    }

    #[test]
    fn test_cell_size_never_below_minimum() {
        let config = ClusteringConfig::default();
        assert_about_eq!(cell_size(0.1, &config), 0.01);
        assert_about_eq!(cell_size(2.0, &config), 0.03);
    }

    #[actix_rt::test]
    async fn test_service_replies_with_clusters() {
        let config = ClusteringConfig::default();
        let service = SyncArbiter::start(1, move || ClusteringService::new(config.clone(), false));
        let points = vec![point("a", 0.0, 0.0), point("b", 0.0002, 0.0)];
        let clusters = service
            .send(ComputeClusters {
                points,
                viewport: Viewport::new((0.0, 0.0), (0.004, 0.004)),
            })
            .await
            .unwrap();
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].id, "restaurant_a");
    }
}
