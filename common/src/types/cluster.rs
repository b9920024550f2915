use crate::types::restaurant_point::RestaurantPoint;
use serde::{Deserialize, Serialize};

/// A map annotation: one restaurant pin or a group of restaurants sharing a
/// grid cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// `restaurant_<id>` for pins, `grid_<gx>,<gy>` for grid cells.
    pub id: String,
    /// (latitude, longitude)
    pub centroid: (f64, f64),
    pub members: Vec<RestaurantPoint>,
}

impl Cluster {
    pub fn single(point: RestaurantPoint) -> Self {
        Self {
            id: format!("restaurant_{}", point.id),
            centroid: point.position(),
            members: vec![point],
        }
    }

    /// Builds a grid-cell cluster whose centroid is the mean member position.
    /// `members` must not be empty.
    pub fn from_cell(cell: (i64, i64), members: Vec<RestaurantPoint>) -> Self {
        let count = members.len() as f64;
        let (lat_sum, lon_sum) = members
            .iter()
            .fold((0.0, 0.0), |(lat, lon), p| (lat + p.latitude, lon + p.longitude));
        Self {
            id: format!("grid_{},{}", cell.0, cell.1),
            centroid: (lat_sum / count, lon_sum / count),
            members,
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_singleton(&self) -> bool {
        self.members.len() == 1
    }

    /// How many members have nutrition data, for badge rendering.
    pub fn nutrition_member_count(&self) -> usize {
        self.members.iter().filter(|p| p.has_nutrition_data).count()
    }
}

/// How a result set was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClusterMode {
    /// One pin per restaurant, nearest first.
    IndividualPins,
    /// Restaurants bucketed into grid cells.
    Grid,
}

impl ClusterMode {
    pub fn for_zoom(zoom: f64, individual_pin_threshold: f64) -> Self {
        if zoom < individual_pin_threshold {
            ClusterMode::IndividualPins
        } else {
            ClusterMode::Grid
        }
    }
}

/// The result set currently visible to the rendering layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublishedClusters {
    pub clusters: Vec<Cluster>,
    /// `None` until the first result is published.
    pub mode: Option<ClusterMode>,
    /// Number of publications so far; 0 means nothing was published yet.
    pub sequence: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ntest::assert_about_eq;

    #[test]
    fn test_single_uses_restaurant_id() {
        let cluster = Cluster::single(RestaurantPoint::new("42", "Salad Bar", 1.5, 2.5, true));
        assert_eq!(cluster.id, "restaurant_42");
        assert_eq!(cluster.centroid, (1.5, 2.5));
        assert!(cluster.is_singleton());
        assert_eq!(cluster.nutrition_member_count(), 1);
    }

    #[test]
    fn test_cell_centroid_is_mean_of_members() {
        let members = vec![
            RestaurantPoint::new("a", "A", 1.0, 10.0, true),
            RestaurantPoint::new("b", "B", 2.0, 20.0, false),
            RestaurantPoint::new("c", "C", 3.0, 30.0, true),
        ];
        let cluster = Cluster::from_cell((-3, 7), members);
        assert_eq!(cluster.id, "grid_-3,7");
        assert_about_eq!(cluster.centroid.0, 2.0);
        assert_about_eq!(cluster.centroid.1, 20.0);
        assert_eq!(cluster.len(), 3);
        assert_eq!(cluster.nutrition_member_count(), 2);
    }

    #[test]
    fn test_mode_boundary_is_exclusive() {
        assert_eq!(ClusterMode::for_zoom(0.0079, 0.008), ClusterMode::IndividualPins);
        assert_eq!(ClusterMode::for_zoom(0.008, 0.008), ClusterMode::Grid);
    }
}
