use crate::types::restaurant_point::RestaurantPoint;
use rand::Rng;

/// Squared planar distance between two (lat, lon) pairs. Good enough for
/// ranking at street-level zoom.
pub fn squared_distance(point1: (f64, f64), point2: (f64, f64)) -> f64 {
    let dlat = point1.0 - point2.0;
    let dlon = point1.1 - point2.1;
    dlat * dlat + dlon * dlon
}

/// Uniform random position inside the square `center ± radius`.
pub fn random_position_around(center: (f64, f64), radius: f64) -> (f64, f64) {
    let mut rng = rand::thread_rng();
    (
        center.0 + rng.gen_range(-radius..=radius),
        center.1 + rng.gen_range(-radius..=radius),
    )
}

/// Generates `count` restaurants scattered around `center`; roughly two in
/// three carry nutrition data.
pub fn random_restaurants(count: usize, center: (f64, f64), radius: f64) -> Vec<RestaurantPoint> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|i| {
            let (latitude, longitude) = random_position_around(center, radius);
            RestaurantPoint::new(
                format!("{}", i + 1),
                format!("Restaurant {}", i + 1),
                latitude,
                longitude,
                rng.gen_bool(0.66),
            )
        })
        .collect()
}
