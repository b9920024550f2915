use serde::{Deserialize, Serialize};

/// A restaurant as delivered by the data source. The engine only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantPoint {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub has_nutrition_data: bool,
}

impl RestaurantPoint {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        has_nutrition_data: bool,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            latitude,
            longitude,
            has_nutrition_data,
        }
    }

    /// (latitude, longitude)
    pub fn position(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    pub fn has_finite_position(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nutrition_flag_defaults_to_false_when_missing() {
        let point: RestaurantPoint = serde_json::from_str(
            r#"{ "id": "r1", "name": "Green Bowl", "latitude": 40.0, "longitude": -3.5 }"#,
        )
        .unwrap();
        assert_eq!(point.position(), (40.0, -3.5));
        assert!(!point.has_nutrition_data);
    }

    #[test]
    fn test_non_finite_position_is_detected() {
        assert!(RestaurantPoint::new("a", "A", 1.0, 2.0, true).has_finite_position());
        assert!(!RestaurantPoint::new("b", "B", f64::NAN, 2.0, true).has_finite_position());
        assert!(!RestaurantPoint::new("c", "C", 1.0, f64::INFINITY, false).has_finite_position());
    }
}
