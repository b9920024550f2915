use crate::types::cluster::PublishedClusters;
use crate::types::engine_stats::EngineStats;
use crate::types::restaurant_point::RestaurantPoint;
use crate::types::viewport::Viewport;
use actix::Message;
use std::time::Duration;

/////////////////////////////////////////////////////////////////////
// Messages from the map view to the update coordinator
/////////////////////////////////////////////////////////////////////

/// Reports a new viewport together with the restaurants currently loaded.
///
/// ## Contents
/// - `points`: every restaurant the data source has for the area.
/// - `viewport`: the region now visible.
/// - `debounce_delay`: quiet period before recomputing; `None` uses the
///   configured default.
#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub struct RequestUpdate {
    pub points: Vec<RestaurantPoint>,
    pub viewport: Viewport,
    pub debounce_delay: Option<Duration>,
}

impl RequestUpdate {
    pub fn new(points: Vec<RestaurantPoint>, viewport: Viewport) -> Self {
        Self {
            points,
            viewport,
            debounce_delay: None,
        }
    }

    pub fn with_debounce(mut self, delay: Duration) -> Self {
        self.debounce_delay = Some(delay);
        self
    }
}

/// Drops every cached result. Sent when the restaurant data set changes
/// without changing its size.
#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "()")]
pub struct InvalidateCache;

/// Asks the coordinator for its counters.
#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "EngineStats")]
pub struct GetStats;

/// Asks the coordinator for the result set currently published.
#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "PublishedClusters")]
pub struct GetPublished;
