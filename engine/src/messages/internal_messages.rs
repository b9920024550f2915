use actix::prelude::*;
use common::types::cluster::Cluster;
use common::types::restaurant_point::RestaurantPoint;
use common::types::viewport::Viewport;

/////////////////////////////////////////////////////////////////////
// Messages from the update coordinator to the clustering service
/////////////////////////////////////////////////////////////////////

/// Runs the grid clusterer over `points` for `viewport`.
#[derive(Message, Debug, Clone)]
#[rtype(result = "Vec<Cluster>")]
pub struct ComputeClusters {
    pub points: Vec<RestaurantPoint>,
    pub viewport: Viewport,
}
