use common::types::cluster::{Cluster, ClusterMode, PublishedClusters};
use common::types::transition_state::TransitionState;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// Creates the publishing half kept by the coordinator and the feed handed to
/// the rendering layer.
pub fn feed_channel() -> (ClusterPublisher, ClusterFeed) {
    let (clusters_tx, clusters_rx) = watch::channel(PublishedClusters::default());
    let (transition_tx, transition_rx) = watch::channel(TransitionState::Stable);
    (
        ClusterPublisher {
            clusters: clusters_tx,
            transition: transition_tx,
        },
        ClusterFeed {
            clusters: clusters_rx,
            transition: transition_rx,
        },
    )
}

/// Writing half. Each publication replaces the previous one in a single step,
/// so observers never see an empty list between two results.
#[derive(Debug)]
pub struct ClusterPublisher {
    clusters: watch::Sender<PublishedClusters>,
    transition: watch::Sender<TransitionState>,
}

impl ClusterPublisher {
    /// Replaces the published clusters and returns the new sequence number.
    pub fn publish_clusters(&self, clusters: Vec<Cluster>, mode: ClusterMode) -> u64 {
        let mut sequence = 0;
        self.clusters.send_modify(|published| {
            published.clusters = clusters;
            published.mode = Some(mode);
            published.sequence += 1;
            sequence = published.sequence;
        });
        sequence
    }

    /// Publishes `state` unless it is already the current one.
    pub fn publish_transition(&self, state: TransitionState) {
        self.transition.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
    }

    pub fn current(&self) -> PublishedClusters {
        self.clusters.borrow().clone()
    }
}

/// Read side for the rendering layer. Last writer wins; a slow reader only
/// ever sees the newest result.
#[derive(Debug, Clone)]
pub struct ClusterFeed {
    clusters: watch::Receiver<PublishedClusters>,
    transition: watch::Receiver<TransitionState>,
}

impl ClusterFeed {
    pub fn clusters(&self) -> PublishedClusters {
        self.clusters.borrow().clone()
    }

    pub fn transition(&self) -> TransitionState {
        *self.transition.borrow()
    }

    /// Waits for the next cluster publication and returns it. `None` once the
    /// coordinator is gone.
    pub async fn next_clusters(&mut self) -> Option<PublishedClusters> {
        self.clusters.changed().await.ok()?;
        Some(self.clusters.borrow_and_update().clone())
    }

    pub async fn next_transition(&mut self) -> Option<TransitionState> {
        self.transition.changed().await.ok()?;
        Some(*self.transition.borrow_and_update())
    }

    pub fn cluster_stream(&self) -> WatchStream<PublishedClusters> {
        WatchStream::new(self.clusters.clone())
    }

    pub fn transition_stream(&self) -> WatchStream<TransitionState> {
        WatchStream::new(self.transition.clone())
    }
}
