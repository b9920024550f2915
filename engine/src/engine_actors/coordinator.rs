use crate::engine_actors::cluster_feed::{ClusterFeed, ClusterPublisher, feed_channel};
use crate::engine_actors::result_cache::ResultCache;
use crate::engine_actors::services::grid_clusterer::ClusteringService;
use crate::engine_actors::transition_tracker::TransitionTracker;
use crate::messages::internal_messages::ComputeClusters;
use actix::prelude::*;
use colored::Color;
use common::config::EngineConfig;
use common::error::EngineError;
use common::logger::Logger;
use common::messages::{GetPublished, GetStats, InvalidateCache, RequestUpdate};
use common::types::cache_key::CacheKey;
use common::types::cluster::{Cluster, ClusterMode};
use common::types::engine_stats::EngineStats;
use common::types::restaurant_point::RestaurantPoint;
use common::types::viewport::Viewport;

/// The `UpdateCoordinator` actor turns a stream of viewport changes into
/// published cluster sets.
///
/// ## Responsibilities
/// - Drops requests without usable points, near-duplicate viewports, and
///   requests arriving while a computation is running.
/// - Debounces accepted requests, replacing any computation still waiting
///   for its quiet period.
/// - Serves cached results immediately and sends cache misses to the
///   `ClusteringService` worker.
/// - Publishes results and pin/cluster transition states on the `ClusterFeed`.
///
/// All mutable state lives in the actor, so concurrent senders are serialized
/// by its mailbox.
pub struct UpdateCoordinator {
    /// Engine tunables.
    pub config: EngineConfig,
    /// Results keyed by viewport signature.
    cache: ResultCache,
    /// Pin/cluster mode of the last published result.
    tracker: TransitionTracker,
    /// Writing half of the feed observed by the rendering layer.
    publisher: ClusterPublisher,
    /// Worker running the grid clusterer; started with the actor unless one
    /// was already attached.
    clustering_service: Option<Recipient<ComputeClusters>>,
    /// Viewport and point count of the last accepted request.
    last_viewport: Option<(Viewport, usize)>,
    /// Set while a scheduled update is being served.
    is_updating: bool,
    /// Bumped on every accepted or empty request; scheduled work only runs if
    /// it still carries the current value.
    generation: u64,
    /// Bumped whenever the cache is invalidated.
    cache_epoch: u64,
    /// Debounce timer of the request waiting for its quiet period.
    pending_update: Option<SpawnHandle>,
    /// Timer that returns the transition state to `Stable`.
    settle_timer: Option<SpawnHandle>,
    stats: EngineStats,
    logger: Logger,
}

impl UpdateCoordinator {
    /// Creates a coordinator and the feed its results are published on.
    ///
    /// ## Arguments
    /// * `config` - Engine tunables, assumed validated.
    pub fn new(config: EngineConfig) -> (Self, ClusterFeed) {
        let (publisher, feed) = feed_channel();
        let logger =
            Logger::new("Update Coordinator", Color::Cyan).with_verbose(config.verbose_logging);
        let coordinator = Self {
            cache: ResultCache::new(config.cache_ttl(), config.max_cache_size),
            config,
            tracker: TransitionTracker::new(),
            publisher,
            clustering_service: None,
            last_viewport: None,
            is_updating: false,
            generation: 0,
            cache_epoch: 0,
            pending_update: None,
            settle_timer: None,
            stats: EngineStats::default(),
            logger,
        };
        (coordinator, feed)
    }

    /// Creates and starts a coordinator on the current arbiter.
    pub fn launch(config: EngineConfig) -> (Addr<Self>, ClusterFeed) {
        let (coordinator, feed) = Self::new(config);
        (coordinator.start(), feed)
    }

    fn cancel_pending_update(&mut self, ctx: &mut Context<Self>) {
        if let Some(handle) = self.pending_update.take() {
            ctx.cancel_future(handle);
            self.stats.cancelled_debounces += 1;
        }
    }

    fn is_near_duplicate(&self, viewport: &Viewport, point_count: usize) -> bool {
        match &self.last_viewport {
            Some((last, last_count)) => last.is_similar(
                *last_count,
                viewport,
                point_count,
                self.config.similarity_tolerance,
            ),
            None => false,
        }
    }

    /// Serves an update whose debounce period elapsed without being replaced.
    ///
    /// ## Arguments
    /// * `points` - Restaurants with finite coordinates.
    /// * `viewport` - The viewport of the request.
    /// * `generation` - Generation the request was accepted under.
    /// * `ctx` - The actor context.
    fn run_update(
        &mut self,
        points: Vec<RestaurantPoint>,
        viewport: Viewport,
        generation: u64,
        ctx: &mut Context<Self>,
    ) {
        self.is_updating = true;
        let key = CacheKey::new(points.len(), &viewport, &self.config.clustering);
        let mode = key.mode;

        if let Some(entry) = self.cache.get(&key) {
            let clusters = entry.clusters.clone();
            self.stats.cache_hits += 1;
            self.logger.debug(format!(
                "Cache hit for {:?}, publishing {} clusters",
                key,
                clusters.len()
            ));
            self.publish(clusters, mode, ctx);
            self.is_updating = false;
            return;
        }

        let Some(service) = self.clustering_service.clone() else {
            self.logger
                .error("Clustering service not started, keeping previous clusters.");
            self.is_updating = false;
            return;
        };

        self.stats.computations += 1;
        let epoch = self.cache_epoch;
        let request = ComputeClusters { points, viewport };
        let computation = service
            .send(request)
            .into_actor(self)
            .map(move |res, act, ctx| {
                act.is_updating = false;
                if act.generation != generation || act.cache_epoch != epoch {
                    act.logger
                        .debug("Discarding clusters computed for a superseded request.");
                    return;
                }
                match res {
                    Ok(clusters) => {
                        act.cache.put(key, clusters.clone());
                        act.publish(clusters, mode, ctx);
                    }
                    Err(err) => {
                        let err = EngineError::from(err);
                        act.logger
                            .error(format!("{}; keeping previous clusters.", err));
                    }
                }
            });
        ctx.spawn(computation);
    }

    /// Publishes a result, announcing a pin/cluster transition first when the
    /// mode changed.
    fn publish(&mut self, clusters: Vec<Cluster>, mode: ClusterMode, ctx: &mut Context<Self>) {
        let previous_mode = self.tracker.last_mode();
        let state = self.tracker.observe(mode);
        self.publisher.publish_transition(state);
        if previous_mode.is_some_and(|previous| previous != mode) {
            self.logger.info(format!("Transition: {}", state));
            self.schedule_settle(ctx);
        }

        let count = clusters.len();
        let sequence = self.publisher.publish_clusters(clusters, mode);
        self.stats.published += 1;
        self.logger.debug(format!(
            "Published {} annotations ({:?}), sequence {}",
            count, mode, sequence
        ));
    }

    fn schedule_settle(&mut self, ctx: &mut Context<Self>) {
        if let Some(handle) = self.settle_timer.take() {
            ctx.cancel_future(handle);
        }
        let handle = ctx.run_later(self.config.transition_settle(), |act, _ctx| {
            act.settle_timer = None;
            let state = act.tracker.settle();
            act.publisher.publish_transition(state);
        });
        self.settle_timer = Some(handle);
    }
}

impl Actor for UpdateCoordinator {
    type Context = Context<Self>;

    /// Starts the clustering worker and the periodic cache purge.
    fn started(&mut self, ctx: &mut Self::Context) {
        if self.clustering_service.is_none() {
            let clustering = self.config.clustering.clone();
            let verbose = self.config.verbose_logging;
            let service = SyncArbiter::start(1, move || {
                ClusteringService::new(clustering.clone(), verbose)
            });
            self.clustering_service = Some(service.recipient());
        }

        ctx.run_interval(self.config.cache_purge_interval(), |act, _ctx| {
            let purged = act.cache.purge_expired();
            if purged > 0 {
                act.logger
                    .debug(format!("Purged {} expired cache entries.", purged));
            }
        });
        self.logger.info("Update coordinator started.");
    }
}

impl Handler<RequestUpdate> for UpdateCoordinator {
    type Result = ();

    /// Applies, in order: boundary validation, the empty-input guard,
    /// near-duplicate suppression, the single-flight guard, and the debounce.
    fn handle(&mut self, msg: RequestUpdate, ctx: &mut Self::Context) -> Self::Result {
        self.stats.requests += 1;
        let viewport = msg.viewport;
        if !viewport.is_finite() {
            self.stats.invalid_requests += 1;
            self.logger
                .warn(format!("Ignoring non-finite viewport {:?}", viewport));
            return;
        }

        let received = msg.points.len();
        let points: Vec<RestaurantPoint> = msg
            .points
            .into_iter()
            .filter(RestaurantPoint::has_finite_position)
            .collect();
        if points.len() < received {
            self.logger.warn(format!(
                "Discarded {} restaurants with non-finite coordinates.",
                received - points.len()
            ));
        }

        if points.is_empty() {
            self.stats.empty_requests += 1;
            self.cancel_pending_update(ctx);
            self.generation += 1;
            self.last_viewport = None;
            self.logger
                .debug("No restaurants to cluster, keeping previous clusters.");
            return;
        }

        if self.is_near_duplicate(&viewport, points.len()) {
            self.stats.suppressed_similar += 1;
            return;
        }

        if self.is_updating {
            self.stats.dropped_in_flight += 1;
            self.logger
                .debug("Update in progress, dropping viewport change.");
            return;
        }

        self.cancel_pending_update(ctx);
        self.generation += 1;
        let generation = self.generation;
        self.last_viewport = Some((viewport, points.len()));

        let delay = msg
            .debounce_delay
            .unwrap_or_else(|| self.config.debounce_delay());
        let handle = ctx.run_later(delay, move |act, ctx| {
            if act.generation != generation {
                return;
            }
            act.pending_update = None;
            act.run_update(points, viewport, generation, ctx);
        });
        self.pending_update = Some(handle);
    }
}

impl Handler<InvalidateCache> for UpdateCoordinator {
    type Result = ();

    fn handle(&mut self, _msg: InvalidateCache, _ctx: &mut Self::Context) -> Self::Result {
        let dropped = self.cache.len();
        self.cache.clear();
        self.cache_epoch += 1;
        self.last_viewport = None;
        self.logger
            .info(format!("Cache invalidated, {} entries dropped.", dropped));
    }
}

impl Handler<GetStats> for UpdateCoordinator {
    type Result = MessageResult<GetStats>;

    fn handle(&mut self, _msg: GetStats, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(EngineStats {
            cache_entries: self.cache.len(),
            ..self.stats
        })
    }
}

impl Handler<GetPublished> for UpdateCoordinator {
    type Result = MessageResult<GetPublished>;

    fn handle(&mut self, _msg: GetPublished, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(self.publisher.current())
    }
}
