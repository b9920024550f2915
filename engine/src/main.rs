use actix::prelude::*;
use colored::Color;
use common::config::EngineConfig;
use common::error::Result;
use common::logger::Logger;
use common::messages::{GetStats, RequestUpdate};
use common::types::restaurant_point::RestaurantPoint;
use common::types::viewport::Viewport;
use common::utils::random_restaurants;
use engine::engine_actors::coordinator::UpdateCoordinator;
use std::env;
use std::time::Duration;
use tokio::signal::ctrl_c;
use tokio::time::sleep;

const MAP_CENTER: (f64, f64) = (40.4168, -3.7038);
const RANDOM_RESTAURANTS: usize = 600;
const FRAME: Duration = Duration::from_millis(16);

fn load_restaurants(path: &str) -> Result<Vec<RestaurantPoint>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Viewports of a drag across the city, a pause, a pinch down to street
/// level, and a pinch back out.
fn gesture() -> Vec<(Viewport, Duration)> {
    let mut frames = Vec::new();
    for step in 0..30 {
        let center = (MAP_CENTER.0 + step as f64 * 0.0008, MAP_CENTER.1 - step as f64 * 0.0005);
        frames.push((Viewport::new(center, (0.06, 0.06)), FRAME));
    }
    let resting = (MAP_CENTER.0 + 0.024, MAP_CENTER.1 - 0.015);
    frames.push((Viewport::new(resting, (0.06, 0.06)), Duration::from_millis(400)));
    for zoom in [0.04, 0.02, 0.01, 0.006, 0.004] {
        frames.push((Viewport::new(resting, (zoom, zoom)), Duration::from_millis(400)));
    }
    for zoom in [0.01, 0.06] {
        frames.push((Viewport::new(resting, (zoom, zoom)), Duration::from_millis(400)));
    }
    frames
}

async fn run(logger: &Logger) -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let config = match args.get(1) {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    let restaurants = match args.get(2) {
        Some(path) => load_restaurants(path)?,
        None => random_restaurants(RANDOM_RESTAURANTS, MAP_CENTER, 0.05),
    };
    logger.info(format!("Loaded {} restaurants.", restaurants.len()));

    let (coordinator, feed) = UpdateCoordinator::launch(config);

    let mut clusters_feed = feed.clone();
    let feed_logger = Logger::new("Map View", Color::Green);
    actix::spawn(async move {
        while let Some(published) = clusters_feed.next_clusters().await {
            let pins: usize = published.clusters.iter().map(|c| c.len()).sum();
            feed_logger.info(format!(
                "#{} {:?}: {} annotations covering {} restaurants",
                published.sequence,
                published.mode,
                published.clusters.len(),
                pins
            ));
        }
    });

    let mut transition_feed = feed.clone();
    let transition_logger = Logger::new("Animator", Color::Blue);
    actix::spawn(async move {
        while let Some(state) = transition_feed.next_transition().await {
            transition_logger.info(format!("Transition state: {}", state));
        }
    });

    for (viewport, pause) in gesture() {
        coordinator.do_send(RequestUpdate::new(restaurants.clone(), viewport));
        sleep(pause).await;
    }
    sleep(Duration::from_millis(500)).await;

    let stats = coordinator.send(GetStats).await?;
    logger.info(format!(
        "Gesture finished. Stats:\n{}",
        serde_json::to_string_pretty(&stats)?
    ));
    Ok(())
}

#[actix::main]
async fn main() -> std::io::Result<()> {
    let logger = Logger::new("MealMap Engine", Color::White);
    tokio::select! {
        result = run(&logger) => {
            if let Err(err) = &result {
                logger.error(format!("{}", err));
            }
            result?;
        }
        _ = ctrl_c() => {
            logger.warn("Ctrl-C received, shutting down...");
        }
    }
    Ok(())
}
