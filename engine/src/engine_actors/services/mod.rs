pub mod grid_clusterer;
