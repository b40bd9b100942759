//! Regional analytics handler

use axum::Json;

use crate::models::RegionStats;

/// Static regional detection figures for the global map.
pub async fn list() -> Json<Vec<RegionStats>> {
    Json(vec![
        RegionStats::new("north-america", "North America", 245, 1200, 20.4),
        RegionStats::new("europe", "Europe", 189, 950, 19.9),
        RegionStats::new("asia-pacific", "Asia Pacific", 412, 2100, 19.6),
        RegionStats::new("south-america", "South America", 98, 520, 18.8),
        RegionStats::new("africa", "Africa", 156, 780, 20.0),
        RegionStats::new("middle-east", "Middle East", 203, 1050, 19.3),
    ])
}
