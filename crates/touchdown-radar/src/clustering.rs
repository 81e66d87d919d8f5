//! Site clustering and ranking.

use std::cmp::Ordering;

use touchdown_core::types::LandingSite;

/// Representative preference: obstacle-free first, then higher score, then
/// nearer to the vehicle.
fn preference(a: &LandingSite, b: &LandingSite) -> Ordering {
    a.has_obstacles
        .cmp(&b.has_obstacles)
        .then_with(|| b.suitability_score.total_cmp(&a.suitability_score))
        .then_with(|| a.distance_from_ship.total_cmp(&b.distance_from_ship))
}

/// Ranking order: higher score first, then nearer.
pub fn rank_order(a: &LandingSite, b: &LandingSite) -> Ordering {
    b.suitability_score
        .total_cmp(&a.suitability_score)
        .then_with(|| a.distance_from_ship.total_cmp(&b.distance_from_ship))
}

/// Whether two sites overlap closely enough to be one landing area.
pub fn sites_overlap(a: &LandingSite, b: &LandingSite, margin: f32) -> bool {
    a.position.distance(b.position) < a.size + b.size + margin
}

/// Collapse overlapping sites to one representative each.
///
/// Greedy over the preference order: a site is kept only if it does not
/// overlap any site kept before it, so the kept site of each cluster is the
/// most preferred one.
pub fn cluster_sites(mut sites: Vec<LandingSite>, margin: f32) -> Vec<LandingSite> {
    sites.sort_by(preference);
    let mut kept: Vec<LandingSite> = Vec::with_capacity(sites.len());
    for site in sites {
        if !kept.iter().any(|k| sites_overlap(k, &site, margin)) {
            kept.push(site);
        }
    }
    kept
}

/// Sort best first and cap to `max_results`.
pub fn rank_sites(sites: &mut Vec<LandingSite>, max_results: usize) {
    sites.sort_by(rank_order);
    sites.truncate(max_results);
}
