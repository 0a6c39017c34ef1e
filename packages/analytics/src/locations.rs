//! Per-location load projection and ranking.

use lifeguard_analytics_models::{LocationLoad, PostAggregate};

use crate::split::water_ratio;

/// Name shown for a post whose name is missing.
fn fallback_name(post_id: i64) -> String {
    format!("Post #{post_id}")
}

/// Projects each post's visitor total onto water and land using the ratio
/// of its average counts, then merges posts sharing a display name.
///
/// Locations keep the order in which their name was first seen.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn project_post_loads(posts: &[PostAggregate]) -> Vec<LocationLoad> {
    let mut loads: Vec<LocationLoad> = Vec::new();

    for post in posts {
        let name = post
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .map_or_else(|| fallback_name(post.post_id), ToString::to_string);

        let ratio = water_ratio(post.avg_water, post.avg_land);
        let water = (post.total_visitors as f64 * ratio).round() as i64;
        let land = post.total_visitors - water;

        if let Some(existing) = loads.iter_mut().find(|l| l.name == name) {
            existing.water += water;
            existing.land += land;
        } else {
            loads.push(LocationLoad { name, water, land });
        }
    }

    loads
}

/// Returns the `n` busiest locations by combined load, descending.
///
/// Ties keep their input order.
#[must_use]
pub fn top_locations(mut loads: Vec<LocationLoad>, n: usize) -> Vec<LocationLoad> {
    loads.sort_by_key(|l| std::cmp::Reverse(l.total()));
    loads.truncate(n);
    loads
}
