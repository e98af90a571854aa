use crate::aggregate::{NationAggregate, Nations};
use crate::geometry::distance;

/// Names of every other nation whose centroid lies within `radius` of
/// `target`'s centroid, boundary included.
///
/// `target_name` is the key `target` is stored under in `all`; that entry is
/// skipped. Names come back in the map's key order, i.e. sorted.
pub fn nearby_nations(
    target_name: &str,
    target: &NationAggregate,
    all: &Nations,
    radius: f64,
) -> Vec<String> {
    let origin = target.centroid();
    all.iter()
        .filter(|(name, _)| name.as_str() != target_name)
        .filter(|(_, other)| distance(origin, other.centroid()) <= radius)
        .map(|(name, _)| name.clone())
        .collect()
}
