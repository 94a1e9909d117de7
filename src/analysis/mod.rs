//! Aspect detection and object grouping.

pub mod orbs;
pub mod stelliums;

pub use orbs::*;
pub use stelliums::*;

use crate::ephemeris::shortest_arc_deg;
use crate::models::{Aspect, AspectInfo, AspectTypes, ChartObjectInfo};

/// Find the closest aspect between two objects.
///
/// Only aspects whose category is in `types` are tried. Of the aspects
/// accepted by `orbs`, the one with the smallest delta wins; on a tie the
/// earlier aspect in [`Aspect::all`] order is kept.
pub fn find_closest_aspect(
    source: &ChartObjectInfo,
    target: &ChartObjectInfo,
    orbs: &dyn OrbsMethod,
    types: AspectTypes,
) -> Option<AspectInfo> {
    let arc = shortest_arc_deg(source.longitude(), target.longitude());

    Aspect::all()
        .iter()
        .filter(|aspect| types.contains(aspect.aspect_type()))
        .filter_map(|aspect| orbs.is_aspect(source, target, *aspect, Some(arc)))
        .fold(None, |closest: Option<AspectInfo>, info| match closest {
            Some(c) if c.delta <= info.delta => Some(c),
            _ => Some(info),
        })
}
