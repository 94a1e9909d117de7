//! Stelliums: groups of closely spaced objects.

use std::collections::VecDeque;

use crate::ephemeris::{diff_angle, shortest_arc_deg};
use crate::models::ChartObjectInfo;

/// Default maximal distance between neighbours of one group, degrees
pub const DEFAULT_GAP: f64 = 10.0;

/// Partition objects into stelliums.
///
/// Objects are ordered by longitude, with any group straddling 0° Aries
/// rotated to the front, and a new group starts wherever the distance to
/// the next object exceeds `gap`. Every object lands in exactly one group.
pub fn stelliums(objects: &[ChartObjectInfo], gap: f64) -> Vec<Vec<ChartObjectInfo>> {
    let mut sorted = objects.to_vec();
    sorted.sort_by(|a, b| a.longitude().total_cmp(&b.longitude()));

    let count = sorted.len();
    let mut deq: VecDeque<ChartObjectInfo> = sorted.into();

    if count > 1 {
        for _ in 0..count {
            let (Some(first), Some(last)) = (deq.pop_front(), deq.pop_back()) else {
                break;
            };
            if shortest_arc_deg(first.longitude(), last.longitude()) <= gap {
                deq.push_front(first);
                deq.push_front(last);
            } else {
                deq.push_front(first);
                deq.push_back(last);
                break;
            }
        }
    }

    let mut groups = Vec::new();
    let mut group: Vec<ChartObjectInfo> = Vec::new();
    let mut iter = deq.into_iter().peekable();

    while let Some(curr) = iter.next() {
        let split = iter
            .peek()
            .map_or(true, |next| diff_angle(curr.longitude(), next.longitude()) > gap);
        group.push(curr);
        if split {
            groups.push(std::mem::take(&mut group));
        }
    }

    tracing::trace!(objects = count, groups = groups.len(), gap, "stelliums partitioned");
    groups
}
