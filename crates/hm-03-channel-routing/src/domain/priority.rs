//! Priority resolution
//!
//! Lower `priority` wins. A channel without one ranks after every channel
//! that has one. Ties, including several channels without a priority, break
//! on `name` and then `id`, so the winner never depends on snapshot order.

use shared_types::entities::Channel;
use std::cmp::Ordering;

/// Total order over candidates; the first element wins.
#[must_use]
pub fn rank(a: &Channel, b: &Channel) -> Ordering {
    let key = |c: &Channel| (c.priority.is_none(), c.priority);
    key(a)
        .cmp(&key(b))
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}

/// The single winner, or `None` for an empty candidate set.
#[must_use]
pub fn resolve<'a>(candidates: &[&'a Channel]) -> Option<&'a Channel> {
    candidates.iter().copied().min_by(|a, b| rank(a, b))
}
