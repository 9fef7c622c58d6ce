//! Hit testing: pointer → node lookup.
//!
//! Nodes are drawn as fixed-size markers in screen space, so the test runs
//! in screen units: each node is mapped onto the screen and compared against
//! the pointer with a screen-pixel radius. Later nodes are painted on top,
//! so the walk goes back-to-front.

use crate::coords::SurfaceMapping;
use crate::id::NodeId;
use crate::model::Graph;

/// Find the topmost node within `radius` screen pixels of `(px, py)`.
/// Returns `None` if the pointer is over the bare background.
pub fn hit_test(
    graph: &Graph,
    mapping: &SurfaceMapping,
    px: f64,
    py: f64,
    radius: f64,
) -> Option<NodeId> {
    let r2 = radius * radius;
    graph
        .nodes()
        .iter()
        .rev()
        .find(|n| {
            let (sx, sy) = mapping.to_screen(n.x, n.y);
            let (dx, dy) = (sx - px, sy - py);
            dx * dx + dy * dy <= r2
        })
        .map(|n| n.id)
}
