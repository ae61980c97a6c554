//! Adjacency melding: cluster boxes closer than a threshold and replace each
//! cluster by its enclosing box.
//!
//! Adjacency is decided on the input boxes only. Two melds that end up close
//! to each other after enclosing their members are not merged again within
//! the same call; [`meld_until_stable`] repeats the pass for callers that
//! want that.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::disjoint_set::DisjointSet;
use crate::tile_box::TileBox;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Output of one melding pass.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeldResult {
    /// One enclosing box per cluster, ordered by the cluster's first input index.
    pub melds: Vec<TileBox>,
    /// True iff at least one pair of boxes was merged.
    pub did_meld: bool,
}

/// Output of [`meld_until_stable`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StableMeld {
    /// Final melds. `did_meld` is true if any pass merged something.
    pub result: MeldResult,
    /// Number of passes executed.
    pub passes: usize,
}

/// Partition `boxes` into clusters of boxes transitively closer than
/// `threshold`. Also returns how many merges happened.
pub(crate) fn cluster_adjacent(boxes: &[TileBox], threshold: f64) -> (Vec<Vec<usize>>, usize) {
    let n = boxes.len();
    let mut sets = DisjointSet::new(n);
    let mut merges = 0usize;

    // Full cross product, both directions.
    for i in 0..n {
        for j in 0..n {
            if i == j || sets.same_set(i, j) {
                continue;
            }
            if boxes[i].shortest_distance(&boxes[j]) < threshold && sets.union(i, j) {
                merges += 1;
            }
        }
    }

    (sets.groups(), merges)
}

/// Single melding pass over `boxes`.
///
/// Every pair closer than `threshold` (strictly) ends up in the same
/// cluster, transitively. A threshold of 0 (or negative / NaN) merges
/// nothing, since distances are never negative. Runs `O(n²)` distance
/// evaluations.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(boxes), fields(num_boxes = boxes.len()))
)]
pub fn meld_adjacent(boxes: &[TileBox], threshold: f64) -> MeldResult {
    let (groups, merges) = cluster_adjacent(boxes, threshold);

    let mut melds = Vec::with_capacity(groups.len());
    for members in &groups {
        // Groups from `DisjointSet::groups` are never empty.
        match TileBox::meld(members.iter().map(|&i| &boxes[i])) {
            Ok(meld) => melds.push(meld),
            Err(err) => warn!("skipping cluster {members:?}: {err}"),
        }
    }

    debug!(
        "melded {} boxes into {} (threshold {threshold}, {merges} merges)",
        boxes.len(),
        melds.len()
    );

    MeldResult {
        melds,
        did_meld: merges > 0,
    }
}

/// Repeat [`meld_adjacent`] on its own output until a pass merges nothing
/// or `max_passes` passes have run.
///
/// `max_passes == 0` returns the input unchanged.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(boxes), fields(num_boxes = boxes.len()))
)]
pub fn meld_until_stable(boxes: &[TileBox], threshold: f64, max_passes: usize) -> StableMeld {
    let mut melds = boxes.to_vec();
    let mut did_meld = false;
    let mut passes = 0usize;

    while passes < max_passes {
        let pass = meld_adjacent(&melds, threshold);
        passes += 1;
        melds = pass.melds;
        if !pass.did_meld {
            break;
        }
        did_meld = true;
        if passes == max_passes {
            warn!("stopped after {max_passes} passes, melds may still be adjacent");
        }
    }

    StableMeld {
        result: MeldResult { melds, did_meld },
        passes,
    }
}
