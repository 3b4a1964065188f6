use std::collections::HashMap;

use smallvec::SmallVec;

use crate::foundation::core::Point;

/// Anything with a position that can be bucketed.
pub trait Positioned {
    /// Position used for bucketing.
    fn position(&self) -> Point;
}

type Bucket = SmallVec<[u32; 8]>;

/// Uniform-grid index over a previous generation, used to hand each new target the closest
/// unclaimed particle.
///
/// The index owns the items. Every item sits in exactly one bucket until it is claimed by
/// [`SpatialIndex::take_closest`] or returned by [`SpatialIndex::drain_remaining`].
pub struct SpatialIndex<T> {
    cell: f64,
    slots: Vec<Option<T>>,
    buckets: HashMap<(i32, i32), Bucket>,
    remaining: usize,
}

impl<T: Positioned> SpatialIndex<T> {
    /// Cell size used for a sampling grid step: `max(8, round(step))`.
    pub fn cell_size_for_step(step: f64) -> f64 {
        step.round().max(8.0)
    }

    /// Index `items` on a grid of `cell`-sized squares.
    pub fn build(items: impl IntoIterator<Item = T>, cell: f64) -> Self {
        let cell = if cell.is_finite() && cell > 0.0 {
            cell
        } else {
            8.0
        };
        let mut index = Self {
            cell,
            slots: Vec::new(),
            buckets: HashMap::new(),
            remaining: 0,
        };
        for item in items {
            let key = index.key_for(item.position());
            let slot = index.slots.len() as u32;
            index.slots.push(Some(item));
            index.buckets.entry(key).or_default().push(slot);
        }
        index.remaining = index.slots.len();
        index
    }

    fn key_for(&self, p: Point) -> (i32, i32) {
        let cx = (p.x / self.cell).floor();
        let cy = (p.y / self.cell).floor();
        (
            cx.clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32,
            cy.clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32,
        )
    }

    /// Grid cell size.
    pub fn cell_size(&self) -> f64 {
        self.cell
    }

    /// Unclaimed items left in the index.
    pub fn len(&self) -> usize {
        self.remaining
    }

    /// Whether every item has been taken.
    pub fn is_empty(&self) -> bool {
        self.remaining == 0
    }

    /// Remove and return the item nearest to `p` among the 3x3 cells around `p`'s cell.
    pub fn take_closest(&mut self, p: Point) -> Option<T> {
        if self.remaining == 0 {
            return None;
        }
        let (cx, cy) = self.key_for(p);

        let mut best: Option<((i32, i32), usize, f64)> = None;
        for dy in -1..=1 {
            for dx in -1..=1 {
                let key = (cx.saturating_add(dx), cy.saturating_add(dy));
                let Some(bucket) = self.buckets.get(&key) else {
                    continue;
                };
                for (pos, &slot) in bucket.iter().enumerate() {
                    let Some(item) = self.slots[slot as usize].as_ref() else {
                        continue;
                    };
                    let d2 = (item.position() - p).hypot2();
                    if best.is_none_or(|(_, _, bd)| d2 < bd) {
                        best = Some((key, pos, d2));
                    }
                }
            }
        }

        let (key, pos, _) = best?;
        let bucket = self.buckets.get_mut(&key)?;
        let slot = bucket.swap_remove(pos);
        if bucket.is_empty() {
            self.buckets.remove(&key);
        }
        self.remaining -= 1;
        self.slots[slot as usize].take()
    }

    /// Remove and return every unclaimed item, in no particular order.
    pub fn drain_remaining(&mut self) -> Vec<T> {
        self.buckets.clear();
        self.remaining = 0;
        self.slots.drain(..).flatten().collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/particles/spatial.rs"]
mod tests;
