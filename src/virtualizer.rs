// Fixed-pool virtualization of an unbounded logical grid.
//
// A fixed number of visual slots is remapped onto whichever logical cells
// the scroll offset makes visible. Slots whose cell stays visible keep
// their assignment; the rest become available for newly exposed cells.
// Memory is O(viewport area) regardless of how far the grid is dragged.

use fnv::{FnvHashMap, FnvHashSet};
use glam::Vec2;
use std::fmt;
use std::ops::Range;

/// Integer grid coordinate, independent of any visual resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellKey {
    pub col: i64,
    pub row: i64,
}

impl CellKey {
    pub fn new(col: i64, row: i64) -> Self {
        Self { col, row }
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.col, self.row)
    }
}

/// Logical column/row ranges visible at `offset`, padded by `buffer` cells
/// on every side.
pub fn visible_range(
    offset: Vec2,
    viewport: Vec2,
    cell_size: f32,
    buffer: i64,
) -> (Range<i64>, Range<i64>) {
    let start_col = (-offset.x / cell_size).floor() as i64 - buffer;
    let end_col = ((viewport.x - offset.x) / cell_size).ceil() as i64 + buffer;
    let start_row = (-offset.y / cell_size).floor() as i64 - buffer;
    let end_row = ((viewport.y - offset.y) / cell_size).ceil() as i64 + buffer;
    (start_col..end_col, start_row..end_row)
}

/// Slot count that covers any offset for the given viewport.
///
/// A fractional offset can straddle one extra cell per axis, so the visible
/// range width is bounded by `ceil(extent/cell) + 1 + 2*buffer`. A pool of
/// this size can never be exhausted by `virtualize`.
pub fn pool_size_for(viewport: Vec2, cell_size: f32, buffer: i64) -> usize {
    let cols = (viewport.x / cell_size).ceil() as i64 + 1 + 2 * buffer;
    let rows = (viewport.y / cell_size).ceil() as i64 + 1 + 2 * buffer;
    (cols.max(1) * rows.max(1)) as usize
}

/// A reusable visual slot, assigned to at most one logical cell at a time.
#[derive(Debug, Clone, Default)]
pub struct Slot {
    pub assigned: Option<CellKey>,
    /// Top-left screen position in pixels for the current assignment.
    pub screen_pos: Vec2,
    /// Set when the slot was handed a new cell and its content must be
    /// re-rendered.
    pub dirty: bool,
}

/// Fixed pool of visual slots mapped onto the visible key set.
pub struct CellPool {
    pub cell_size: f32,
    buffer: i64,
    pub slots: Vec<Slot>,
    /// Bumped on every rebuild so slot-keyed instances can be diffed away.
    pub generation: u64,
    pinned: Vec<usize>,
    exhausted_logged: bool,
}

impl CellPool {
    pub fn new(cell_size: f32, buffer: i64) -> Self {
        Self {
            cell_size,
            buffer,
            slots: Vec::new(),
            generation: 0,
            pinned: Vec::new(),
            exhausted_logged: false,
        }
    }

    /// Resize the pool for a new viewport. All assignments are dropped and
    /// the generation advances; callers must rebuild dependent resources.
    pub fn rebuild(&mut self, viewport: Vec2) {
        let count = pool_size_for(viewport, self.cell_size, self.buffer);
        self.slots.clear();
        self.slots.resize_with(count, Slot::default);
        self.pinned.clear();
        self.generation += 1;
        self.exhausted_logged = false;
        log::info!(
            "[pool] rebuilt: {} slots for viewport {:.0}x{:.0} (gen {})",
            count,
            viewport.x,
            viewport.y,
            self.generation
        );
    }

    /// Pin a slot so virtualization neither reassigns it nor moves it
    /// (used across the focus overlay transition).
    pub fn pin(&mut self, index: usize) {
        if !self.pinned.contains(&index) {
            self.pinned.push(index);
        }
    }

    pub fn unpin(&mut self, index: usize) {
        self.pinned.retain(|&i| i != index);
    }

    pub fn is_pinned(&self, index: usize) -> bool {
        self.pinned.contains(&index)
    }

    /// Remap slots onto the key set visible at `offset` and refresh screen
    /// positions. Idempotent for a repeated offset: surviving assignments
    /// are never shuffled between slots.
    pub fn virtualize(&mut self, offset: Vec2, viewport: Vec2) {
        let (cols, rows) = visible_range(offset, viewport, self.cell_size, self.buffer);

        let mut required: FnvHashSet<CellKey> = FnvHashSet::default();
        let mut needed: Vec<CellKey> = Vec::with_capacity(
            ((cols.end - cols.start).max(0) * (rows.end - rows.start).max(0)) as usize,
        );
        for row in rows.clone() {
            for col in cols.clone() {
                let key = CellKey::new(col, row);
                required.insert(key);
                needed.push(key);
            }
        }

        // Release slots whose cell left the visible set. Pinned slots are
        // withheld from reuse on both sides of the swap.
        let mut available: Vec<usize> = Vec::new();
        for i in 0..self.slots.len() {
            if self.is_pinned(i) {
                continue;
            }
            let stale = self.slots[i]
                .assigned
                .map(|key| !required.contains(&key))
                .unwrap_or(true);
            if stale {
                self.slots[i].assigned = None;
                available.push(i);
            }
        }
        available.reverse(); // pop from the front of the pool first

        let mut slot_by_key: FnvHashMap<CellKey, usize> = FnvHashMap::default();
        for (i, slot) in self.slots.iter().enumerate() {
            if let Some(key) = slot.assigned {
                slot_by_key.insert(key, i);
            }
        }

        for key in needed {
            let index = match slot_by_key.get(&key) {
                Some(&i) => i,
                None => match available.pop() {
                    Some(i) => {
                        self.slots[i].assigned = Some(key);
                        self.slots[i].dirty = true;
                        slot_by_key.insert(key, i);
                        i
                    }
                    None => {
                        // Capacity misconfiguration, not a runtime error:
                        // the position stays unfilled this frame.
                        if !self.exhausted_logged {
                            log::warn!("[pool] exhausted; {} left unfilled", key);
                            self.exhausted_logged = true;
                        }
                        continue;
                    }
                },
            };
            if self.is_pinned(index) {
                continue;
            }
            self.slots[index].screen_pos = Vec2::new(
                key.col as f32 * self.cell_size + offset.x,
                key.row as f32 * self.cell_size + offset.y,
            );
        }
    }

    /// Slot indices currently carrying a live (assigned or pinned) element.
    pub fn live_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(i, slot)| slot.assigned.is_some() || self.is_pinned(*i))
            .map(|(i, _)| i)
    }
}
