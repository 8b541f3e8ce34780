//! Fixed 15-column grid: two 7-day halves split by an empty gap column

use serde::Serialize;

/// Days per grid row.
pub const DAYS_PER_ROW: u32 = 14;
/// Total columns including the gap.
pub const GRID_COLUMNS: u32 = 15;
/// Column index that never holds a day.
pub const GAP_COLUMN: u32 = 7;

/// What occupies a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "index", rename_all = "snake_case")]
pub enum Slot {
    /// Non-drawing filler before Jan 1 so day 0 sits under its weekday
    Leading(u32),
    /// Day of the year, zero based
    Day(u32),
}

impl Slot {
    pub fn day_index(&self) -> Option<u32> {
        match self {
            Slot::Day(d) => Some(*d),
            Slot::Leading(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridCell {
    pub slot: Slot,
    pub row: u32,
    pub col: u32,
}

/// Map a structural offset (leading slots + day index) to `(row, col)`.
pub fn position(offset: u32) -> (u32, u32) {
    let pos_in_row = offset % DAYS_PER_ROW;
    let col = if pos_in_row < GAP_COLUMN { pos_in_row } else { pos_in_row + 1 };
    (offset / DAYS_PER_ROW, col)
}

/// Grid topology for one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridLayout {
    pub total_days: u32,
    pub weekday_offset: u32,
    pub rows: u32,
}

impl GridLayout {
    pub fn new(total_days: u32, weekday_offset: u32) -> Self {
        Self {
            total_days,
            weekday_offset,
            rows: (total_days + weekday_offset).div_ceil(DAYS_PER_ROW),
        }
    }

    pub const fn cols(&self) -> u32 {
        GRID_COLUMNS
    }

    pub fn has_leading_gap_at_row0(&self) -> bool {
        self.weekday_offset > 0
    }

    /// Cell holding `day_index`, or `None` past the end of the year.
    pub fn cell_for_day(&self, day_index: u32) -> Option<GridCell> {
        if day_index >= self.total_days {
            return None;
        }
        let (row, col) = position(self.weekday_offset + day_index);
        Some(GridCell { slot: Slot::Day(day_index), row, col })
    }

    /// Leading placeholders followed by every day, in order.
    ///
    /// Each call starts a fresh iterator.
    pub fn cells(&self) -> Cells {
        Cells { offset: 0, end: self.weekday_offset + self.total_days, weekday_offset: self.weekday_offset }
    }

    /// Only the day cells, skipping placeholders.
    pub fn day_cells(&self) -> impl Iterator<Item = GridCell> {
        self.cells().filter(|c| matches!(c.slot, Slot::Day(_)))
    }
}

/// Lazy iterator over a [`GridLayout`].
#[derive(Debug, Clone)]
pub struct Cells {
    offset: u32,
    end: u32,
    weekday_offset: u32,
}

impl Iterator for Cells {
    type Item = GridCell;

    fn next(&mut self) -> Option<GridCell> {
        if self.offset >= self.end {
            return None;
        }
        let offset = self.offset;
        self.offset += 1;

        let (row, col) = position(offset);
        let slot = if offset < self.weekday_offset {
            Slot::Leading(offset)
        } else {
            Slot::Day(offset - self.weekday_offset)
        };
        Some(GridCell { slot, row, col })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = (self.end - self.offset) as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Cells {}
