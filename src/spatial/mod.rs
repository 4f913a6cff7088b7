use std::collections::HashMap;

use crate::types::Vec2;

/// Uniform grid used to narrow neighbor candidates. With `cell_size` equal to
/// the proximity threshold, every point within the threshold on both axes
/// lies in the 3×3 block of cells around the query.
#[derive(Debug)]
pub struct NeighborGrid {
    cell_size: f32,
    cells: HashMap<(i32, i32), Vec<usize>>,
}

impl NeighborGrid {
    pub fn new(cell_size: f32) -> Self {
        assert!(
            cell_size.is_finite() && cell_size > 0.0,
            "cell_size must be positive and finite"
        );
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    pub fn rebuild<I>(&mut self, positions: I)
    where
        I: IntoIterator<Item = Vec2>,
    {
        self.cells.clear();
        for (idx, pos) in positions.into_iter().enumerate() {
            let key = self.cell_key(pos);
            self.cells.entry(key).or_default().push(idx);
        }
    }

    /// Indices in the cells adjacent to `pos`, its own cell included.
    pub fn candidates(&self, pos: Vec2, out: &mut Vec<usize>) {
        out.clear();
        let (cx, cy) = self.cell_key(pos);
        for dy in -1..=1 {
            for dx in -1..=1 {
                if let Some(indices) = self.cells.get(&(cx + dx, cy + dy)) {
                    out.extend_from_slice(indices);
                }
            }
        }
    }

    fn cell_key(&self, pos: Vec2) -> (i32, i32) {
        let cx = (pos.x / self.cell_size).floor() as i32;
        let cy = (pos.y / self.cell_size).floor() as i32;
        (cx, cy)
    }
}
