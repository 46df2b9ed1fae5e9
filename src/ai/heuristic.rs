//! Distance estimate for the wraparound grid.

use crate::components::Cell;

/// Manhattan distance where each axis may go either way around the torus.
///
/// Per axis this is `min(|d|, size - |d|)`. It is zero only for equal cells
/// and never exceeds the true step count, walls or not.
pub fn toroidal_manhattan(a: Cell, b: Cell, width: usize, height: usize) -> u32 {
    axis_distance(a.x, b.x, width) + axis_distance(a.y, b.y, height)
}

fn axis_distance(a: i32, b: i32, size: usize) -> u32 {
    let size = size as i64;
    if size == 0 {
        return 0;
    }
    let d = (a as i64 - b as i64).rem_euclid(size);
    d.min(size - d) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_only_for_same_cell() {
        let a = Cell::new(3, 4);
        assert_eq!(toroidal_manhattan(a, a, 10, 10), 0);
        assert!(toroidal_manhattan(a, Cell::new(3, 5), 10, 10) > 0);
    }

    #[test]
    fn direct_when_shorter() {
        assert_eq!(toroidal_manhattan(Cell::new(1, 1), Cell::new(3, 4), 10, 10), 5);
    }

    #[test]
    fn wraps_when_shorter() {
        // 0 -> 9 is one step across the left edge
        assert_eq!(toroidal_manhattan(Cell::new(0, 2), Cell::new(9, 2), 10, 5), 1);
        // 0 -> 4 on a height of 5 is one step across the top edge
        assert_eq!(toroidal_manhattan(Cell::new(2, 0), Cell::new(2, 4), 10, 5), 1);
    }

    #[test]
    fn symmetric() {
        for ax in 0..6 {
            for bx in 0..6 {
                let a = Cell::new(ax, 1);
                let b = Cell::new(bx, 3);
                assert_eq!(
                    toroidal_manhattan(a, b, 6, 5),
                    toroidal_manhattan(b, a, 6, 5)
                );
            }
        }
    }

    #[test]
    fn axis_never_exceeds_half_size() {
        for x in 0..7 {
            assert!(axis_distance(0, x, 7) <= 3);
        }
    }
}
