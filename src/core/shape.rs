//! Shape library and rotation.
//!
//! Each piece variant has a fixed template: a square matrix of cells carrying
//! the variant's kind in the occupied positions. `Shape::for_kind` hands out an
//! independently owned copy per call, so no caller can corrupt a template.
//! Rotation is pure and always returns a new value.

use arrayvec::ArrayVec;
use thiserror::Error;

use crate::types::{Cell, PieceKind};

/// Largest template side length (the I piece)
pub const MAX_SHAPE_SIZE: usize = 4;

type Row = ArrayVec<Cell, MAX_SHAPE_SIZE>;

/// Shape lookup with a label outside 1-7. Unreachable through normal play
/// (spawning selects from `PieceKind::ALL`); surfaced as an error instead of a
/// malformed shape when it happens programmatically.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("unknown piece variant label {0}")]
pub struct InvalidVariant(pub u8);

/// A square cell matrix for one piece orientation.
///
/// All templates are stored in their bounding square: the I piece occupies
/// row 1 of a 4x4 matrix rather than a 1x4 strip. Invariant: `rows` is N x N
/// with N <= 4, which keeps the transpose-based rotation defined for every
/// variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    rows: ArrayVec<Row, MAX_SHAPE_SIZE>,
}

impl Shape {
    /// Fresh copy of the template for `kind`.
    pub fn for_kind(kind: PieceKind) -> Self {
        match kind {
            PieceKind::T => Self::from_pattern(kind, [[0, 1, 0], [1, 1, 1], [0, 0, 0]]),
            PieceKind::O => Self::from_pattern(kind, [[1, 1], [1, 1]]),
            PieceKind::L => Self::from_pattern(kind, [[0, 1, 0], [0, 1, 0], [0, 1, 1]]),
            PieceKind::J => Self::from_pattern(kind, [[0, 1, 0], [0, 1, 0], [1, 1, 0]]),
            PieceKind::I => Self::from_pattern(
                kind,
                [[0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]],
            ),
            PieceKind::S => Self::from_pattern(kind, [[0, 1, 1], [1, 1, 0], [0, 0, 0]]),
            PieceKind::Z => Self::from_pattern(kind, [[1, 1, 0], [0, 1, 1], [0, 0, 0]]),
        }
    }

    /// Template lookup by numeric label (1-7).
    pub fn for_label(label: u8) -> Result<Self, InvalidVariant> {
        PieceKind::from_label(label)
            .map(Self::for_kind)
            .ok_or(InvalidVariant(label))
    }

    fn from_pattern<const N: usize>(kind: PieceKind, pattern: [[u8; N]; N]) -> Self {
        let mut rows = ArrayVec::new();
        for pattern_row in pattern {
            let mut row = Row::new();
            for occupied in pattern_row {
                row.push(if occupied == 0 { None } else { Some(kind) });
            }
            rows.push(row);
        }
        Self { rows }
    }

    /// Side length of the square matrix.
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    /// Cell at matrix position (x, y); empty outside the matrix.
    pub fn cell(&self, x: usize, y: usize) -> Cell {
        self.rows.get(y).and_then(|row| row.get(x)).copied().flatten()
    }

    /// Iterate the occupied cells as (x, y, kind) matrix offsets.
    pub fn occupied(&self) -> impl Iterator<Item = (i8, i8, PieceKind)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(x, cell)| cell.map(|kind| (x as i8, y as i8, kind)))
        })
    }

    /// 90-degree clockwise rotation: transpose, then reverse each row.
    ///
    /// Pure; `self` is untouched and the result has the same dimensions.
    pub fn rotated_cw(&self) -> Self {
        debug_assert!(self.rows.iter().all(|row| row.len() == self.size()));

        let n = self.size();
        let mut out = self.clone();
        for y in 0..n {
            for x in (y + 1)..n {
                let upper = out.rows[y][x];
                out.rows[y][x] = out.rows[x][y];
                out.rows[x][y] = upper;
            }
        }
        for row in &mut out.rows {
            row.reverse();
        }
        out
    }
}
