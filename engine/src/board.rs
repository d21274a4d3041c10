//! Fixed-size cell grid and layout decoding.

use wallbound_core::{CellCoord, CellType, RuleError, SetupError, TeleportLink};

/// Number of walls a return cell hands back to the landing player.
const RETURN_CELL_WALL_COUNT: u8 = 2;

/// Immutable grid of cell behaviors generated once at match setup.
#[derive(Clone, Debug)]
pub(crate) struct Board {
    columns: u32,
    rows: u32,
    cells: Vec<CellType>,
}

impl Board {
    /// Decodes the configured layout into a board.
    ///
    /// An empty layout yields an all-normal grid. Layout codes: `.` normal,
    /// `d` double turn, `t` teleport (requires a matching link), `r` return.
    /// Any other code is a corrupted board definition and fails setup.
    pub(crate) fn from_config(
        columns: u32,
        rows: u32,
        layout: &[String],
        links: &[TeleportLink],
    ) -> Result<Self, SetupError> {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        if capacity == 0 {
            return Err(SetupError::EmptyBoard);
        }

        if layout.is_empty() {
            return Ok(Self {
                columns,
                rows,
                cells: vec![CellType::Normal; capacity],
            });
        }

        let row_count = u32::try_from(layout.len()).unwrap_or(u32::MAX);
        if row_count != rows {
            return Err(SetupError::LayoutDimensionMismatch {
                expected_columns: columns,
                expected_rows: rows,
            });
        }

        let mut cells = Vec::with_capacity(capacity);
        for (row, line) in layout.iter().enumerate() {
            let row = u32::try_from(row).unwrap_or(u32::MAX);
            let width = u32::try_from(line.chars().count()).unwrap_or(u32::MAX);
            if width != columns {
                return Err(SetupError::LayoutDimensionMismatch {
                    expected_columns: columns,
                    expected_rows: rows,
                });
            }

            for (column, code) in line.chars().enumerate() {
                let column = u32::try_from(column).unwrap_or(u32::MAX);
                let cell = CellCoord::new(column, row);
                cells.push(decode_cell(code, cell, columns, rows, links)?);
            }
        }

        Ok(Self {
            columns,
            rows,
            cells,
        })
    }

    /// Number of columns in the grid.
    #[must_use]
    pub(crate) const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub(crate) const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether the coordinate lies within the grid.
    #[must_use]
    pub(crate) fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Cell behavior at the coordinate, if it lies within the grid.
    #[must_use]
    pub(crate) fn cell_type(&self, cell: CellCoord) -> Option<CellType> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Cell behavior at the coordinate, failing for callers that passed an
    /// out-of-grid coordinate.
    pub(crate) fn cell_at(&self, cell: CellCoord) -> Result<CellType, RuleError> {
        self.cell_type(cell)
            .ok_or(RuleError::OutOfBounds { cell })
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        Some(row * width + column)
    }
}

fn decode_cell(
    code: char,
    cell: CellCoord,
    columns: u32,
    rows: u32,
    links: &[TeleportLink],
) -> Result<CellType, SetupError> {
    match code {
        '.' => Ok(CellType::Normal),
        'd' => Ok(CellType::DoubleTurn),
        'r' => Ok(CellType::Return {
            count: RETURN_CELL_WALL_COUNT,
        }),
        't' => {
            let link = links
                .iter()
                .find(|link| link.from == cell)
                .ok_or(SetupError::TeleportLinkMissing { cell })?;
            if link.to.column() >= columns || link.to.row() >= rows {
                return Err(SetupError::TeleportLinkOutOfBounds {
                    from: cell,
                    to: link.to,
                });
            }
            Ok(CellType::Teleport {
                destination: link.to,
            })
        }
        other => Err(SetupError::UnknownCellType { code: other, cell }),
    }
}
