//! Behavior table for the cell catalog.
//!
//! Each cell type maps to effects at three lifecycle points: landing,
//! start of turn, and finish of turn. The state machine resolves the
//! returned [`CellEffect`] during its commit step, so cell behaviors stay
//! pure and never touch match state directly.

use wallbound_core::{CellCoord, CellType};

/// Effect a cell hook asks the state machine to apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CellEffect {
    /// Nothing happens.
    None,
    /// The in-turn player keeps the turn once this one resolves.
    ExtraTurn,
    /// The landing token relocates to the destination cell.
    Teleport {
        /// Cell the token is moved to.
        destination: CellCoord,
    },
    /// Walls return from the board to the in-turn player's budget.
    ReturnWalls {
        /// Maximum number of walls handed back.
        count: u8,
    },
}

/// Effect applied when a token lands on the cell.
pub(crate) fn on_land(cell: CellType) -> CellEffect {
    match cell {
        CellType::Normal => CellEffect::None,
        CellType::DoubleTurn => CellEffect::ExtraTurn,
        CellType::Teleport { destination } => CellEffect::Teleport { destination },
        CellType::Return { count } => CellEffect::ReturnWalls { count },
    }
}

/// Effect applied when the in-turn player starts a turn on the cell.
///
/// Every shipped cell type is inert at turn start; the hook exists so the
/// state machine dispatches it at the protocol point regardless.
pub(crate) fn at_start_turn(cell: CellType) -> CellEffect {
    match cell {
        CellType::Normal
        | CellType::DoubleTurn
        | CellType::Teleport { .. }
        | CellType::Return { .. } => CellEffect::None,
    }
}

/// Effect applied when the in-turn player finishes a turn on the cell.
///
/// Inert for every shipped cell type, mirroring [`at_start_turn`].
pub(crate) fn at_finish_turn(cell: CellType) -> CellEffect {
    match cell {
        CellType::Normal
        | CellType::DoubleTurn
        | CellType::Teleport { .. }
        | CellType::Return { .. } => CellEffect::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landing_effects_follow_the_catalog() {
        assert_eq!(on_land(CellType::Normal), CellEffect::None);
        assert_eq!(on_land(CellType::DoubleTurn), CellEffect::ExtraTurn);
        assert_eq!(
            on_land(CellType::Teleport {
                destination: CellCoord::new(3, 4)
            }),
            CellEffect::Teleport {
                destination: CellCoord::new(3, 4)
            }
        );
        assert_eq!(
            on_land(CellType::Return { count: 2 }),
            CellEffect::ReturnWalls { count: 2 }
        );
    }

    #[test]
    fn start_and_finish_hooks_are_inert_for_all_shipped_cells() {
        let cells = [
            CellType::Normal,
            CellType::DoubleTurn,
            CellType::Teleport {
                destination: CellCoord::new(0, 0),
            },
            CellType::Return { count: 2 },
        ];
        for cell in cells {
            assert_eq!(at_start_turn(cell), CellEffect::None);
            assert_eq!(at_finish_turn(cell), CellEffect::None);
        }
    }
}
