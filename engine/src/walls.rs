//! Authoritative wall state, archetype shapes, and footprint geometry.

use std::collections::BTreeMap;

use wallbound_core::{CellCoord, Direction, PlayerId, WallId, WallKind, WallShape};

/// Wall stored inside the match, stamped at placement time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct WallState {
    id: WallId,
    kind: WallKind,
    owner: Option<PlayerId>,
    anchor: CellCoord,
    facing: Direction,
    shape: WallShape,
    ally: bool,
    creation_turn: u32,
}

impl WallState {
    /// Identifier allocated by the registry.
    #[must_use]
    pub(crate) const fn id(&self) -> WallId {
        self.id
    }

    /// Archetype the wall was built from.
    #[must_use]
    pub(crate) const fn kind(&self) -> WallKind {
        self.kind
    }

    /// Player the wall belongs to; `None` for pre-placed neutral walls.
    #[must_use]
    pub(crate) const fn owner(&self) -> Option<PlayerId> {
        self.owner
    }

    /// Top-left cell anchoring the footprint on the board.
    #[must_use]
    pub(crate) const fn anchor(&self) -> CellCoord {
        self.anchor
    }

    /// Facing the wall currently presents.
    #[must_use]
    pub(crate) const fn facing(&self) -> Direction {
        self.facing
    }

    /// Sparse footprint matrix the wall occupies.
    #[must_use]
    pub(crate) const fn shape(&self) -> &WallShape {
        &self.shape
    }

    /// Whether the wall counts toward the ally mechanic instead of
    /// blocking allied players.
    #[must_use]
    pub(crate) const fn is_ally(&self) -> bool {
        self.ally
    }

    /// Turn number stamped when the wall entered the board.
    #[must_use]
    pub(crate) const fn creation_turn(&self) -> u32 {
        self.creation_turn
    }

    /// Reports whether the wall carries material at the board coordinate.
    #[must_use]
    pub(crate) fn covers(&self, cell: CellCoord) -> bool {
        footprint_covers(self.anchor, &self.shape, cell)
    }

    /// True once a temporal wall has persisted for its full lifetime.
    ///
    /// Walls of every other kind never expire.
    #[must_use]
    pub(crate) fn is_expired(&self, current_turn: u32, lifetime: u32) -> bool {
        self.kind.expires() && current_turn.saturating_sub(self.creation_turn) >= lifetime
    }
}

/// Registry that stores placed walls and manages identifier allocation.
#[derive(Clone, Debug, Default)]
pub(crate) struct WallRegistry {
    entries: BTreeMap<WallId, WallState>,
    next_id: u32,
}

impl WallRegistry {
    /// Creates an empty registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Stamps and stores a new wall, returning its allocated identifier.
    pub(crate) fn insert(
        &mut self,
        kind: WallKind,
        owner: Option<PlayerId>,
        anchor: CellCoord,
        facing: Direction,
        shape: WallShape,
        creation_turn: u32,
    ) -> WallId {
        let id = WallId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        let state = WallState {
            id,
            kind,
            owner,
            anchor,
            facing,
            shape,
            ally: archetype_is_ally(kind),
            creation_turn,
        };
        let _ = self.entries.insert(id, state);
        id
    }

    /// Removes a wall from the board, yielding its final state.
    pub(crate) fn remove(&mut self, id: WallId) -> Option<WallState> {
        self.entries.remove(&id)
    }

    /// Looks up a wall by identifier.
    #[must_use]
    pub(crate) fn get(&self, id: WallId) -> Option<&WallState> {
        self.entries.get(&id)
    }

    /// Replaces a wall's footprint and facing after a committed rotation.
    ///
    /// Rotation never touches ownership, ally flag, or creation turn.
    pub(crate) fn set_shape(&mut self, id: WallId, shape: WallShape, facing: Direction) {
        if let Some(state) = self.entries.get_mut(&id) {
            state.shape = shape;
            state.facing = facing;
        }
    }

    /// Iterator over all placed walls in ascending identifier order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &WallState> {
        self.entries.values()
    }

    /// Walls whose footprint carries material at the board coordinate.
    pub(crate) fn covering(&self, cell: CellCoord) -> impl Iterator<Item = &WallState> {
        self.entries.values().filter(move |wall| wall.covers(cell))
    }
}

/// Default footprint shape for each wall archetype.
///
/// Archetypes differ only in their default footprint, material, and ally
/// flag; runs of material sit in the top row of a square sparse matrix so
/// a clockwise rotation stands them upright.
pub(crate) fn archetype_shape(kind: WallKind) -> WallShape {
    let (side, run, material) = match kind {
        WallKind::Normal => (3, 3, WallKind::Normal),
        WallKind::Large => (4, 4, WallKind::Large),
        WallKind::Temporal => (3, 3, WallKind::Temporal),
        WallKind::Ally => (3, 3, WallKind::Ally),
    };

    let capacity = usize::try_from(u64::from(side) * u64::from(side)).unwrap_or(0);
    let mut cells = vec![None; capacity];
    for slot in cells.iter_mut().take(run) {
        *slot = Some(material);
    }

    WallShape::from_cells(side, side, cells).expect("archetype dimensions match the cell count")
}

/// Reports whether a footprint anchored at `anchor` carries material at
/// the board coordinate.
#[must_use]
pub(crate) fn footprint_covers(anchor: CellCoord, shape: &WallShape, cell: CellCoord) -> bool {
    let Some(column) = cell.column().checked_sub(anchor.column()) else {
        return false;
    };
    let Some(row) = cell.row().checked_sub(anchor.row()) else {
        return false;
    };
    shape.at(column, row).is_some()
}

/// Reports whether walls of the archetype carry the ally flag.
#[must_use]
pub(crate) fn archetype_is_ally(kind: WallKind) -> bool {
    kind.is_ally()
}

/// Archetype shape turned to the requested facing.
pub(crate) fn oriented_shape(kind: WallKind, facing: Direction) -> WallShape {
    let mut shape = archetype_shape(kind);
    for _ in 0..facing.quarter_turns() {
        shape = shape.rotated();
    }
    shape
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with_normal_wall(anchor: CellCoord) -> (WallRegistry, WallId) {
        let mut registry = WallRegistry::new();
        let id = registry.insert(
            WallKind::Normal,
            Some(PlayerId::new(0)),
            anchor,
            Direction::North,
            archetype_shape(WallKind::Normal),
            1,
        );
        (registry, id)
    }

    #[test]
    fn archetype_runs_sit_in_the_top_row() {
        let shape = archetype_shape(WallKind::Normal);
        assert_eq!(shape.width(), 3);
        assert_eq!(shape.height(), 3);
        assert_eq!(shape.at(0, 0), Some(WallKind::Normal));
        assert_eq!(shape.at(2, 0), Some(WallKind::Normal));
        assert_eq!(shape.at(0, 1), None, "sparse rows carry no material");

        let large = archetype_shape(WallKind::Large);
        assert_eq!(large.material().count(), 4);
    }

    #[test]
    fn only_the_ally_archetype_carries_the_ally_flag() {
        assert!(archetype_is_ally(WallKind::Ally));
        assert!(!archetype_is_ally(WallKind::Normal));
        assert!(!archetype_is_ally(WallKind::Temporal));
    }

    #[test]
    fn oriented_shape_matches_manual_rotation() {
        let east = oriented_shape(WallKind::Normal, Direction::East);
        assert_eq!(east, archetype_shape(WallKind::Normal).rotated());
        assert_eq!(east.at(2, 0), Some(WallKind::Normal));
        assert_eq!(east.at(2, 2), Some(WallKind::Normal));
    }

    #[test]
    fn covers_respects_anchor_offset_and_sparseness() {
        let (registry, id) = registry_with_normal_wall(CellCoord::new(2, 3));
        let wall = registry.get(id).expect("wall exists");

        assert!(wall.covers(CellCoord::new(2, 3)));
        assert!(wall.covers(CellCoord::new(4, 3)));
        assert!(!wall.covers(CellCoord::new(2, 4)), "sparse row is empty");
        assert!(!wall.covers(CellCoord::new(1, 3)), "left of the anchor");
    }

    #[test]
    fn identifiers_increase_in_placement_order() {
        let mut registry = WallRegistry::new();
        let first = registry.insert(
            WallKind::Normal,
            None,
            CellCoord::new(0, 0),
            Direction::North,
            archetype_shape(WallKind::Normal),
            0,
        );
        let second = registry.insert(
            WallKind::Ally,
            Some(PlayerId::new(1)),
            CellCoord::new(0, 2),
            Direction::North,
            archetype_shape(WallKind::Ally),
            2,
        );
        assert!(first < second);
        assert_eq!(registry.iter().count(), 2);
    }

    #[test]
    fn temporal_walls_expire_after_their_lifetime() {
        let mut registry = WallRegistry::new();
        let id = registry.insert(
            WallKind::Temporal,
            Some(PlayerId::new(0)),
            CellCoord::new(0, 0),
            Direction::North,
            archetype_shape(WallKind::Temporal),
            5,
        );
        let wall = registry.get(id).expect("wall exists");

        assert!(!wall.is_expired(6, 2), "still inside its lifetime");
        assert!(wall.is_expired(7, 2), "lifetime reached");
    }

    #[test]
    fn non_temporal_walls_never_expire() {
        let (registry, id) = registry_with_normal_wall(CellCoord::new(0, 0));
        let wall = registry.get(id).expect("wall exists");
        assert!(!wall.is_expired(u32::MAX, 0));
    }

    #[test]
    fn rotation_commit_preserves_identity_fields() {
        let (mut registry, id) = registry_with_normal_wall(CellCoord::new(1, 1));
        let rotated = registry.get(id).expect("wall exists").shape().rotated();
        registry.set_shape(id, rotated, Direction::East);

        let wall = registry.get(id).expect("wall exists");
        assert_eq!(wall.id(), id);
        assert_eq!(wall.owner(), Some(PlayerId::new(0)));
        assert_eq!(wall.creation_turn(), 1);
        assert_eq!(wall.facing(), Direction::East);
        assert!(wall.covers(CellCoord::new(3, 3)), "material stood upright");
        assert!(!wall.covers(CellCoord::new(2, 1)), "top row vacated");
    }
}
