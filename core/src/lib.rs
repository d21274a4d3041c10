#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Wallbound match engine.
//!
//! This crate defines the message surface that connects the view-layer
//! facade and the authoritative match state. Callers submit [`Command`]
//! values describing desired mutations, the engine executes those commands
//! via its `apply` entry point, and then broadcasts [`Event`] values that
//! form the deterministic audit stream of a match. All rule violations are
//! reported through [`RuleError`]; malformed board definitions abort match
//! setup through [`SetupError`].

use std::fmt;

use serde::{Deserialize, Serialize};

const DEFAULT_COLUMNS: u32 = 9;
const DEFAULT_ROWS: u32 = 9;
const DEFAULT_WALLS_PER_PLAYER: u32 = 10;
const DEFAULT_TEMPORAL_LIFETIME: u32 = 4;

/// Unique identifier assigned to a player for the duration of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(u32);

impl PlayerId {
    /// Creates a new player identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier allocated to a wall when it enters the board.
///
/// Identifiers are handed out in placement order, so ordering two wall ids
/// also orders their placements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WallId(u32);

impl WallId {
    /// Creates a new wall identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for WallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the team a player belongs to.
///
/// Players sharing a team are allies for the purposes of ally walls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(u32);

impl TeamId {
    /// Creates a new team identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single board cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new board cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Facing assigned to a wall, advanced clockwise one step per rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// The archetype's unrotated facing.
    North,
    /// One clockwise quarter turn from north.
    East,
    /// Two clockwise quarter turns from north.
    South,
    /// Three clockwise quarter turns from north.
    West,
}

impl Direction {
    /// Number of clockwise quarter turns separating this facing from north.
    #[must_use]
    pub const fn quarter_turns(self) -> u32 {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }

    /// Facing reached after one additional clockwise quarter turn.
    #[must_use]
    pub const fn rotated_clockwise(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }
}

/// Material variants a wall footprint may be built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallKind {
    /// Standard blocking wall that persists for the rest of the match.
    Normal,
    /// Longer blocking wall occupying a wider footprint.
    Large,
    /// Blocking wall that expires after a configured number of turns.
    Temporal,
    /// Wall that allied players may traverse and overlap.
    Ally,
}

impl WallKind {
    /// Reports whether walls of this kind carry the ally flag by default.
    #[must_use]
    pub const fn is_ally(self) -> bool {
        matches!(self, Self::Ally)
    }

    /// Reports whether walls of this kind have a limited lifetime.
    #[must_use]
    pub const fn expires(self) -> bool {
        matches!(self, Self::Temporal)
    }
}

/// Behavior assigned to a board cell, fixed per coordinate at setup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellType {
    /// Cell with no landing, start-turn, or finish-turn effect.
    Normal,
    /// Landing grants the player one extra turn before order advances.
    DoubleTurn,
    /// Landing relocates the player to the linked destination cell.
    Teleport {
        /// Cell the player is relocated to on landing.
        destination: CellCoord,
    },
    /// Landing returns the player's most recently placed walls.
    Return {
        /// Maximum number of walls returned to the player's budget.
        count: u8,
    },
}

/// Sparse `width x height` matrix of wall material.
///
/// Entries holding `None` carry no wall material: renderers and collision
/// checks treat them as non-occupying, never as an error. The matrix is
/// addressed as `(column, row)` relative to the wall's anchor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallShape {
    width: u32,
    height: u32,
    cells: Vec<Option<WallKind>>,
}

impl WallShape {
    /// Builds a shape from row-major cells; `None` if the dimensions do not
    /// match the cell count or either dimension is zero.
    #[must_use]
    pub fn from_cells(width: u32, height: u32, cells: Vec<Option<WallKind>>) -> Option<Self> {
        let expected = usize::try_from(u64::from(width) * u64::from(height)).ok()?;
        if width == 0 || height == 0 || cells.len() != expected {
            return None;
        }
        Some(Self {
            width,
            height,
            cells,
        })
    }

    /// Width of the footprint matrix in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the footprint matrix in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Material stored at the provided matrix position, if any.
    ///
    /// Positions beyond the matrix bounds report no material.
    #[must_use]
    pub fn at(&self, column: u32, row: u32) -> Option<WallKind> {
        if column >= self.width || row >= self.height {
            return None;
        }
        let index =
            usize::try_from(u64::from(row) * u64::from(self.width) + u64::from(column)).ok()?;
        self.cells.get(index).copied().flatten()
    }

    /// Iterator over the occupied matrix positions and their material.
    pub fn material(&self) -> impl Iterator<Item = (u32, u32, WallKind)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(index, slot)| {
                let index = u32::try_from(index).ok()?;
                let kind = (*slot)?;
                Some((index % width, index / width, kind))
            })
    }

    /// Returns the shape rotated 90 degrees clockwise.
    ///
    /// The rotated matrix measures `height x width`; four successive
    /// rotations restore the original shape exactly. Rotation is a pure
    /// transform of the footprint and carries no other wall state.
    #[must_use]
    pub fn rotated(&self) -> WallShape {
        let width = self.height;
        let height = self.width;
        let capacity = usize::try_from(u64::from(width) * u64::from(height))
            .expect("validated shape dimensions fit in usize");
        let mut cells = vec![None; capacity];

        for (column, row, kind) in self.material() {
            let rotated_column = self.height - 1 - row;
            let rotated_row = column;
            let index = usize::try_from(
                u64::from(rotated_row) * u64::from(width) + u64::from(rotated_column),
            )
            .expect("rotated position lies within the validated matrix");
            cells[index] = Some(kind);
        }

        Self {
            width,
            height,
            cells,
        }
    }
}

/// Commands that express all permissible match mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Moves the player's token one cardinal step to the destination cell.
    Move {
        /// Player submitting the move.
        player: PlayerId,
        /// Cell the token should advance to.
        destination: CellCoord,
    },
    /// Places a new wall anchored at the provided cell.
    PlaceWall {
        /// Player placing the wall; one unit of their budget is consumed.
        player: PlayerId,
        /// Archetype the wall is built from.
        kind: WallKind,
        /// Top-left cell anchoring the wall footprint.
        anchor: CellCoord,
        /// Facing applied to the archetype shape before placement.
        facing: Direction,
    },
    /// Rotates a placed wall 90 degrees clockwise as the turn's action.
    RotateWall {
        /// Player requesting the rotation; must own the wall.
        player: PlayerId,
        /// Identifier of the wall to rotate.
        wall: WallId,
    },
    /// Ends the turn without a primary action.
    EndTurn {
        /// Player yielding their turn.
        player: PlayerId,
    },
}

/// Events broadcast by the engine after committing a command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that a new turn began for the provided player.
    TurnStarted {
        /// Player now in turn.
        player: PlayerId,
        /// Monotonic turn number across the match.
        turn: u32,
    },
    /// Confirms that a token moved between two cells.
    TokenMoved {
        /// Player whose token advanced.
        player: PlayerId,
        /// Cell occupied before the move.
        from: CellCoord,
        /// Cell occupied after the move.
        to: CellCoord,
    },
    /// Reports that a teleport cell relocated a token.
    Teleported {
        /// Player whose token was relocated.
        player: PlayerId,
        /// Teleport cell the token landed on.
        from: CellCoord,
        /// Linked destination the token was moved to.
        to: CellCoord,
    },
    /// Reports that a double-turn cell granted an extra turn.
    ExtraTurnGranted {
        /// Player who keeps the turn after the current one resolves.
        player: PlayerId,
    },
    /// Confirms that a wall entered the board.
    WallPlaced {
        /// Identifier allocated to the wall.
        wall: WallId,
        /// Archetype the wall was built from.
        kind: WallKind,
        /// Owner the wall was stamped with; `None` for neutral walls.
        owner: Option<PlayerId>,
        /// Top-left cell anchoring the wall footprint.
        anchor: CellCoord,
    },
    /// Confirms that a placed wall rotated clockwise.
    WallRotated {
        /// Identifier of the rotated wall.
        wall: WallId,
        /// Facing the wall presents after the rotation.
        facing: Direction,
    },
    /// Reports that a return cell handed walls back to their owner.
    WallsReturned {
        /// Player whose budget the walls returned to.
        player: PlayerId,
        /// Returned walls, most recently placed first.
        walls: Vec<WallId>,
    },
    /// Reports that a temporal wall reached its lifetime and was purged.
    TemporalWallExpired {
        /// Identifier of the expired wall.
        wall: WallId,
    },
    /// Announces that a player reached their goal row and won the match.
    MatchWon {
        /// Winning player.
        player: PlayerId,
    },
}

/// Persisted phases of the turn/match state machine.
///
/// Intent resolution is synchronous, so the intermediate phases of a turn
/// never persist between commands; a match always rests awaiting a move
/// until it is over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchPhase {
    /// The in-turn player owes exactly one primary intent.
    AwaitingMove,
    /// A player satisfied the win condition; no further intents accepted.
    MatchOver,
}

/// Reasons a wall placement or rotation is geometrically illegal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum PlacementError {
    /// The footprint overlaps another wall's occupied sub-cells.
    #[error("footprint overlaps existing wall material at {cell}")]
    Overlap {
        /// First conflicting cell encountered.
        cell: CellCoord,
    },
    /// The footprint covers a cell occupied by a player token.
    #[error("footprint covers a player token at {cell}")]
    TokenInTheWay {
        /// Cell occupied by the blocking token.
        cell: CellCoord,
    },
    /// The footprint would leave a player with no path to their goal row.
    #[error("placement would cut player {player} off from their goal row")]
    DisconnectsPlayer {
        /// First player found without a remaining path.
        player: PlayerId,
    },
}

/// Rule violations surfaced to the caller; a rejected command leaves the
/// match unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum RuleError {
    /// A coordinate lies outside the board grid.
    #[error("cell {cell} lies outside the board")]
    OutOfBounds {
        /// Offending coordinate.
        cell: CellCoord,
    },
    /// A wall placement or rotation failed geometric validation.
    #[error("illegal wall placement: {reason}")]
    IllegalPlacement {
        /// Specific geometric reason the action failed.
        reason: PlacementError,
    },
    /// The player has no walls left in their budget.
    #[error("player {player} has no walls left to place")]
    InsufficientWalls {
        /// Player whose budget is exhausted.
        player: PlayerId,
    },
    /// The requested token move is not a legal step.
    #[error("player {player} cannot move from {from} to {to}")]
    IllegalMove {
        /// Player attempting the move.
        player: PlayerId,
        /// Cell the token currently occupies.
        from: CellCoord,
        /// Rejected destination.
        to: CellCoord,
    },
    /// A player acted outside their turn.
    #[error("it is not player {player}'s turn")]
    NotYourTurn {
        /// Player who submitted the command.
        player: PlayerId,
    },
    /// A player tried to rotate a wall they do not own.
    #[error("player {player} does not own wall {wall}")]
    NotWallOwner {
        /// Player who submitted the command.
        player: PlayerId,
        /// Wall the command referenced.
        wall: WallId,
    },
    /// No player with the provided identifier exists in the match.
    #[error("no player with id {player}")]
    UnknownPlayer {
        /// Unrecognized player identifier.
        player: PlayerId,
    },
    /// No wall with the provided identifier exists on the board.
    #[error("no wall with id {wall}")]
    UnknownWall {
        /// Unrecognized wall identifier.
        wall: WallId,
    },
    /// The match already ended; no further intents are accepted.
    #[error("the match is over")]
    MatchOver,
}

/// Fatal board-definition errors that abort match setup.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum SetupError {
    /// A layout code does not name a cell type in the catalog.
    #[error("unknown cell code '{code}' at {cell}")]
    UnknownCellType {
        /// Unrecognized layout character.
        code: char,
        /// Coordinate the character was read for.
        cell: CellCoord,
    },
    /// The layout does not measure the configured grid dimensions.
    #[error("board layout must measure {expected_columns} x {expected_rows} cells")]
    LayoutDimensionMismatch {
        /// Configured column count.
        expected_columns: u32,
        /// Configured row count.
        expected_rows: u32,
    },
    /// A teleport cell has no destination link configured.
    #[error("teleport cell {cell} has no destination link")]
    TeleportLinkMissing {
        /// Teleport cell without a link.
        cell: CellCoord,
    },
    /// A teleport link targets a cell outside the board.
    #[error("teleport link from {from} targets {to}, which is outside the board")]
    TeleportLinkOutOfBounds {
        /// Linked teleport cell.
        from: CellCoord,
        /// Out-of-bounds destination.
        to: CellCoord,
    },
    /// A player's start cell is out of bounds, occupied, or duplicated.
    #[error("player {player} start cell {cell} is invalid")]
    StartCellInvalid {
        /// Player whose start cell failed validation.
        player: PlayerId,
        /// Rejected start cell.
        cell: CellCoord,
    },
    /// A player's goal row lies outside the board.
    #[error("player {player} goal row {row} lies outside the board")]
    GoalRowOutOfBounds {
        /// Player whose goal row failed validation.
        player: PlayerId,
        /// Rejected goal row.
        row: u32,
    },
    /// A pre-placed wall is out of bounds or overlaps another seed wall.
    #[error("pre-placed wall at {anchor} is invalid")]
    SeedWallInvalid {
        /// Anchor of the rejected seed wall.
        anchor: CellCoord,
    },
    /// The roster is empty.
    #[error("a match requires at least one player")]
    NoPlayers,
    /// The grid has zero cells.
    #[error("the board must contain at least one cell")]
    EmptyBoard,
}

/// Pairing of a teleport cell with its landing destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeleportLink {
    /// Teleport cell the link belongs to.
    pub from: CellCoord,
    /// Cell a landing token is relocated to.
    pub to: CellCoord,
}

/// Roster entry describing one player at match setup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSetup {
    /// Team the player belongs to.
    pub team: TeamId,
    /// Cell the player's token starts on.
    pub start: CellCoord,
    /// Row the player must reach to win.
    pub goal_row: u32,
    /// Number of walls the player may place during the match.
    pub walls: u32,
}

/// Neutral wall seeded onto the board before the first turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedWall {
    /// Archetype the wall is built from.
    pub kind: WallKind,
    /// Top-left cell anchoring the wall footprint.
    pub anchor: CellCoord,
    /// Facing applied to the archetype shape.
    pub facing: Direction,
}

/// Complete description of a match, validated by the engine at setup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Number of board columns.
    pub columns: u32,
    /// Number of board rows.
    pub rows: u32,
    /// Board layout codes, one string per row (`.` normal, `d` double
    /// turn, `t` teleport, `r` return). An empty layout yields an
    /// all-normal board.
    pub layout: Vec<String>,
    /// Destination links for every teleport cell in the layout.
    pub teleport_links: Vec<TeleportLink>,
    /// Player roster in turn order; ids are assigned by position.
    pub players: Vec<PlayerSetup>,
    /// Neutral walls present on the board before the first turn.
    pub seed_walls: Vec<SeedWall>,
    /// Number of turns a temporal wall persists before it is purged.
    pub temporal_lifetime: u32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            layout: Vec::new(),
            teleport_links: Vec::new(),
            players: vec![
                PlayerSetup {
                    team: TeamId::new(0),
                    start: CellCoord::new(DEFAULT_COLUMNS / 2, DEFAULT_ROWS - 1),
                    goal_row: 0,
                    walls: DEFAULT_WALLS_PER_PLAYER,
                },
                PlayerSetup {
                    team: TeamId::new(1),
                    start: CellCoord::new(DEFAULT_COLUMNS / 2, 0),
                    goal_row: DEFAULT_ROWS - 1,
                    walls: DEFAULT_WALLS_PER_PLAYER,
                },
            ],
            seed_walls: Vec::new(),
            temporal_lifetime: DEFAULT_TEMPORAL_LIFETIME,
        }
    }
}
