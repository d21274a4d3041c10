#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative match state machine for Wallbound.
//!
//! The [`Match`] owns every entity of a running game: the cell grid, the
//! placed-wall set, and the player roster. All mutation funnels through the
//! [`apply`] entry point, which validates a [`Command`] completely before
//! committing anything; a rejected command returns a [`RuleError`] and
//! leaves the match bit-for-bit unchanged. Committed commands broadcast
//! [`Event`] values describing everything that happened, forming the
//! deterministic audit stream of the match.

mod board;
mod cells;
mod connectivity;
mod walls;

use wallbound_core::{
    CellCoord, Command, Direction, Event, MatchConfig, MatchPhase, PlacementError, PlayerId,
    RuleError, SetupError, TeamId, WallId, WallKind, WallShape,
};

use crate::{board::Board, cells::CellEffect, walls::WallRegistry};

#[derive(Clone, Debug, PartialEq, Eq)]
struct PlayerState {
    id: PlayerId,
    team: TeamId,
    cell: CellCoord,
    goal_row: u32,
    walls_remaining: u32,
}

/// Represents the authoritative state of one match.
#[derive(Clone, Debug)]
pub struct Match {
    board: Board,
    walls: WallRegistry,
    players: Vec<PlayerState>,
    turn: u32,
    in_turn: usize,
    extra_turn: bool,
    phase: MatchPhase,
    winner: Option<PlayerId>,
    temporal_lifetime: u32,
}

impl Match {
    /// Builds a match from the provided configuration.
    ///
    /// Setup validates the board layout, teleport links, seeded walls, and
    /// the player roster; any violation is fatal and aborts the match
    /// before the first turn.
    pub fn new(config: &MatchConfig) -> Result<Self, SetupError> {
        if config.players.is_empty() {
            return Err(SetupError::NoPlayers);
        }

        let board = Board::from_config(
            config.columns,
            config.rows,
            &config.layout,
            &config.teleport_links,
        )?;

        let mut registry = WallRegistry::new();
        for seed in &config.seed_walls {
            let shape = walls::oriented_shape(seed.kind, seed.facing);
            for (column, row, _) in shape.material() {
                let cell = CellCoord::new(
                    seed.anchor.column().saturating_add(column),
                    seed.anchor.row().saturating_add(row),
                );
                if !board.contains(cell) || registry.covering(cell).next().is_some() {
                    return Err(SetupError::SeedWallInvalid {
                        anchor: seed.anchor,
                    });
                }
            }
            let _ = registry.insert(seed.kind, None, seed.anchor, seed.facing, shape, 0);
        }

        let mut players = Vec::with_capacity(config.players.len());
        for (index, setup) in config.players.iter().enumerate() {
            let id = PlayerId::new(u32::try_from(index).unwrap_or(u32::MAX));
            if setup.goal_row >= config.rows {
                return Err(SetupError::GoalRowOutOfBounds {
                    player: id,
                    row: setup.goal_row,
                });
            }
            let taken = players
                .iter()
                .any(|other: &PlayerState| other.cell == setup.start);
            if !board.contains(setup.start)
                || taken
                || registry.covering(setup.start).next().is_some()
            {
                return Err(SetupError::StartCellInvalid {
                    player: id,
                    cell: setup.start,
                });
            }
            players.push(PlayerState {
                id,
                team: setup.team,
                cell: setup.start,
                goal_row: setup.goal_row,
                walls_remaining: setup.walls,
            });
        }

        let mut state = Self {
            board,
            walls: registry,
            players,
            turn: 1,
            in_turn: 0,
            extra_turn: false,
            phase: MatchPhase::AwaitingMove,
            winner: None,
            temporal_lifetime: config.temporal_lifetime,
        };

        // Opening start-turn hook for the roster head; shipped cell types
        // keep this hook inert, so no events can escape construction.
        let mut opening = Vec::new();
        state.fire_start_hook(&mut opening);

        Ok(state)
    }

    fn player_index(&self, player: PlayerId) -> Result<usize, RuleError> {
        self.players
            .iter()
            .position(|state| state.id == player)
            .ok_or(RuleError::UnknownPlayer { player })
    }

    fn ensure_in_turn(&self, index: usize, player: PlayerId) -> Result<(), RuleError> {
        if index == self.in_turn {
            Ok(())
        } else {
            Err(RuleError::NotYourTurn { player })
        }
    }

    fn token_at(&self, cell: CellCoord) -> Option<PlayerId> {
        self.players
            .iter()
            .find(|state| state.cell == cell)
            .map(|state| state.id)
    }

    fn owner_on_team(&self, owner: Option<PlayerId>, team: TeamId) -> bool {
        owner
            .and_then(|id| self.players.iter().find(|state| state.id == id))
            .is_some_and(|state| state.team == team)
    }

    fn wall_blocks_team(&self, ally: bool, owner: Option<PlayerId>, team: TeamId) -> bool {
        !(ally && self.owner_on_team(owner, team))
    }

    fn blocked_for(&self, team: TeamId, cell: CellCoord) -> bool {
        self.walls
            .covering(cell)
            .any(|wall| self.wall_blocks_team(wall.is_ally(), wall.owner(), team))
    }

    fn overlap_permitted(
        &self,
        candidate_ally: bool,
        candidate_owner: Option<PlayerId>,
        existing_ally: bool,
        existing_owner: Option<PlayerId>,
    ) -> bool {
        let Some(candidate_owner) = candidate_owner else {
            return false;
        };
        let candidate_team = self
            .players
            .iter()
            .find(|state| state.id == candidate_owner)
            .map(|state| state.team);
        match candidate_team {
            Some(team) => {
                candidate_ally && existing_ally && self.owner_on_team(existing_owner, team)
            }
            None => false,
        }
    }

    fn validate_footprint(
        &self,
        anchor: CellCoord,
        shape: &WallShape,
        ally: bool,
        owner: Option<PlayerId>,
        ignore: Option<WallId>,
    ) -> Result<(), RuleError> {
        for (column, row, _) in shape.material() {
            let cell = CellCoord::new(
                anchor.column().saturating_add(column),
                anchor.row().saturating_add(row),
            );
            if !self.board.contains(cell) {
                return Err(RuleError::OutOfBounds { cell });
            }

            let conflict = self
                .walls
                .covering(cell)
                .filter(|wall| Some(wall.id()) != ignore)
                .any(|wall| {
                    !self.overlap_permitted(ally, owner, wall.is_ally(), wall.owner())
                });
            if conflict {
                return Err(RuleError::IllegalPlacement {
                    reason: PlacementError::Overlap { cell },
                });
            }

            if self.token_at(cell).is_some() {
                return Err(RuleError::IllegalPlacement {
                    reason: PlacementError::TokenInTheWay { cell },
                });
            }
        }
        Ok(())
    }

    fn disconnected_player(
        &self,
        anchor: CellCoord,
        shape: &WallShape,
        ally: bool,
        owner: Option<PlayerId>,
        ignore: Option<WallId>,
    ) -> Option<PlayerId> {
        for player in &self.players {
            let team = player.team;
            let candidate_blocks = self.wall_blocks_team(ally, owner, team);
            let reachable = connectivity::reaches_row(
                self.board.columns(),
                self.board.rows(),
                player.cell,
                player.goal_row,
                |cell| {
                    if candidate_blocks && walls::footprint_covers(anchor, shape, cell) {
                        return true;
                    }
                    self.walls
                        .covering(cell)
                        .filter(|wall| Some(wall.id()) != ignore)
                        .any(|wall| self.wall_blocks_team(wall.is_ally(), wall.owner(), team))
                },
            );
            if !reachable {
                return Some(player.id);
            }
        }
        None
    }

    fn submit_move(
        &mut self,
        player: PlayerId,
        destination: CellCoord,
        out_events: &mut Vec<Event>,
    ) -> Result<(), RuleError> {
        let index = self.player_index(player)?;
        self.ensure_in_turn(index, player)?;
        let cell_type = self.board.cell_at(destination)?;

        let from = self.players[index].cell;
        let team = self.players[index].team;
        if from.manhattan_distance(destination) != 1
            || self.blocked_for(team, destination)
            || self.token_at(destination).is_some()
        {
            return Err(RuleError::IllegalMove {
                player,
                from,
                to: destination,
            });
        }

        self.players[index].cell = destination;
        out_events.push(Event::TokenMoved {
            player,
            from,
            to: destination,
        });

        let effect = cells::on_land(cell_type);
        self.resolve_effect(index, effect, out_events);
        self.fire_finish_hook(out_events);

        if self.check_win(index, out_events) {
            return Ok(());
        }
        self.advance_turn(out_events);
        Ok(())
    }

    fn place_wall(
        &mut self,
        player: PlayerId,
        kind: WallKind,
        anchor: CellCoord,
        facing: Direction,
        out_events: &mut Vec<Event>,
    ) -> Result<(), RuleError> {
        let index = self.player_index(player)?;
        self.ensure_in_turn(index, player)?;
        if self.players[index].walls_remaining == 0 {
            return Err(RuleError::InsufficientWalls { player });
        }

        let shape = walls::oriented_shape(kind, facing);
        let ally = walls::archetype_is_ally(kind);
        self.validate_footprint(anchor, &shape, ally, Some(player), None)?;
        if let Some(victim) = self.disconnected_player(anchor, &shape, ally, Some(player), None) {
            return Err(RuleError::IllegalPlacement {
                reason: PlacementError::DisconnectsPlayer { player: victim },
            });
        }

        let wall = self
            .walls
            .insert(kind, Some(player), anchor, facing, shape, self.turn);
        self.players[index].walls_remaining -= 1;
        out_events.push(Event::WallPlaced {
            wall,
            kind,
            owner: Some(player),
            anchor,
        });

        self.fire_finish_hook(out_events);
        self.advance_turn(out_events);
        Ok(())
    }

    fn rotate_wall(
        &mut self,
        player: PlayerId,
        wall: WallId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), RuleError> {
        let index = self.player_index(player)?;
        self.ensure_in_turn(index, player)?;

        let state = self
            .walls
            .get(wall)
            .ok_or(RuleError::UnknownWall { wall })?;
        if state.owner() != Some(player) {
            return Err(RuleError::NotWallOwner { player, wall });
        }

        let anchor = state.anchor();
        let ally = state.is_ally();
        let facing = state.facing();
        let rotated = state.shape().rotated();

        self.validate_footprint(anchor, &rotated, ally, Some(player), Some(wall))?;
        if let Some(victim) =
            self.disconnected_player(anchor, &rotated, ally, Some(player), Some(wall))
        {
            return Err(RuleError::IllegalPlacement {
                reason: PlacementError::DisconnectsPlayer { player: victim },
            });
        }

        let facing = facing.rotated_clockwise();
        self.walls.set_shape(wall, rotated, facing);
        out_events.push(Event::WallRotated { wall, facing });

        self.fire_finish_hook(out_events);
        self.advance_turn(out_events);
        Ok(())
    }

    fn end_turn(&mut self, player: PlayerId, out_events: &mut Vec<Event>) -> Result<(), RuleError> {
        let index = self.player_index(player)?;
        self.ensure_in_turn(index, player)?;

        self.fire_finish_hook(out_events);
        self.advance_turn(out_events);
        Ok(())
    }

    fn resolve_effect(&mut self, index: usize, effect: CellEffect, out_events: &mut Vec<Event>) {
        let player = self.players[index].id;
        match effect {
            CellEffect::None => {}
            CellEffect::ExtraTurn => {
                self.extra_turn = true;
                out_events.push(Event::ExtraTurnGranted { player });
            }
            CellEffect::Teleport { destination } => {
                // The destination's own landing effect must not fire again,
                // so the relocation bypasses the behavior table entirely.
                if self.token_at(destination).is_none() {
                    let from = self.players[index].cell;
                    self.players[index].cell = destination;
                    out_events.push(Event::Teleported {
                        player,
                        from,
                        to: destination,
                    });
                }
            }
            CellEffect::ReturnWalls { count } => {
                let returned = self.return_walls(index, count);
                if !returned.is_empty() {
                    out_events.push(Event::WallsReturned {
                        player,
                        walls: returned,
                    });
                }
            }
        }
    }

    /// Removes up to `count` of the player's own walls, most recently
    /// placed first, crediting them back to the player's budget.
    fn return_walls(&mut self, index: usize, count: u8) -> Vec<WallId> {
        let player = self.players[index].id;
        let owned: Vec<WallId> = self
            .walls
            .iter()
            .filter(|wall| wall.owner() == Some(player))
            .map(|wall| wall.id())
            .collect();

        let take = usize::from(count).min(owned.len());
        let selected: Vec<WallId> = owned.into_iter().rev().take(take).collect();
        for id in &selected {
            let _ = self.walls.remove(*id);
        }
        let credited = u32::try_from(selected.len()).unwrap_or(0);
        self.players[index].walls_remaining =
            self.players[index].walls_remaining.saturating_add(credited);
        selected
    }

    fn check_win(&mut self, index: usize, out_events: &mut Vec<Event>) -> bool {
        let player = self.players[index].id;
        if self.players[index].cell.row() != self.players[index].goal_row {
            return false;
        }
        self.phase = MatchPhase::MatchOver;
        self.winner = Some(player);
        out_events.push(Event::MatchWon { player });
        true
    }

    fn advance_turn(&mut self, out_events: &mut Vec<Event>) {
        self.turn = self.turn.saturating_add(1);
        if self.extra_turn {
            self.extra_turn = false;
        } else {
            self.in_turn = (self.in_turn + 1) % self.players.len();
            if self.in_turn == 0 {
                self.purge_expired(out_events);
            }
        }
        out_events.push(Event::TurnStarted {
            player: self.players[self.in_turn].id,
            turn: self.turn,
        });
        self.fire_start_hook(out_events);
    }

    fn purge_expired(&mut self, out_events: &mut Vec<Event>) {
        let expired: Vec<WallId> = self
            .walls
            .iter()
            .filter(|wall| wall.is_expired(self.turn, self.temporal_lifetime))
            .map(|wall| wall.id())
            .collect();
        for wall in expired {
            let _ = self.walls.remove(wall);
            out_events.push(Event::TemporalWallExpired { wall });
        }
    }

    fn fire_start_hook(&mut self, out_events: &mut Vec<Event>) {
        let index = self.in_turn;
        if let Some(cell_type) = self.board.cell_type(self.players[index].cell) {
            let effect = cells::at_start_turn(cell_type);
            self.resolve_effect(index, effect, out_events);
        }
    }

    fn fire_finish_hook(&mut self, out_events: &mut Vec<Event>) {
        let index = self.in_turn;
        if let Some(cell_type) = self.board.cell_type(self.players[index].cell) {
            let effect = cells::at_finish_turn(cell_type);
            self.resolve_effect(index, effect, out_events);
        }
    }
}

/// Applies the provided command to the match, mutating state deterministically.
///
/// Validation completes before any mutation: on `Err` the match is exactly
/// as it was, and `out_events` receives nothing.
pub fn apply(
    state: &mut Match,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), RuleError> {
    if state.phase == MatchPhase::MatchOver {
        return Err(RuleError::MatchOver);
    }

    match command {
        Command::Move {
            player,
            destination,
        } => state.submit_move(player, destination, out_events),
        Command::PlaceWall {
            player,
            kind,
            anchor,
            facing,
        } => state.place_wall(player, kind, anchor, facing, out_events),
        Command::RotateWall { player, wall } => state.rotate_wall(player, wall, out_events),
        Command::EndTurn { player } => state.end_turn(player, out_events),
    }
}

/// Query functions that provide read-only access to the match state.
pub mod query {
    use wallbound_core::{
        CellCoord, CellType, Direction, MatchPhase, PlayerId, RuleError, TeamId, WallId, WallKind,
        WallShape,
    };

    use super::Match;

    /// Current persisted phase of the state machine.
    #[must_use]
    pub fn phase(state: &Match) -> MatchPhase {
        state.phase
    }

    /// Monotonic turn number, starting at 1 for the first turn.
    #[must_use]
    pub fn turn(state: &Match) -> u32 {
        state.turn
    }

    /// Player whose turn it currently is.
    #[must_use]
    pub fn player_in_turn(state: &Match) -> PlayerId {
        state.players[state.in_turn].id
    }

    /// Winner of the match once it is over.
    #[must_use]
    pub fn winner(state: &Match) -> Option<PlayerId> {
        state.winner
    }

    /// Cell behavior at the coordinate; fails with `OutOfBounds` beyond
    /// the grid.
    pub fn cell_at(state: &Match, cell: CellCoord) -> Result<CellType, RuleError> {
        state.board.cell_at(cell)
    }

    /// Walls whose footprint intersects the coordinate, in id order.
    #[must_use]
    pub fn walls_at(state: &Match, cell: CellCoord) -> Vec<WallId> {
        state.walls.covering(cell).map(|wall| wall.id()).collect()
    }

    /// Captures a complete read-only snapshot of the match.
    #[must_use]
    pub fn view(state: &Match) -> MatchView {
        MatchView {
            turn: state.turn,
            phase: state.phase,
            in_turn: player_in_turn(state),
            winner: state.winner,
            players: state
                .players
                .iter()
                .map(|player| PlayerSnapshot {
                    id: player.id,
                    team: player.team,
                    cell: player.cell,
                    goal_row: player.goal_row,
                    walls_remaining: player.walls_remaining,
                })
                .collect(),
            walls: state
                .walls
                .iter()
                .map(|wall| WallSnapshot {
                    id: wall.id(),
                    kind: wall.kind(),
                    owner: wall.owner(),
                    anchor: wall.anchor(),
                    facing: wall.facing(),
                    shape: wall.shape().clone(),
                    ally: wall.is_ally(),
                    creation_turn: wall.creation_turn(),
                })
                .collect(),
        }
    }

    /// Immutable snapshot of the whole match used by view layers.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct MatchView {
        /// Monotonic turn number.
        pub turn: u32,
        /// Persisted phase of the state machine.
        pub phase: MatchPhase,
        /// Player currently in turn.
        pub in_turn: PlayerId,
        /// Winner, once the match is over.
        pub winner: Option<PlayerId>,
        /// Player snapshots in roster order.
        pub players: Vec<PlayerSnapshot>,
        /// Wall snapshots in ascending id (placement) order.
        pub walls: Vec<WallSnapshot>,
    }

    /// Immutable representation of a single player's state.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct PlayerSnapshot {
        /// Identifier assigned from roster position.
        pub id: PlayerId,
        /// Team the player belongs to.
        pub team: TeamId,
        /// Cell the player's token occupies.
        pub cell: CellCoord,
        /// Row the player must reach to win.
        pub goal_row: u32,
        /// Walls left in the player's budget.
        pub walls_remaining: u32,
    }

    /// Immutable representation of a single placed wall.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct WallSnapshot {
        /// Identifier allocated at placement.
        pub id: WallId,
        /// Archetype the wall was built from.
        pub kind: WallKind,
        /// Owning player; `None` for pre-placed neutral walls.
        pub owner: Option<PlayerId>,
        /// Top-left cell anchoring the footprint.
        pub anchor: CellCoord,
        /// Facing the wall currently presents.
        pub facing: Direction,
        /// Sparse footprint matrix.
        pub shape: WallShape,
        /// Whether the wall counts toward the ally mechanic.
        pub ally: bool,
        /// Turn stamped when the wall entered the board.
        pub creation_turn: u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallbound_core::{Direction, PlayerSetup, TeamId};

    fn two_player_config() -> MatchConfig {
        MatchConfig {
            columns: 5,
            rows: 5,
            players: vec![
                PlayerSetup {
                    team: TeamId::new(0),
                    start: CellCoord::new(2, 4),
                    goal_row: 0,
                    walls: 3,
                },
                PlayerSetup {
                    team: TeamId::new(1),
                    start: CellCoord::new(2, 0),
                    goal_row: 4,
                    walls: 3,
                },
            ],
            ..MatchConfig::default()
        }
    }

    #[test]
    fn setup_rejects_empty_rosters() {
        let config = MatchConfig {
            players: Vec::new(),
            ..MatchConfig::default()
        };
        assert_eq!(Match::new(&config).err(), Some(SetupError::NoPlayers));
    }

    #[test]
    fn setup_rejects_goal_rows_beyond_the_grid() {
        let mut config = two_player_config();
        config.players[1].goal_row = 9;
        assert_eq!(
            Match::new(&config).err(),
            Some(SetupError::GoalRowOutOfBounds {
                player: PlayerId::new(1),
                row: 9,
            })
        );
    }

    #[test]
    fn setup_rejects_duplicate_start_cells() {
        let mut config = two_player_config();
        config.players[1].start = config.players[0].start;
        assert_eq!(
            Match::new(&config).err(),
            Some(SetupError::StartCellInvalid {
                player: PlayerId::new(1),
                cell: config.players[0].start,
            })
        );
    }

    #[test]
    fn first_turn_belongs_to_the_roster_head() {
        let state = Match::new(&two_player_config()).expect("setup succeeds");
        assert_eq!(query::turn(&state), 1);
        assert_eq!(query::player_in_turn(&state), PlayerId::new(0));
        assert_eq!(query::phase(&state), MatchPhase::AwaitingMove);
        assert_eq!(query::winner(&state), None);
    }

    #[test]
    fn acting_out_of_turn_is_rejected() {
        let mut state = Match::new(&two_player_config()).expect("setup succeeds");
        let mut events = Vec::new();
        let result = apply(
            &mut state,
            Command::Move {
                player: PlayerId::new(1),
                destination: CellCoord::new(2, 1),
            },
            &mut events,
        );
        assert_eq!(
            result,
            Err(RuleError::NotYourTurn {
                player: PlayerId::new(1)
            })
        );
        assert!(events.is_empty(), "rejected commands emit nothing");
    }

    #[test]
    fn unknown_players_are_rejected() {
        let mut state = Match::new(&two_player_config()).expect("setup succeeds");
        let mut events = Vec::new();
        let result = apply(
            &mut state,
            Command::EndTurn {
                player: PlayerId::new(9),
            },
            &mut events,
        );
        assert_eq!(
            result,
            Err(RuleError::UnknownPlayer {
                player: PlayerId::new(9)
            })
        );
    }

    #[test]
    fn moves_must_step_to_an_adjacent_free_cell() {
        let mut state = Match::new(&two_player_config()).expect("setup succeeds");
        let mut events = Vec::new();
        let result = apply(
            &mut state,
            Command::Move {
                player: PlayerId::new(0),
                destination: CellCoord::new(2, 2),
            },
            &mut events,
        );
        assert_eq!(
            result,
            Err(RuleError::IllegalMove {
                player: PlayerId::new(0),
                from: CellCoord::new(2, 4),
                to: CellCoord::new(2, 2),
            })
        );
    }

    #[test]
    fn moving_beyond_the_grid_is_out_of_bounds() {
        let mut state = Match::new(&two_player_config()).expect("setup succeeds");
        let mut events = Vec::new();
        let result = apply(
            &mut state,
            Command::Move {
                player: PlayerId::new(0),
                destination: CellCoord::new(2, 5),
            },
            &mut events,
        );
        assert_eq!(
            result,
            Err(RuleError::OutOfBounds {
                cell: CellCoord::new(2, 5)
            })
        );
    }

    #[test]
    fn end_turn_advances_the_roster_and_the_counter() {
        let mut state = Match::new(&two_player_config()).expect("setup succeeds");
        let mut events = Vec::new();
        apply(
            &mut state,
            Command::EndTurn {
                player: PlayerId::new(0),
            },
            &mut events,
        )
        .expect("end turn is always legal for the in-turn player");

        assert_eq!(query::turn(&state), 2);
        assert_eq!(query::player_in_turn(&state), PlayerId::new(1));
        assert_eq!(
            events,
            vec![Event::TurnStarted {
                player: PlayerId::new(1),
                turn: 2,
            }]
        );
    }

    #[test]
    fn reaching_the_goal_row_ends_the_match() {
        let mut config = two_player_config();
        config.players[0].start = CellCoord::new(1, 1);
        let mut state = Match::new(&config).expect("setup succeeds");
        let mut events = Vec::new();

        apply(
            &mut state,
            Command::Move {
                player: PlayerId::new(0),
                destination: CellCoord::new(1, 0),
            },
            &mut events,
        )
        .expect("winning move is legal");

        assert_eq!(query::phase(&state), MatchPhase::MatchOver);
        assert_eq!(query::winner(&state), Some(PlayerId::new(0)));
        assert!(events.contains(&Event::MatchWon {
            player: PlayerId::new(0)
        }));

        let mut more = Vec::new();
        let result = apply(
            &mut state,
            Command::EndTurn {
                player: PlayerId::new(1),
            },
            &mut more,
        );
        assert_eq!(result, Err(RuleError::MatchOver));
    }

    #[test]
    fn wall_placement_consumes_budget_and_registers_material() {
        let mut state = Match::new(&two_player_config()).expect("setup succeeds");
        let mut events = Vec::new();

        apply(
            &mut state,
            Command::PlaceWall {
                player: PlayerId::new(0),
                kind: WallKind::Normal,
                anchor: CellCoord::new(0, 2),
                facing: Direction::North,
            },
            &mut events,
        )
        .expect("placement is legal");

        let snapshot = query::view(&state);
        assert_eq!(snapshot.players[0].walls_remaining, 2);
        assert_eq!(snapshot.walls.len(), 1);
        assert_eq!(snapshot.walls[0].creation_turn, 1);
        assert_eq!(
            query::walls_at(&state, CellCoord::new(1, 2)),
            vec![snapshot.walls[0].id]
        );
        assert_eq!(query::player_in_turn(&state), PlayerId::new(1));
    }

    #[test]
    fn blocking_every_path_to_a_goal_row_is_rejected() {
        let config = MatchConfig {
            columns: 7,
            rows: 5,
            players: vec![
                PlayerSetup {
                    team: TeamId::new(0),
                    start: CellCoord::new(3, 4),
                    goal_row: 0,
                    walls: 3,
                },
                PlayerSetup {
                    team: TeamId::new(1),
                    start: CellCoord::new(3, 0),
                    goal_row: 4,
                    walls: 3,
                },
            ],
            ..MatchConfig::default()
        };
        let mut state = Match::new(&config).expect("setup succeeds");
        let mut events = Vec::new();

        apply(
            &mut state,
            Command::PlaceWall {
                player: PlayerId::new(0),
                kind: WallKind::Normal,
                anchor: CellCoord::new(0, 2),
                facing: Direction::North,
            },
            &mut events,
        )
        .expect("first placement leaves a path");

        apply(
            &mut state,
            Command::EndTurn {
                player: PlayerId::new(1),
            },
            &mut events,
        )
        .expect("second player passes");

        let before = query::view(&state);
        let result = apply(
            &mut state,
            Command::PlaceWall {
                player: PlayerId::new(0),
                kind: WallKind::Normal,
                anchor: CellCoord::new(2, 2),
                facing: Direction::North,
            },
            &mut events,
        );
        assert!(matches!(
            result,
            Err(RuleError::IllegalPlacement {
                reason: PlacementError::Overlap { .. }
            })
        ));

        // Columns 0..=2 are already walled; a four-cell run over 3..=6
        // would seal row 2 entirely, which the path check must catch.
        let result = apply(
            &mut state,
            Command::PlaceWall {
                player: PlayerId::new(0),
                kind: WallKind::Large,
                anchor: CellCoord::new(3, 2),
                facing: Direction::North,
            },
            &mut events,
        );
        assert_eq!(
            result,
            Err(RuleError::IllegalPlacement {
                reason: PlacementError::DisconnectsPlayer {
                    player: PlayerId::new(0)
                }
            })
        );
        assert_eq!(query::view(&state), before, "rejection mutates nothing");
    }
}
