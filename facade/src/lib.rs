#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session-level entry point for driving a Wallbound match.
//!
//! [`MatchSession`] wraps the engine behind four intent methods, fills in
//! the player in turn automatically, and reports every call through the
//! [`Outcome`] envelope instead of a bare `Result`. Callers embedding the
//! engine in a shell or service loop read `Outcome::is_success`, show the
//! human-readable message, and render the snapshot payload.

use std::fmt::Write as _;

use wallbound_core::{
    CellCoord, Command, Direction, Event, MatchConfig, PlayerId, SetupError, WallId, WallKind,
};
use wallbound_engine::{apply, query, query::MatchView, Match};

/// Uniform response envelope wrapping every session call.
///
/// A failed call carries the rule violation as its message and no payload;
/// a successful call carries a narration of what happened plus the match
/// snapshot taken after the command committed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome<T> {
    success: bool,
    message: String,
    payload: Option<T>,
}

impl<T> Outcome<T> {
    /// Wraps a committed result together with its narration.
    #[must_use]
    pub fn success(message: impl Into<String>, payload: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            payload: Some(payload),
        }
    }

    /// Wraps a rejection; the payload stays empty.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            payload: None,
        }
    }

    /// Reports whether the call committed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.success
    }

    /// Human-readable narration or rejection reason.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Borrowed payload of a successful call.
    #[must_use]
    pub fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    /// Consumes the envelope, yielding the payload of a successful call.
    #[must_use]
    pub fn into_payload(self) -> Option<T> {
        self.payload
    }
}

/// Stateful handle to one running match.
///
/// Callers name the acting player on every intent; turn order is enforced
/// by the engine, so an out-of-turn intent comes back as a failed
/// [`Outcome`] rather than corrupting state. Rotation is the exception:
/// the wall id alone identifies the intent, and the session attributes it
/// to the player currently in turn.
#[derive(Clone, Debug)]
pub struct MatchSession {
    state: Match,
    last_events: Vec<Event>,
}

impl MatchSession {
    /// Starts a session over a freshly set up match.
    pub fn new(config: &MatchConfig) -> Result<Self, SetupError> {
        Ok(Self {
            state: Match::new(config)?,
            last_events: Vec::new(),
        })
    }

    /// Moves the player's token one step to the destination cell.
    pub fn submit_move(&mut self, player: PlayerId, destination: CellCoord) -> Outcome<MatchView> {
        self.dispatch(Command::Move {
            player,
            destination,
        })
    }

    /// Places a wall of the given kind for the player.
    pub fn place_wall(
        &mut self,
        player: PlayerId,
        kind: WallKind,
        anchor: CellCoord,
        facing: Direction,
    ) -> Outcome<MatchView> {
        self.dispatch(Command::PlaceWall {
            player,
            kind,
            anchor,
            facing,
        })
    }

    /// Rotates a placed wall clockwise on behalf of the player in turn.
    pub fn rotate_wall(&mut self, wall: WallId) -> Outcome<MatchView> {
        let player = query::player_in_turn(&self.state);
        self.dispatch(Command::RotateWall { player, wall })
    }

    /// Ends the player's turn without a primary action.
    pub fn end_turn(&mut self, player: PlayerId) -> Outcome<MatchView> {
        self.dispatch(Command::EndTurn { player })
    }

    /// Snapshot of the match as it currently stands.
    #[must_use]
    pub fn view(&self) -> MatchView {
        query::view(&self.state)
    }

    /// Events broadcast by the most recent committed call.
    #[must_use]
    pub fn last_events(&self) -> &[Event] {
        &self.last_events
    }

    fn dispatch(&mut self, command: Command) -> Outcome<MatchView> {
        let mut events = Vec::new();
        match apply(&mut self.state, command, &mut events) {
            Ok(()) => {
                let message = describe(&events);
                self.last_events = events;
                Outcome::success(message, query::view(&self.state))
            }
            Err(error) => Outcome::failure(error.to_string()),
        }
    }
}

/// Narrates an event stream as one semicolon-separated sentence.
fn describe(events: &[Event]) -> String {
    let mut message = String::new();
    for event in events {
        if !message.is_empty() {
            message.push_str("; ");
        }
        match event {
            Event::TurnStarted { player, turn } => {
                let _ = write!(message, "turn {turn} begins for player {player}");
            }
            Event::TokenMoved { player, from, to } => {
                let _ = write!(message, "player {player} moved from {from} to {to}");
            }
            Event::Teleported { player, to, .. } => {
                let _ = write!(message, "player {player} teleported to {to}");
            }
            Event::ExtraTurnGranted { player } => {
                let _ = write!(message, "player {player} earned an extra turn");
            }
            Event::WallPlaced { wall, anchor, .. } => {
                let _ = write!(message, "wall {wall} placed at {anchor}");
            }
            Event::WallRotated { wall, .. } => {
                let _ = write!(message, "wall {wall} rotated clockwise");
            }
            Event::WallsReturned { player, walls } => {
                let _ = write!(
                    message,
                    "{} walls returned to player {player}",
                    walls.len()
                );
            }
            Event::TemporalWallExpired { wall } => {
                let _ = write!(message, "wall {wall} expired");
            }
            Event::MatchWon { player } => {
                let _ = write!(message, "player {player} wins the match");
            }
        }
    }
    if message.is_empty() {
        message.push_str("turn passed");
    }
    message
}
