//! Rejection reasons for actions.
//!
//! Every variant is recoverable: the state the action was checked against
//! is untouched, and `Display` gives a sentence fit for a status line.

use thiserror::Error;

use super::pattern::PatternId;
use super::player::Player;
use super::position::Position;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("the game is already over")]
    GameOver,

    #[error("it is {current}'s turn, not {attempted}'s")]
    NotYourTurn { current: Player, attempted: Player },

    #[error("{0:?} is not on the board")]
    OffBoard(Position),

    #[error("{0} is already occupied")]
    Occupied(Position),

    #[error("no stones left in hand")]
    EmptyHand,

    #[error("there is no stone of yours at {0}")]
    NotYourStone(Position),

    #[error("the stone at {0} is locked")]
    StoneLocked(Position),

    #[error("{from} to {to} is not a straight orthogonal move")]
    NotOrthogonal { from: Position, to: Position },

    #[error("{from} to {to} is further than two cells")]
    TooFar { from: Position, to: Position },

    #[error("the path through {0} is blocked")]
    PathBlocked(Position),

    #[error("cannot land on {0}: only unlocked opponent stones can be struck")]
    InvalidTarget(Position),

    #[error("a lock needs at least three stones, got {0}")]
    TooFewPositions(usize),

    #[error("{0} was just broken and cannot be re-locked this turn")]
    CoolingDown(Position),

    #[error("{0} is not an available pattern")]
    NotAPattern(PatternId),

    #[error("the river is empty")]
    EmptyRiver,

    #[error("break has already been used this game")]
    BreakAlreadyUsed,

    #[error("sacrifice must be two distinct cells holding your locked stones")]
    InvalidSacrifice,

    #[error("{0} does not hold a locked opponent stone")]
    InvalidBreakTarget(Position),

    #[error("no passes left")]
    NoPassesLeft,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let c3: Position = "c3".parse().unwrap();
        assert_eq!(MoveError::Occupied(c3).to_string(), "c3 is already occupied");
        assert_eq!(
            MoveError::NotYourTurn {
                current: Player::Light,
                attempted: Player::Dark
            }
            .to_string(),
            "it is Light's turn, not Dark's"
        );
        assert_eq!(MoveError::NoPassesLeft.to_string(), "no passes left");
    }
}
