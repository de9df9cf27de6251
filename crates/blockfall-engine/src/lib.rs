pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// The piece would overlap a wall, the floor or an occupied cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece colliding with the board")]
pub struct PieceCollisionError;

/// A player action that was refused. The board is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ActionError {
    #[display("piece colliding when moving or rotating")]
    Collision(PieceCollisionError),
    #[display("game is paused or over")]
    NotPlaying,
}

impl From<PieceCollisionError> for ActionError {
    fn from(err: PieceCollisionError) -> Self {
        Self::Collision(err)
    }
}
