pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("piece colliding when moving falling piece")]
pub struct PieceCollisionError;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum MoveError {
    #[display("piece colliding when moving falling piece")]
    PieceCollision(PieceCollisionError),
    #[display("no piece is falling")]
    NotFalling,
}
