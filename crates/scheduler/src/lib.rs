//! Election scheduling primitives: the active-election pool seam and the
//! admission limiter in front of it.

pub mod election;
pub mod limiter;

pub use election::{Election, ElectionInsertion, ElectionPool, ElectionRef};
pub use limiter::Limiter;
