pub mod types;
pub mod board;
pub mod rules;
pub mod flip;
pub mod turn;
pub mod result;
pub mod state;

pub use types::*;
pub use board::*;
pub use rules::MoveValidator;
pub use flip::FlipEngine;
pub use turn::*;
pub use result::*;
pub use state::*;
