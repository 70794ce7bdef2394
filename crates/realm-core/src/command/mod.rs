//! Command interpreter for chat input (`/me`, `/roll`, `/help`)

mod dice;
mod interpreter;

pub use dice::{roll_notation, DiceSpec, DEFAULT_NOTATION, MAX_DICE, MAX_SIDES};
pub use interpreter::{interpret, interpret_with_rng, PreparedMessage, HELP_TEXT};
