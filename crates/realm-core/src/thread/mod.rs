//! Thread assembly - reply trees over a flat message window

mod assembler;

pub use assembler::{assemble, MessageNode, Threaded};
