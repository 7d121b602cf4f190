//! The letter stack.
//!
//! Position 0 is the top of the stack: the only letter that can be open.
//! Every intent replaces the ordered sequence wholesale, so snapshots taken
//! earlier never change underneath their holder.

mod controller;
mod display;

pub use controller::{ArchiveMode, LetterStack, ResetError, Selection};
pub use display::{greeting, summary_line, unread_count};
