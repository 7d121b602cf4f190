//! Letters and the built-in sample correspondence.

mod model;
mod sample;

pub use model::{ACCENT_PALETTE, Letter, LetterId};
pub use sample::sample_letters;
