//! Display values derived from the letters.

use crate::letter::Letter;

/// Time-of-day greeting for an hour in `0..24`.
#[must_use]
pub const fn greeting(hour: u32) -> &'static str {
    match hour {
        0..12 => "Good morning",
        12..18 => "Good afternoon",
        _ => "Good evening",
    }
}

/// Number of letters not yet opened.
#[must_use]
pub fn unread_count(letters: &[Letter]) -> usize {
    letters.iter().filter(|letter| !letter.read).count()
}

/// Header line shown above the stack.
///
/// The count is the size of the stack, read or not.
#[must_use]
pub fn summary_line(name: &str, letters: &[Letter], hour: u32) -> String {
    format!(
        "{} {name}, you have {} new mails today.",
        greeting(hour),
        letters.len()
    )
}
