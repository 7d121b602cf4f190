//! Plain-text rendering of the letter stack.

use std::fmt::Write;

use letterbox_core::{Letter, LetterStack, summary_line};

/// Renders the header and the stack, top letter first.
pub fn render_stack(stack: &LetterStack, name: &str, hour: u32) -> String {
    let mut out = summary_line(name, stack.letters(), hour);
    out.push('\n');

    if stack.is_empty() {
        out.push_str("\nThe letterbox is empty. Type 'reset' to check the post.\n");
        return out;
    }

    for (position, letter) in stack.letters().iter().enumerate() {
        let marker = if position == 0 { '>' } else { ' ' };
        let seal = if letter.read { ' ' } else { '*' };
        let _ = writeln!(
            out,
            "{marker}{seal} [{:<2}] {:<4} {:<24} {:<28} {}",
            letter.initials,
            letter.id,
            truncate(&letter.sender_name, 24),
            truncate(&letter.subject, 28),
            letter.display_date,
        );
        if position == 0 && !stack.is_open() {
            let _ = writeln!(out, "          {}", letter.preview_text);
        }
    }
    out
}

/// Renders an open letter.
pub fn render_letter(letter: &Letter) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", letter.subject);
    let _ = writeln!(out, "From {} ({})", letter.sender_name, letter.sender_address);
    let _ = writeln!(out, "{}\n", letter.display_date);
    for paragraph in letter.paragraphs() {
        let _ = writeln!(out, "{paragraph}\n");
    }
    let _ = writeln!(out, "    {}", letter.signature);
    out
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut short: String = text.chars().take(width.saturating_sub(1)).collect();
    short.push('…');
    short
}
