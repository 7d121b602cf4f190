//! Letter stack controller.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::letter::{Letter, LetterId, sample_letters};

/// How a letter leaves the stack. Both modes remove it the same way; they
/// differ only in the effect the view plays first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveMode {
    /// Fold the letter away.
    Fold,
    /// Burn the letter.
    Burn,
}

impl ArchiveMode {
    /// Lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fold => "fold",
            Self::Burn => "burn",
        }
    }
}

impl std::fmt::Display for ArchiveMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of [`LetterStack::select_letter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// The letter was on top and is now open and read.
    Opened,
    /// The letter moved to the top, still closed.
    Promoted,
    /// A promotion is still settling; nothing changed.
    Ignored,
    /// No letter has this ID; nothing changed.
    NotFound,
}

/// Error from [`LetterStack::reset_to_sample`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResetError {
    /// The stack still holds letters.
    #[error("cannot reset: {0} letters remain in the stack")]
    NotEmpty(usize),
}

/// Ordered letters plus the open slot.
#[derive(Debug, Clone)]
pub struct LetterStack {
    letters: Arc<[Letter]>,
    open_id: Option<LetterId>,
    promotion_in_flight: bool,
    sample: Arc<[Letter]>,
}

impl Default for LetterStack {
    fn default() -> Self {
        Self::new()
    }
}

impl LetterStack {
    /// Creates a stack holding the built-in sample letters.
    #[must_use]
    pub fn new() -> Self {
        Self::with_sample(sample_letters())
    }

    /// Creates a stack whose reset template is `sample`, starting with a
    /// copy of it.
    #[must_use]
    pub fn with_sample(sample: Vec<Letter>) -> Self {
        let sample: Arc<[Letter]> = dedupe(sample).into();
        Self {
            letters: sample.iter().cloned().collect(),
            open_id: None,
            promotion_in_flight: false,
            sample,
        }
    }

    /// Current letters, top first.
    #[must_use]
    pub fn letters(&self) -> &[Letter] {
        &self.letters
    }

    /// Shared handle to the current sequence. Later intents never alter it.
    #[must_use]
    pub fn snapshot(&self) -> Arc<[Letter]> {
        Arc::clone(&self.letters)
    }

    /// The letter on top.
    #[must_use]
    pub fn top(&self) -> Option<&Letter> {
        self.letters.first()
    }

    /// ID of the open letter.
    #[must_use]
    pub const fn open_id(&self) -> Option<&LetterId> {
        self.open_id.as_ref()
    }

    /// The open letter.
    #[must_use]
    pub fn open_letter(&self) -> Option<&Letter> {
        self.open_id.as_ref().and(self.top())
    }

    /// Returns true if a letter is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open_id.is_some()
    }

    /// Returns true if a promotion has not been settled yet.
    #[must_use]
    pub const fn is_promoting(&self) -> bool {
        self.promotion_in_flight
    }

    /// Number of letters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.letters.len()
    }

    /// Returns true if no letters remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    /// Position of a letter, 0 being the top.
    #[must_use]
    pub fn position(&self, id: &LetterId) -> Option<usize> {
        self.letters.iter().position(|letter| &letter.id == id)
    }

    /// Selects a letter.
    ///
    /// Selecting the top letter opens it and marks it read. Selecting any
    /// other letter promotes it to the top without opening it; the next
    /// promotion is ignored until [`finish_promotion`](Self::finish_promotion)
    /// is called.
    pub fn select_letter(&mut self, id: &LetterId) -> Selection {
        let Some(position) = self.position(id) else {
            debug!(%id, "Select ignored: no such letter");
            return Selection::NotFound;
        };

        if self.promotion_in_flight {
            debug!(%id, "Select ignored: promotion in flight");
            return Selection::Ignored;
        }

        let mut next = self.letters.to_vec();
        if position == 0 {
            next[0].read = true;
            self.letters = next.into();
            self.open_id = Some(id.clone());
            debug!(%id, "Opened letter");
            return Selection::Opened;
        }

        let letter = next.remove(position);
        next.insert(0, letter);
        self.letters = next.into();
        self.open_id = None;
        self.promotion_in_flight = true;
        debug!(%id, from = position, "Promoted letter");
        Selection::Promoted
    }

    /// Marks the pending promotion as settled.
    pub fn finish_promotion(&mut self) {
        self.promotion_in_flight = false;
    }

    /// Closes the open letter, if any.
    pub fn close_open(&mut self) {
        self.open_id = None;
    }

    /// Removes the top letter for good and returns it.
    pub fn archive_top(&mut self, mode: ArchiveMode) -> Option<Letter> {
        self.open_id = None;
        self.promotion_in_flight = false;

        let (first, rest) = self.letters.split_first()?;
        let archived = first.clone();
        self.letters = rest.into();
        debug!(id = %archived.id, %mode, remaining = self.letters.len(), "Archived letter");
        Some(archived)
    }

    /// Restores the sample letters once the stack is empty.
    ///
    /// # Errors
    ///
    /// Returns [`ResetError::NotEmpty`] if letters remain.
    pub fn reset_to_sample(&mut self) -> Result<(), ResetError> {
        if !self.letters.is_empty() {
            return Err(ResetError::NotEmpty(self.letters.len()));
        }
        self.letters = self.sample.iter().cloned().collect();
        self.open_id = None;
        self.promotion_in_flight = false;
        debug!(count = self.letters.len(), "Restored sample letters");
        Ok(())
    }

    /// Replaces the whole collection, e.g. with imported letters.
    ///
    /// Letters repeating an earlier ID are dropped.
    pub fn replace_all(&mut self, letters: Vec<Letter>) {
        self.letters = dedupe(letters).into();
        self.open_id = None;
        self.promotion_in_flight = false;
        debug!(count = self.letters.len(), "Replaced letters");
    }
}

fn dedupe(letters: Vec<Letter>) -> Vec<Letter> {
    let mut seen = HashSet::new();
    letters
        .into_iter()
        .filter(|letter| {
            let fresh = seen.insert(letter.id.clone());
            if !fresh {
                warn!(id = %letter.id, "Dropping letter with duplicate id");
            }
            fresh
        })
        .collect()
}
