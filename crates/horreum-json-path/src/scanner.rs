//! Quote-aware scanning over path strings.
//!
//! A two-state machine: `Unquoted`, or `Quoted` by the `'` or `"` that opened
//! the segment. Backslashes are not treated as escapes, so `\"` inside a quoted
//! segment closes it.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteState {
    #[default]
    Unquoted,
    Quoted(char),
}

impl QuoteState {
    /// State after consuming `c`.
    pub fn step(self, c: char) -> Self {
        match (self, c) {
            (Self::Unquoted, '\'' | '"') => Self::Quoted(c),
            (Self::Quoted(open), c) if c == open => Self::Unquoted,
            (state, _) => state,
        }
    }

    pub fn is_quoted(self) -> bool {
        matches!(self, Self::Quoted(_))
    }
}

/// Iterate over `(byte_offset, char)` pairs that sit outside quoted segments.
///
/// Quote characters themselves are never yielded.
pub fn unquoted_chars(input: &str) -> impl Iterator<Item = (usize, char)> + '_ {
    input
        .char_indices()
        .scan(QuoteState::Unquoted, |state, (idx, c)| {
            let before = *state;
            *state = state.step(c);
            let visible = !before.is_quoted() && !state.is_quoted() && !matches!(c, '\'' | '"');
            Some((idx, c, visible))
        })
        .filter_map(|(idx, c, visible)| visible.then_some((idx, c)))
}

/// Byte offset of the last unquoted character matching `pred`.
pub fn last_unquoted(input: &str, pred: impl Fn(char) -> bool) -> Option<usize> {
    unquoted_chars(input)
        .filter(|(_, c)| pred(*c))
        .last()
        .map(|(idx, _)| idx)
}

/// Byte offset of the first unquoted character matching `pred`.
pub fn first_unquoted(input: &str, pred: impl Fn(char) -> bool) -> Option<usize> {
    unquoted_chars(input)
        .find(|(_, c)| pred(*c))
        .map(|(idx, _)| idx)
}

/// Byte offset of the bracket closing the one at `open_at`, skipping quoted text
/// and nested pairs. `None` when the input ends first.
pub fn matching_close(input: &str, open_at: usize, open: char, close: char) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, c) in unquoted_chars(input).skip_while(|(idx, _)| *idx < open_at) {
        if c == open {
            depth += 1;
        } else if c == close {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(idx);
            }
        }
    }
    None
}
