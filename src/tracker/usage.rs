// Usage-log token parser
//
// The engine exposes no structured API for "what was removed" — only a
// diagnostic text stream, normally one class name per line. This parser
// reconstructs that line structure from token adjacency to a separator
// sentinel, as an explicit state machine so its edge cases are testable
// without an engine.
//
// Known fragility: any line carrying content other than a single class name
// token corrupts or drops that line's candidate. The format is undocumented;
// the tests pin down the current behavior instead of guessing at it.

use std::collections::BTreeSet;

#[derive(Debug, Default)]
enum State {
    /// The last token was a line separator. The next non-separator token is
    /// tentatively a candidate class name. The stream itself starts at a
    /// line boundary.
    #[default]
    LineStart,
    /// A candidate was captured; only an immediately following separator
    /// confirms it.
    Pending(String),
    /// Mid-line after an invalidated candidate. Nothing on this line can
    /// become a candidate; the next separator returns to `LineStart`.
    MidLine,
}

/// Rebuilds the removed-class set from the engine's usage-log token stream.
#[derive(Debug, Default)]
pub struct UsageLogParser {
    state: State,
    removed: BTreeSet<String>,
}

impl UsageLogParser {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_separator(token: &str) -> bool {
        token == "\n" || token == "\r\n"
    }

    /// Consume one token from the stream.
    pub fn token(&mut self, token: &str) {
        if Self::is_separator(token) {
            if let State::Pending(candidate) = std::mem::take(&mut self.state) {
                self.removed.insert(candidate);
            }
            self.state = State::LineStart;
        } else {
            self.state = match std::mem::take(&mut self.state) {
                State::LineStart => State::Pending(token.to_string()),
                State::Pending(_) | State::MidLine => State::MidLine,
            };
        }
    }

    /// Finish the stream and return the confirmed set. An unconfirmed
    /// trailing candidate is discarded: without its separator the line never
    /// completed.
    pub fn finish(self) -> BTreeSet<String> {
        self.removed
    }
}
