//! Completion at the boundary with the line editor.
//!
//! The core never generates candidates itself. A [`Variable`](super::Variable)
//! may carry a [`Completer`]; after a prefix match, the variables that reach
//! the end of the input are the ones the user is typing, and their completers
//! are asked for candidates. Candidates come back in the variable's
//! unwrapped form and are passed through its wrap transform before insertion.
//!
//! Completers run synchronously on the caller's thread. Callers with slow
//! completers should move [`Grammar::complete`] off their input path.

use super::compiler::Grammar;
use super::matcher::Match;
use serde::Serialize;

/// Proposes completions for the partial text of one variable.
pub trait Completer: Send + Sync {
    /// Candidates for `text`, the unwrapped text typed so far.
    fn complete(&self, text: &str) -> Vec<String>;
}

impl<F> Completer for F
where
    F: Fn(&str) -> Vec<String> + Send + Sync,
{
    fn complete(&self, text: &str) -> Vec<String> {
        self(text)
    }
}

/// Completes from a fixed list of words by prefix.
#[derive(Debug, Clone, Default)]
pub struct WordCompleter {
    words: Vec<String>,
}

impl WordCompleter {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }
}

impl Completer for WordCompleter {
    fn complete(&self, text: &str) -> Vec<String> {
        self.words
            .iter()
            .filter(|word| word.starts_with(text))
            .cloned()
            .collect()
    }
}

/// One candidate replacement for the tail of the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    /// Name of the variable being completed.
    pub variable: String,
    /// Byte offset in the input where the replacement starts.
    pub start: usize,
    /// Replacement text, already wrapped.
    pub text: String,
}

impl Completion {
    /// The input with this completion applied.
    pub fn apply(&self, input: &str) -> String {
        let keep = input.get(..self.start).unwrap_or(input);
        format!("{}{}", keep, self.text)
    }
}

impl<'g, 't> Match<'g, 't> {
    /// Candidates from the completers of every variable ending at the input's end.
    pub fn completions(&self) -> Vec<Completion> {
        let mut completions = Vec::new();
        for found in self.trailing_variables() {
            let Some(completer) = found.variable.completer() else {
                continue;
            };
            let typed = found.variable.unwrap(found.text);
            for candidate in completer.complete(&typed) {
                completions.push(Completion {
                    variable: found.variable.name().to_string(),
                    start: found.span.start,
                    text: found.variable.wrap(&candidate),
                });
            }
        }
        completions
    }
}

impl Grammar {
    /// Completions for `input` read as an in-progress prefix.
    ///
    /// Empty when `input` cannot be extended into a full match.
    pub fn complete(&self, input: &str) -> Vec<Completion> {
        self.match_prefix(input)
            .map(|m| m.completions())
            .unwrap_or_default()
    }
}
