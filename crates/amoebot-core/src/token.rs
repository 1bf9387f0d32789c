//! Typed inter-particle messages.

use std::collections::VecDeque;
use std::fmt;

/// Message payload carried between neighbouring particles.
///
/// Each algorithm defines one closed enum of tokens; `Kind` is its fieldless
/// discriminant, used for by-kind queries on a [`Mailbox`].
pub trait Token: fmt::Debug {
    type Kind: Copy + Eq + fmt::Debug;

    fn kind(&self) -> Self::Kind;
}

/// Token type for algorithms that never exchange messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoToken {}

impl Token for NoToken {
    type Kind = NoToken;

    fn kind(&self) -> Self::Kind {
        match *self {}
    }
}

/// FIFO token store owned by a single particle.
#[derive(Debug, Clone)]
pub struct Mailbox<T> {
    tokens: VecDeque<T>,
}

impl<T> Default for Mailbox<T> {
    fn default() -> Self {
        Self {
            tokens: VecDeque::new(),
        }
    }
}

impl<T: Token> Mailbox<T> {
    /// Create an empty mailbox.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a token behind every token already held.
    pub fn put(&mut self, token: T) {
        self.tokens.push_back(token);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Iterate over held tokens, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.tokens.iter()
    }

    /// Number of held tokens of `kind`.
    #[must_use]
    pub fn count_kind(&self, kind: T::Kind) -> usize {
        self.count_where(|token| token.kind() == kind)
    }

    #[must_use]
    pub fn has_kind(&self, kind: T::Kind) -> bool {
        self.tokens.iter().any(|token| token.kind() == kind)
    }

    /// Oldest token of `kind`, left in place.
    #[must_use]
    pub fn peek_kind(&self, kind: T::Kind) -> Option<&T> {
        self.peek_where(|token| token.kind() == kind)
    }

    /// Remove and return the oldest token of `kind`.
    pub fn take_kind(&mut self, kind: T::Kind) -> Option<T> {
        self.take_where(|token| token.kind() == kind)
    }

    /// Remove and return the oldest token, whatever its kind.
    pub fn take_first(&mut self) -> Option<T> {
        self.tokens.pop_front()
    }

    #[must_use]
    pub fn count_where(&self, predicate: impl Fn(&T) -> bool) -> usize {
        self.tokens.iter().filter(|token| predicate(token)).count()
    }

    #[must_use]
    pub fn peek_where(&self, predicate: impl Fn(&T) -> bool) -> Option<&T> {
        self.tokens.iter().find(|token| predicate(token))
    }

    /// Remove the oldest token matching `predicate`; the remaining tokens keep
    /// their relative order.
    pub fn take_where(&mut self, predicate: impl Fn(&T) -> bool) -> Option<T> {
        let position = self.tokens.iter().position(predicate)?;
        self.tokens.remove(position)
    }
}
