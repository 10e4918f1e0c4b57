//! Key sequence mapping engine.
//!
//! Design principles:
//! - Pure and deterministic: for a fixed keymap and ambiguity timeout, the
//!   token stream is a function of the input byte stream alone.
//! - Bindings compile into a compressed trie for cache locality.
//! - Ambiguity (a node that is both a leaf and a prefix of longer bindings)
//!   is resolved exclusively by the timeout. Escape is the canonical case:
//!   a bare press and the first byte of every arrow sequence share a trie
//!   node, and nothing but the timer can tell them apart.
//! - No side effects: traversal logs at TRACE only.

use std::collections::VecDeque;
use std::time::Duration;

use smallvec::SmallVec;
use tracing::trace;

use core_input::{NonBlockingReader, ReadOutcome};

/// Default wait at an ambiguous trie node before committing its leaf.
pub const DEFAULT_AMBIGUOUS_TIMEOUT: Duration = Duration::from_millis(150);

// -------------------------------------------------------------------------------------------------
// Trie representation
// -------------------------------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Edge {
    ch: char,
    next: usize,
}

#[derive(Debug, Clone)]
struct Node<T> {
    terminal: Option<T>,
    edges: SmallVec<[Edge; 4]>,
}

impl<T> Node<T> {
    fn new() -> Self {
        Self {
            terminal: None,
            edges: SmallVec::new(),
        }
    }
}

/// Prefix trie from input character sequences to tokens of type `T`.
///
/// Three knobs round out the sequence table:
/// - `nomatch`: token returned for sequences matching no binding prefix;
/// - `unicode`: token returned for a single unassigned printable character
///   (the character itself is available from the reader's `last_chars`);
/// - `ambiguous_timeout`: how long to wait at a leaf that is also a prefix.
#[derive(Debug, Clone)]
pub struct KeyMap<T> {
    nodes: Vec<Node<T>>,
    nomatch: Option<T>,
    unicode: Option<T>,
    ambiguous_timeout: Duration,
}

impl<T: Clone> Default for KeyMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> KeyMap<T> {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new()],
            nomatch: None,
            unicode: None,
            ambiguous_timeout: DEFAULT_AMBIGUOUS_TIMEOUT,
        }
    }

    /// Bind `seq` to `token`. A later binding for the same sequence
    /// overrides the earlier one.
    pub fn bind(&mut self, seq: &str, token: T) {
        let mut cur = 0usize;
        for ch in seq.chars() {
            cur = match self.child(cur, ch) {
                Some(next) => next,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(Node::new());
                    self.nodes[cur].edges.push(Edge { ch, next });
                    next
                }
            };
        }
        if self.nodes[cur].terminal.is_some() {
            trace!(target: "input.map", node = cur, "terminal_override");
        }
        self.nodes[cur].terminal = Some(token);
    }

    /// Bind several sequences to the same token.
    pub fn bind_all(&mut self, seqs: &[&str], token: T) {
        for seq in seqs {
            self.bind(seq, token.clone());
        }
    }

    /// Token for sequences that match no binding prefix.
    pub fn set_nomatch(&mut self, token: T) {
        self.nomatch = Some(token);
    }

    /// Token for any single unassigned printable character.
    pub fn set_unicode(&mut self, token: T) {
        self.unicode = Some(token);
    }

    pub fn set_ambiguous_timeout(&mut self, timeout: Duration) {
        self.ambiguous_timeout = timeout;
    }

    pub fn ambiguous_timeout(&self) -> Duration {
        self.ambiguous_timeout
    }

    fn child(&self, node: usize, ch: char) -> Option<usize> {
        self.nodes[node]
            .edges
            .iter()
            .find(|e| e.ch == ch)
            .map(|e| e.next)
    }
}

// -------------------------------------------------------------------------------------------------
// Binding reader
// -------------------------------------------------------------------------------------------------

/// Outcome of reading one binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingOutcome<T> {
    /// A resolved token. The consumed characters are in `last_chars`.
    Token(T),
    /// The source ended with no partial binding outstanding.
    Eof,
}

/// Reads characters from a `NonBlockingReader` and resolves them against a
/// `KeyMap`, one token at a time.
///
/// Longest-match with pushback: when descent past a matched leaf dead-ends
/// (or the ambiguity timeout expires), the leaf commits and every
/// character consumed beyond it is replayed into the next resolution.
#[derive(Debug, Default)]
pub struct BindingReader {
    last: Vec<char>,
    replay: VecDeque<char>,
}

impl BindingReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// The character sequence consumed by the most recent `read_binding`.
    pub fn last_chars(&self) -> &[char] {
        &self.last
    }

    /// Convenience for the `unicode` token: the single character consumed.
    pub fn last_char(&self) -> Option<char> {
        match self.last.as_slice() {
            [c] => Some(*c),
            _ => None,
        }
    }

    fn next_char(
        &mut self,
        reader: &mut NonBlockingReader,
        timeout: Option<Duration>,
    ) -> ReadOutcome {
        match self.replay.pop_front() {
            Some(c) => ReadOutcome::Char(c),
            None => reader.read(timeout),
        }
    }

    /// Commit a match of `consumed` characters, replaying the rest.
    fn commit_at(&mut self, consumed: usize) {
        let overrun: Vec<char> = self.last.drain(consumed..).collect();
        for c in overrun.into_iter().rev() {
            self.replay.push_front(c);
        }
    }

    /// Resolve the next binding.
    ///
    /// Descends the trie one character at a time. A leaf with no children
    /// commits immediately; a leaf that is also a prefix waits up to the
    /// map's ambiguity timeout for a continuation and commits on expiry.
    /// A dead end commits the longest leaf already matched (replaying the
    /// overrun), else yields the `unicode` token (single printable), else
    /// the `nomatch` token, else restarts cleanly on the next character.
    pub fn read_binding<T: Clone>(
        &mut self,
        map: &KeyMap<T>,
        reader: &mut NonBlockingReader,
    ) -> BindingOutcome<T> {
        self.last.clear();
        let mut node = 0usize;
        // Longest match so far: (token, characters it consumed).
        let mut pending: Option<(T, usize)> = None;
        loop {
            let timeout = pending.as_ref().map(|_| map.ambiguous_timeout);
            match self.next_char(reader, timeout) {
                ReadOutcome::TimedOut => {
                    // Timed reads are issued only while a leaf is pending.
                    let Some((tok, consumed)) = pending.take() else {
                        return BindingOutcome::Eof;
                    };
                    trace!(target: "input.binding", consumed, "ambiguity_timeout_commit");
                    self.commit_at(consumed);
                    return BindingOutcome::Token(tok);
                }
                ReadOutcome::Eof => {
                    let Some((tok, consumed)) = pending.take() else {
                        return BindingOutcome::Eof;
                    };
                    self.commit_at(consumed);
                    return BindingOutcome::Token(tok);
                }
                ReadOutcome::Char(c) => {
                    self.last.push(c);
                    match map.child(node, c) {
                        Some(next) => {
                            node = next;
                            trace!(target: "input.map", ch = ?c, node, "advance");
                            let has_children = !map.nodes[node].edges.is_empty();
                            match &map.nodes[node].terminal {
                                Some(tok) if !has_children => {
                                    return BindingOutcome::Token(tok.clone());
                                }
                                Some(tok) => pending = Some((tok.clone(), self.last.len())),
                                None => {}
                            }
                        }
                        None => {
                            if let Some((tok, consumed)) = pending.take() {
                                self.commit_at(consumed);
                                return BindingOutcome::Token(tok);
                            }
                            if self.last.len() == 1
                                && !c.is_control()
                                && let Some(tok) = &map.unicode
                            {
                                return BindingOutcome::Token(tok.clone());
                            }
                            if let Some(tok) = &map.nomatch {
                                return BindingOutcome::Token(tok.clone());
                            }
                            trace!(target: "input.binding", dropped = self.last.len(), "unbound_sequence_dropped");
                            self.last.clear();
                            node = 0;
                        }
                    }
                }
            }
        }
    }
}
