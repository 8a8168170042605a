// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Quote- and paren-aware scanning of expression text.
//!
//! Every helper here walks the text once with a [`ScanState`] and only acts on
//! characters at the top level: outside single-quoted strings and outside any
//! parentheses. A `'` preceded by a backslash does not close a string.
//!
//! All returned offsets are byte offsets on char boundaries of the input.

/// Depth counter plus in-string flag for one left-to-right scan.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct ScanState {
    depth: usize,
    in_string: bool,
    prev: Option<char>,
}

impl ScanState {
    /// Consume `c` and report whether it sits at the top level.
    ///
    /// Quote characters and the parens themselves are never top-level, except a
    /// `)` that closes back to depth zero.
    pub(crate) fn advance(&mut self, c: char) -> bool {
        let top = if self.in_string {
            if c == '\'' && self.prev != Some('\\') {
                self.in_string = false;
            }
            false
        } else {
            match c {
                '\'' => {
                    self.in_string = true;
                    false
                }
                '(' => {
                    self.depth += 1;
                    false
                }
                ')' => {
                    self.depth = self.depth.saturating_sub(1);
                    self.depth == 0
                }
                _ => self.depth == 0,
            }
        };
        self.prev = Some(c);
        top
    }

    pub(crate) fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn in_string(&self) -> bool {
        self.in_string
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ArithOp {
    Add,
    Sub,
}

/// One operand of a top-level `+`/`-` chain with the operator that precedes it.
/// The first term always carries [`ArithOp::Add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Term<'a> {
    pub op: ArithOp,
    pub text: &'a str,
}

/// Split on top-level binary `+`/`-`.
///
/// A sign is unary, and stays part of its term, when the previous non-space
/// character is the start of the text or one of `+ - * / ( ,`.
pub(crate) fn split_plus_minus(expr: &str) -> Vec<Term<'_>> {
    let mut terms = Vec::new();
    let mut state = ScanState::default();
    let mut pending = ArithOp::Add;
    let mut start = 0;

    for (i, c) in expr.char_indices() {
        if !state.advance(c) || (c != '+' && c != '-') {
            continue;
        }
        let unary = match expr[..i].trim_end().chars().last() {
            None => true,
            Some(p) => "+-*/(,".contains(p),
        };
        if unary {
            continue;
        }
        terms.push(Term {
            op: pending,
            text: expr[start..i].trim(),
        });
        pending = if c == '+' { ArithOp::Add } else { ArithOp::Sub };
        start = i + c.len_utf8();
    }

    terms.push(Term {
        op: pending,
        text: expr[start..].trim(),
    });
    terms
}

/// Split a call's argument list on top-level commas.
///
/// Blank input means no arguments. A trailing empty argument is dropped, inner
/// empty arguments are kept so the caller can reject them.
pub(crate) fn split_args(args: &str) -> Vec<&str> {
    if args.trim().is_empty() {
        return Vec::new();
    }

    let mut parts = Vec::new();
    let mut state = ScanState::default();
    let mut start = 0;

    for (i, c) in args.char_indices() {
        if state.advance(c) && c == ',' {
            parts.push(args[start..i].trim());
            start = i + 1;
        }
    }

    let last = args[start..].trim();
    if !last.is_empty() {
        parts.push(last);
    }
    parts
}

/// Split on a top-level keyword such as `AND`/`OR`, case-insensitive and
/// only at word boundaries. A trailing empty part is dropped.
pub(crate) fn split_by_word<'a>(text: &'a str, word: &str) -> Vec<&'a str> {
    let mut parts = Vec::new();
    let mut state = ScanState::default();
    let mut start = 0;
    let mut skip_until = 0;

    for (i, c) in text.char_indices() {
        let top = state.advance(c);
        if i < skip_until || !top {
            continue;
        }
        if let Some(end) = match_word_op(text, i, word) {
            parts.push(text[start..i].trim());
            start = end;
            skip_until = end;
        }
    }

    let last = text[start..].trim();
    if !last.is_empty() {
        parts.push(last);
    }
    parts
}

/// Find the first top-level occurrence of a (possibly multi-word) keyword
/// operator like `NOT LIKE` or `IS NULL`. Words may be separated by any run of
/// whitespace. Returns the byte range of the match.
pub(crate) fn find_word_op(text: &str, op: &str) -> Option<(usize, usize)> {
    let mut state = ScanState::default();
    for (i, c) in text.char_indices() {
        if state.advance(c) {
            if let Some(end) = match_word_op(text, i, op) {
                return Some((i, end));
            }
        }
    }
    None
}

/// Find the first top-level occurrence of a symbolic comparator.
pub(crate) fn find_comparator(text: &str, op: &str) -> Option<usize> {
    let mut state = ScanState::default();
    for (i, c) in text.char_indices() {
        if state.advance(c) && text[i..].starts_with(op) {
            return Some(i);
        }
    }
    None
}

/// Byte index of the `)` matching the `(` at `open`, honouring strings.
pub(crate) fn matching_close(text: &str, open: usize) -> Option<usize> {
    if !text[open..].starts_with('(') {
        return None;
    }
    let mut state = ScanState::default();
    for (i, c) in text[open..].char_indices() {
        state.advance(c);
        if c == ')' && !state.in_string() && state.depth() == 0 {
            return Some(open + i);
        }
    }
    None
}

/// Remove parentheses that wrap the whole text, repeatedly.
/// `(a) AND (b)` is left alone.
pub(crate) fn strip_outer_parens(text: &str) -> &str {
    let mut current = text.trim();
    while current.starts_with('(')
        && current.ends_with(')')
        && matching_close(current, 0) == Some(current.len() - 1)
    {
        current = current[1..current.len() - 1].trim();
    }
    current
}

/// True when the text is exactly one single-quoted literal.
pub(crate) fn is_quoted(text: &str) -> bool {
    if text.len() < 2 || !text.starts_with('\'') {
        return false;
    }
    let mut state = ScanState::default();
    for (i, c) in text.char_indices() {
        state.advance(c);
        if i > 0 && !state.in_string() {
            return i == text.len() - 1;
        }
    }
    false
}

/// Inner text of a quoted literal with `\'` unescaped.
pub(crate) fn unquote(text: &str) -> String {
    text[1..text.len() - 1].replace("\\'", "'")
}

/// Signed integer or decimal literal: `[+-]?digits(.digits)?`.
pub(crate) fn is_number(text: &str) -> bool {
    let unsigned = text.strip_prefix(&['+', '-'][..]).unwrap_or(text);
    let (int, frac) = match unsigned.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (unsigned, None),
    };
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    digits(int) && frac.map_or(true, digits)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Match `op` case-insensitively at byte `at`, with word boundaries on both
/// sides. Returns the end offset of the match.
fn match_word_op(text: &str, at: usize, op: &str) -> Option<usize> {
    if text[..at].chars().last().is_some_and(is_word_char) {
        return None;
    }

    let bytes = text.as_bytes();
    let mut pos = at;
    for (n, word) in op.split_whitespace().enumerate() {
        if n > 0 {
            let ws = text[pos..]
                .char_indices()
                .find(|(_, c)| !c.is_whitespace())
                .map_or(text.len() - pos, |(i, _)| i);
            if ws == 0 {
                return None;
            }
            pos += ws;
        }
        let end = pos + word.len();
        if end > bytes.len() || !bytes[pos..end].eq_ignore_ascii_case(word.as_bytes()) {
            return None;
        }
        pos = end;
    }

    if text[pos..].chars().next().is_some_and(is_word_char) {
        return None;
    }
    Some(pos)
}
