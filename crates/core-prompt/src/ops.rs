//! Operation tokens and the key sequence tables binding them.
//!
//! Every executor reads abstract `Op`s, never raw bytes. The tables bind
//! both CSI (`\x1b[A`) and SS3 (`\x1bOA`) encodings for the cursor keys,
//! so keypad-transmit mode never needs toggling. Escape itself is a
//! binding *and* the first byte of every arrow sequence; the keymap's
//! ambiguity timeout is what tells a bare press apart.

use std::time::Duration;

use core_keymap::KeyMap;

/// Abstract input operation consumed by the prompt executors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// An unassigned printable character; the character is read from the
    /// binding reader.
    Insert,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    BeginningOfLine,
    EndOfLine,
    /// Tab: cycle completion candidates.
    SelectCandidate,
    /// Linear cursor motion over selectable items.
    ForwardOneLine,
    BackwardOneLine,
    /// Column motion within the current row (multi-column layouts).
    ForwardOneColumn,
    BackwardOneColumn,
    /// Flip the checkbox under the cursor.
    Toggle,
    /// Enter: commit the prompt.
    Exit,
    /// Interrupt: abort the whole run.
    Cancel,
    /// Escape: one-step back-navigation.
    Escape,
}

fn base_map(timeout: Duration) -> KeyMap<Op> {
    let mut map = KeyMap::new();
    map.set_ambiguous_timeout(timeout);
    map.bind_all(&["\r", "\n"], Op::Exit);
    map.bind("\x03", Op::Cancel);
    map.bind("\x1b", Op::Escape);
    map.set_unicode(Op::Insert);
    map
}

/// Bindings for the free-text input executor.
pub fn input_keymap(timeout: Duration) -> KeyMap<Op> {
    let mut map = base_map(timeout);
    map.bind_all(&["\x7f", "\x08"], Op::Backspace);
    map.bind("\x1b[3~", Op::Delete);
    map.bind_all(&["\x1b[D", "\x1bOD", "\x02"], Op::Left);
    map.bind_all(&["\x1b[C", "\x1bOC", "\x06"], Op::Right);
    map.bind_all(&["\x1b[A", "\x1bOA"], Op::Up);
    map.bind_all(&["\x1b[B", "\x1bOB"], Op::Down);
    map.bind_all(&["\x01", "\x1b[H", "\x1bOH"], Op::BeginningOfLine);
    map.bind_all(&["\x05", "\x1b[F", "\x1bOF"], Op::EndOfLine);
    map.bind("\t", Op::SelectCandidate);
    map
}

/// Bindings for list navigation.
pub fn list_keymap(timeout: Duration) -> KeyMap<Op> {
    let mut map = base_map(timeout);
    map.bind_all(&["\x1b[B", "\x1bOB"], Op::ForwardOneLine);
    map.bind_all(&["\x1b[A", "\x1bOA"], Op::BackwardOneLine);
    map.bind_all(&["\x1b[C", "\x1bOC"], Op::ForwardOneColumn);
    map.bind_all(&["\x1b[D", "\x1bOD"], Op::BackwardOneColumn);
    map
}

/// Bindings for checkbox navigation: list bindings plus Space toggling.
pub fn checkbox_keymap(timeout: Duration) -> KeyMap<Op> {
    let mut map = list_keymap(timeout);
    map.bind(" ", Op::Toggle);
    map
}

/// Bindings for single-key choice and confirmation prompts.
pub fn choice_keymap(timeout: Duration) -> KeyMap<Op> {
    base_map(timeout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_input::NonBlockingReader;
    use core_keymap::{BindingOutcome, BindingReader};
    use std::io::Cursor;

    fn ops_for(map: &KeyMap<Op>, bytes: &[u8]) -> Vec<Op> {
        let mut reader = NonBlockingReader::spawn(Cursor::new(bytes.to_vec()));
        let mut binding = BindingReader::new();
        let mut out = Vec::new();
        loop {
            match binding.read_binding(map, &mut reader) {
                BindingOutcome::Token(op) => out.push(op),
                BindingOutcome::Eof => return out,
            }
        }
    }

    #[test]
    fn arrow_encodings_both_resolve() {
        let map = list_keymap(Duration::from_millis(10));
        assert_eq!(
            ops_for(&map, b"\x1b[B\x1bOB\x1b[A\x1bOA"),
            vec![
                Op::ForwardOneLine,
                Op::ForwardOneLine,
                Op::BackwardOneLine,
                Op::BackwardOneLine
            ]
        );
    }

    #[test]
    fn enter_and_interrupt_resolve_everywhere() {
        for map in [
            input_keymap(Duration::from_millis(10)),
            list_keymap(Duration::from_millis(10)),
            checkbox_keymap(Duration::from_millis(10)),
            choice_keymap(Duration::from_millis(10)),
        ] {
            assert_eq!(ops_for(&map, b"\r\x03"), vec![Op::Exit, Op::Cancel]);
        }
    }

    #[test]
    fn trailing_escape_resolves_as_back() {
        let map = input_keymap(Duration::from_millis(10));
        assert_eq!(ops_for(&map, b"\x1b"), vec![Op::Escape]);
    }

    #[test]
    fn space_toggles_only_in_checkbox_map() {
        let checkbox = checkbox_keymap(Duration::from_millis(10));
        assert_eq!(ops_for(&checkbox, b" "), vec![Op::Toggle]);
        let list = list_keymap(Duration::from_millis(10));
        assert_eq!(ops_for(&list, b" "), vec![Op::Insert]);
    }

    #[test]
    fn printables_fall_through_to_insert() {
        let map = input_keymap(Duration::from_millis(10));
        assert_eq!(ops_for(&map, "né".as_bytes()), vec![Op::Insert, Op::Insert]);
    }
}
