//! Key-sequence notation for key triggers.
//!
//! Sequences use the editor's angle-bracket notation: plain characters
//! (`gd`), special keys (`<CR>`, `<Esc>`, `<leader>`), modifier chords
//! (`<C-p>`, `<A-j>`, `<C-S-Tab>`), and function keys (`<F1>`..`<F12>`).
//! Parsing normalises the notation so that equal presses compare equal:
//! special-key and modifier names are case-insensitive, `<M-x>` is the same
//! chord as `<A-x>`, and a raw space is the same key as `<Space>`. The case
//! of plain characters is preserved (`<C-p>` and `<C-P>` are distinct).
//!
//! ## Supported syntax
//!
//! ```text
//! sequence  = (char | group)+
//! group     = "<" modifiers* name ">"
//! modifiers = ("C" | "A" | "M" | "S") "-"
//! name      = special | fn-key | char
//! special   = "leader" | "localleader" | "CR" | "Esc" | "Space" | ...
//! fn-key    = "F" digit digit?
//! ```
//!
//! A literal `<` is written `<lt>`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;


/// Error raised when key notation cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid key notation at byte {position}: {message}")]
pub struct KeyParseError {
    /// Byte offset in the input where the error was detected.
    pub position: usize,
    /// Human-readable description of the problem.
    pub message: String,
}

impl KeyParseError {
    fn new(position: usize, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

/// Modifier keys held while a key is pressed.
///
/// `Meta` notation (`<M-x>`) normalises to [`Modifiers::alt`]. Command/super
/// chords are not part of the notation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Control modifier (`C-`).
    pub ctrl: bool,
    /// Alt modifier (`A-` or `M-`).
    pub alt: bool,
    /// Shift modifier (`S-`).
    pub shift: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
    };

    /// Returns `true` when no modifier is held.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        !(self.ctrl || self.alt || self.shift)
    }
}

/// Named keys without a single-character representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialKey {
    /// The user's leader key, resolved by the host.
    Leader,
    /// The user's buffer-local leader key.
    LocalLeader,
    /// Enter / carriage return (`<CR>`, `<Enter>`, `<Return>`).
    Enter,
    /// Escape (`<Esc>`, `<Escape>`).
    Esc,
    /// Space bar; a raw space in a sequence parses to this key.
    Space,
    /// Tabulator.
    Tab,
    /// Backspace (`<BS>`).
    Backspace,
    /// Forward delete (`<Del>`).
    Delete,
    /// Cursor up.
    Up,
    /// Cursor down.
    Down,
    /// Cursor left.
    Left,
    /// Cursor right.
    Right,
    /// Home.
    Home,
    /// End.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
}

impl SpecialKey {
    /// Canonical notation name used by [`fmt::Display`].
    #[must_use]
    pub const fn canonical_name(self) -> &'static str {
        match self {
            Self::Leader => "leader",
            Self::LocalLeader => "localleader",
            Self::Enter => "CR",
            Self::Esc => "Esc",
            Self::Space => "Space",
            Self::Tab => "Tab",
            Self::Backspace => "BS",
            Self::Delete => "Del",
            Self::Up => "Up",
            Self::Down => "Down",
            Self::Left => "Left",
            Self::Right => "Right",
            Self::Home => "Home",
            Self::End => "End",
            Self::PageUp => "PageUp",
            Self::PageDown => "PageDown",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        let key = match name {
            "leader" => Self::Leader,
            "localleader" => Self::LocalLeader,
            "cr" | "enter" | "return" => Self::Enter,
            "esc" | "escape" => Self::Esc,
            "space" => Self::Space,
            "tab" => Self::Tab,
            "bs" | "backspace" => Self::Backspace,
            "del" | "delete" => Self::Delete,
            "up" => Self::Up,
            "down" => Self::Down,
            "left" => Self::Left,
            "right" => Self::Right,
            "home" => Self::Home,
            "end" => Self::End,
            "pageup" => Self::PageUp,
            "pagedown" => Self::PageDown,
            _ => return None,
        };
        Some(key)
    }
}

/// A single key identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character, case preserved.
    Char(char),
    /// A named key such as `<CR>` or `<leader>`.
    Special(SpecialKey),
    /// A function key `<F1>`..`<F12>`.
    Function(u8),
}

/// One element of a key sequence: a key plus the modifiers held with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyNode {
    /// Modifiers held for this press.
    pub modifiers: Modifiers,
    /// The key pressed.
    pub key: Key,
}

impl KeyNode {
    /// Creates a node for a bare key with no modifiers.
    #[must_use]
    pub const fn plain(key: Key) -> Self {
        Self {
            modifiers: Modifiers::NONE,
            key,
        }
    }
}

impl fmt::Display for KeyNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.is_empty() {
            return match self.key {
                Key::Char('<') => f.write_str("<lt>"),
                Key::Char(ch) => write!(f, "{ch}"),
                Key::Special(special) => write!(f, "<{}>", special.canonical_name()),
                Key::Function(n) => write!(f, "<F{n}>"),
            };
        }
        f.write_str("<")?;
        if self.modifiers.ctrl {
            f.write_str("C-")?;
        }
        if self.modifiers.alt {
            f.write_str("A-")?;
        }
        if self.modifiers.shift {
            f.write_str("S-")?;
        }
        match self.key {
            Key::Char('<') => f.write_str("lt")?,
            Key::Char(ch) => write!(f, "{ch}")?,
            Key::Special(special) => f.write_str(special.canonical_name())?,
            Key::Function(n) => write!(f, "F{n}")?,
        }
        f.write_str(">")
    }
}

/// A parsed, normalised key sequence.
///
/// Sequences are compared structurally, so any two spellings of the same
/// presses are equal regardless of the notation used to write them.
///
/// # Example
///
/// ```
/// use rouse_units::KeySequence;
///
/// let a: KeySequence = "<leader>ff".parse().expect("valid");
/// let b: KeySequence = "<LEADER>ff".parse().expect("valid");
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "<leader>ff");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeySequence {
    nodes: Vec<KeyNode>,
}

impl KeySequence {
    /// Returns the presses making up this sequence.
    #[must_use]
    pub fn nodes(&self) -> &[KeyNode] {
        &self.nodes
    }

    /// Returns the number of presses in the sequence.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: parsing rejects empty sequences.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl fmt::Display for KeySequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            write!(f, "{node}")?;
        }
        Ok(())
    }
}

impl FromStr for KeySequence {
    type Err = KeyParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut cursor = Cursor::new(input);
        let mut nodes = Vec::new();
        while let Some(ch) = cursor.peek() {
            if ch == '<' {
                nodes.push(parse_group(&mut cursor)?);
            } else {
                cursor.bump();
                nodes.push(char_node(ch));
            }
        }
        if nodes.is_empty() {
            return Err(KeyParseError::new(0, "empty key sequence"));
        }
        Ok(Self { nodes })
    }
}

impl Serialize for KeySequence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for KeySequence {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Character cursor tracking the byte position for error reporting.
struct Cursor<'a> {
    chars: std::str::Chars<'a>,
    position: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars(),
            position: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        self.position += ch.len_utf8();
        Some(ch)
    }
}

fn char_node(ch: char) -> KeyNode {
    if ch == ' ' {
        KeyNode::plain(Key::Special(SpecialKey::Space))
    } else {
        KeyNode::plain(Key::Char(ch))
    }
}

fn parse_group(cursor: &mut Cursor<'_>) -> Result<KeyNode, KeyParseError> {
    let start = cursor.position;
    cursor.bump();
    let mut body = String::new();
    loop {
        match cursor.bump() {
            None => return Err(KeyParseError::new(start, "unterminated '<' group")),
            Some('>') => break,
            Some(ch) => body.push(ch),
        }
    }
    if body.is_empty() {
        return Err(KeyParseError::new(start, "empty '<>' group"));
    }
    parse_group_body(&body, start)
}

fn parse_group_body(body: &str, start: usize) -> Result<KeyNode, KeyParseError> {
    let mut modifiers = Modifiers::default();
    let mut rest = body;
    while let Some((head, tail)) = rest.split_once('-') {
        if tail.is_empty() || !is_modifier(head) {
            break;
        }
        apply_modifier(&mut modifiers, head, start)?;
        rest = tail;
    }
    let key = resolve_key(rest, start)?;
    Ok(KeyNode { modifiers, key })
}

fn is_modifier(segment: &str) -> bool {
    matches!(
        segment,
        "c" | "C" | "a" | "A" | "m" | "M" | "s" | "S"
    )
}

fn apply_modifier(
    modifiers: &mut Modifiers,
    segment: &str,
    start: usize,
) -> Result<(), KeyParseError> {
    let flag = match segment {
        "c" | "C" => &mut modifiers.ctrl,
        "a" | "A" | "m" | "M" => &mut modifiers.alt,
        "s" | "S" => &mut modifiers.shift,
        _ => {
            return Err(KeyParseError::new(
                start,
                format!("unknown modifier '{segment}'"),
            ));
        }
    };
    if *flag {
        return Err(KeyParseError::new(
            start,
            format!("duplicate modifier '{}'", segment.to_ascii_uppercase()),
        ));
    }
    *flag = true;
    Ok(())
}

fn resolve_key(name: &str, start: usize) -> Result<Key, KeyParseError> {
    let mut chars = name.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        return Ok(char_node(ch).key);
    }
    let lower = name.to_ascii_lowercase();
    match lower.as_str() {
        "lt" => return Ok(Key::Char('<')),
        "bar" => return Ok(Key::Char('|')),
        _ => {}
    }
    if let Some(special) = SpecialKey::from_name(&lower) {
        return Ok(Key::Special(special));
    }
    if let Some(digits) = lower.strip_prefix('f') {
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            return match digits.parse::<u8>() {
                Ok(n @ 1..=12) => Ok(Key::Function(n)),
                _ => Err(KeyParseError::new(
                    start,
                    format!("function key F{digits} out of range (F1..F12)"),
                )),
            };
        }
    }
    Err(KeyParseError::new(
        start,
        format!("unknown key name '{lower}'"),
    ))
}
