//! Parser for space-separated note tokens
//!
//! Accepts the LilyPond subset emitted by the sonification pipeline:
//! absolute pitches (`c`, `fis'`, `bes,,`), rests (`r`), durations with
//! dots (`4`, `8.`), ties (`~`), octave checks (`c='`) and `{ }` groups.
//! Pitch `c` without marks is MIDI 48.

use tracing::warn;

use super::sequence::{NoteEvent, Sequence, QUARTER};
use crate::error::{Error, Result};

/// Octave of an unmarked pitch.
const BASE_OCTAVE: i32 = 4;

/// A single lexical element
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Open,
    Close,
    Note {
        pitch: u8,
        duration: Option<u32>,
        tie: bool,
    },
    Rest {
        duration: Option<u32>,
    },
}

/// Duration of a LilyPond length marker (`4`, `8.`, `2..`) in 64ths.
fn parse_duration(word: &str, digits: &str, dots: usize) -> Result<u32> {
    let core: u32 = digits
        .parse()
        .map_err(|_| Error::notation(word, "invalid duration"))?;
    if core == 0 {
        return Err(Error::notation(word, "duration must be positive"));
    }
    let dots = dots.min(6) as i32;
    let length = (2.0 - 2f64.powi(-dots)) * 64.0 / core as f64;
    match length as u32 {
        0 => Err(Error::notation(word, "duration shorter than a 64th note")),
        n => Ok(n),
    }
}

/// Cursor over one whitespace-delimited word.
struct Word<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Word<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn eat(&mut self, expected: &str) -> bool {
        if self.text[self.pos..].starts_with(expected) {
            self.pos += expected.len();
            true
        } else {
            false
        }
    }

    fn run_of(&mut self, byte: u8) -> usize {
        let start = self.pos;
        while self.peek() == Some(byte) {
            self.pos += 1;
        }
        self.pos - start
    }

    fn error(&self, reason: &str) -> Error {
        Error::notation(self.text, reason)
    }

    /// `'+` raises, `,+` lowers; returns the signed octave shift.
    fn octave_marks(&mut self) -> i32 {
        match self.run_of(b'\'') {
            0 => -(self.run_of(b',') as i32),
            up => up as i32,
        }
    }

    fn duration(&mut self) -> Result<Option<u32>> {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.pos == start {
            return Ok(None);
        }
        let digits = &self.text[start..self.pos];
        let dots = self.run_of(b'.');
        parse_duration(self.text, digits, dots).map(Some)
    }

    fn tie(&mut self) -> bool {
        self.eat("~")
    }

    fn finish(&self) -> Result<()> {
        if self.pos == self.bytes.len() {
            Ok(())
        } else {
            Err(self.error("unexpected trailing characters"))
        }
    }
}

fn natural_semitone(letter: u8) -> Option<i32> {
    match letter {
        b'c' => Some(0),
        b'd' => Some(2),
        b'e' => Some(4),
        b'f' => Some(5),
        b'g' => Some(7),
        b'a' => Some(9),
        b'b' => Some(11),
        _ => None,
    }
}

/// Lex one word (without braces) into a note or rest token.
fn lex_word(text: &str) -> Result<Token> {
    let mut word = Word::new(text);
    let letter = word.peek().ok_or_else(|| word.error("empty token"))?;
    word.pos += 1;

    if letter == b'r' {
        let duration = word.duration()?;
        // A tie after a rest has nothing to join.
        word.tie();
        word.finish()?;
        return Ok(Token::Rest { duration });
    }

    let natural = natural_semitone(letter).ok_or_else(|| word.error("unknown token"))?;

    let mut accidental = 0;
    if word.eat("is") {
        accidental = 1;
        while word.eat("is") {
            accidental += 1;
        }
    } else if word.eat("es") {
        accidental = -1;
        while word.eat("es") {
            accidental -= 1;
        }
    }

    let mut octave = BASE_OCTAVE + word.octave_marks();
    if word.eat("=") {
        let marks = word.octave_marks();
        if marks == 0 {
            return Err(word.error("octave check needs ' or , marks"));
        }
        let checked = BASE_OCTAVE + marks;
        if checked != octave {
            warn!(token = text, expected = checked, found = octave, "failed octave check");
            octave = checked;
        }
    }

    let duration = word.duration()?;
    let tie = word.tie();
    word.finish()?;

    let pitch = natural + accidental + 12 * octave;
    let pitch = u8::try_from(pitch)
        .ok()
        .filter(|p| *p <= 127)
        .ok_or_else(|| word.error("pitch outside MIDI range"))?;

    Ok(Token::Note {
        pitch,
        duration,
        tie,
    })
}

/// Split the input into tokens. Braces stand alone even without
/// surrounding whitespace, and a detached `~` ties the preceding note.
fn tokenize(input: &str) -> Result<Vec<Token>> {
    let spaced = input.replace('{', " { ").replace('}', " } ");
    let mut tokens = Vec::new();

    for word in spaced.split_whitespace() {
        match word {
            "{" => tokens.push(Token::Open),
            "}" => tokens.push(Token::Close),
            "~" => match tokens.last_mut() {
                Some(Token::Note { tie, .. }) => *tie = true,
                _ => return Err(Error::notation(word, "tie without a preceding note")),
            },
            _ => tokens.push(lex_word(word)?),
        }
    }
    Ok(tokens)
}

/// Note waiting for the tied continuation
struct Pending {
    offset: u32,
    pitch: u8,
    duration: u32,
}

/// Parse a note-token string into a [`Sequence`].
///
/// A missing duration repeats the previous one, starting from a quarter
/// note. Tied notes must share a pitch and merge into one event.
pub fn parse(input: &str) -> Result<Sequence> {
    let mut events = Vec::new();
    let mut offset = 0u32;
    let mut prev_duration = QUARTER;
    let mut depth = 0usize;
    let mut pending: Option<Pending> = None;

    for token in tokenize(input)? {
        match token {
            Token::Open => depth += 1,
            Token::Close => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| Error::notation("}", "unbalanced closing brace"))?;
            }
            Token::Rest { duration } => {
                if let Some(note) = pending.take() {
                    warn!(pitch = note.pitch, "tie followed by a rest");
                    events.push(NoteEvent::new(note.offset, note.pitch, note.duration));
                }
                let duration = duration.unwrap_or(prev_duration);
                offset += duration;
                prev_duration = duration;
            }
            Token::Note {
                pitch,
                duration,
                tie,
            } => {
                let duration = duration.unwrap_or(prev_duration);
                let note = match pending.take() {
                    Some(held) if held.pitch != pitch => {
                        return Err(Error::notation(
                            input,
                            "ties are only supported between notes of the same pitch",
                        ));
                    }
                    Some(held) => Pending {
                        duration: held.duration + duration,
                        ..held
                    },
                    None => Pending {
                        offset,
                        pitch,
                        duration,
                    },
                };
                if tie {
                    pending = Some(note);
                } else {
                    events.push(NoteEvent::new(note.offset, note.pitch, note.duration));
                }
                offset += duration;
                prev_duration = duration;
            }
        }
    }

    if depth != 0 {
        return Err(Error::notation("{", "unclosed brace"));
    }
    if let Some(note) = pending {
        warn!(pitch = note.pitch, "unterminated tie");
        events.push(NoteEvent::new(note.offset, note.pitch, note.duration));
    }

    Ok(Sequence::from_events(events, offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pitches(seq: &Sequence) -> Vec<u8> {
        seq.events().iter().map(|e| e.pitch).collect()
    }

    #[test]
    fn test_parse_scale_tokens() {
        let seq = parse("c e g b r").unwrap();
        assert_eq!(pitches(&seq), vec![48, 52, 55, 59]);
        assert_eq!(seq.events()[1].offset, 16);
        assert_eq!(seq.events()[3].duration, 16);
        // The trailing rest still takes time.
        assert_eq!(seq.length(), 80);
    }

    #[test]
    fn test_accidentals_and_octaves() {
        let seq = parse("cis' fis'' bes, eeses").unwrap();
        assert_eq!(pitches(&seq), vec![61, 78, 46, 50]);
    }

    #[test]
    fn test_durations() {
        assert_eq!(parse_duration("4", "4", 0).unwrap(), 16);
        assert_eq!(parse_duration("8.", "8", 1).unwrap(), 12);
        assert_eq!(parse_duration("2..", "2", 2).unwrap(), 56);
        assert_eq!(parse_duration("1", "1", 0).unwrap(), 64);
        assert!(parse_duration("0", "0", 0).is_err());
        assert!(parse_duration("128", "128", 0).is_err());
    }

    #[test]
    fn test_duration_carries_forward() {
        let seq = parse("c8 d e2 f").unwrap();
        let durations: Vec<u32> = seq.events().iter().map(|e| e.duration).collect();
        assert_eq!(durations, vec![8, 8, 32, 32]);
        assert_eq!(seq.length(), 80);
    }

    #[test]
    fn test_ties_merge() {
        let seq = parse("c4~ c8 d4 ~ d4 ~ d4").unwrap();
        assert_eq!(seq.events().len(), 2);
        assert_eq!(seq.events()[0], NoteEvent::new(0, 48, 24));
        assert_eq!(seq.events()[1], NoteEvent::new(24, 50, 48));
    }

    #[test]
    fn test_tie_between_different_pitches_fails() {
        assert!(matches!(parse("c~ d"), Err(Error::Notation { .. })));
    }

    #[test]
    fn test_octave_check_corrects() {
        let seq = parse("c,=' d='").unwrap();
        assert_eq!(pitches(&seq), vec![60, 62]);
    }

    #[test]
    fn test_braces_flatten() {
        let seq = parse("{c d} {e}").unwrap();
        assert_eq!(pitches(&seq), vec![48, 50, 52]);
        assert_eq!(seq.events()[2].offset, 32);
    }

    #[test]
    fn test_unbalanced_braces() {
        assert!(parse("{ c").is_err());
        assert!(parse("c }").is_err());
    }

    #[test]
    fn test_unknown_tokens() {
        assert!(matches!(parse("h"), Err(Error::Notation { .. })));
        assert!(matches!(parse("c#"), Err(Error::Notation { .. })));
        assert!(parse("~").is_err());
    }

    #[test]
    fn test_pitch_range() {
        assert!(parse("c,,,,,").is_err());
        assert!(parse("g''''''").is_ok());
        assert!(parse("a''''''").is_err());
    }

    #[test]
    fn test_rests_only() {
        let seq = parse("r r4 r2").unwrap();
        assert!(seq.is_silent());
        assert_eq!(seq.length(), 64);
    }

    #[test]
    fn test_empty_input() {
        let seq = parse("").unwrap();
        assert!(seq.is_silent());
        assert_eq!(seq.length(), 0);
    }
}
