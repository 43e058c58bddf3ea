//! Scale construction from a tonic and a mode

use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Chromatic note names, sharps spelled with `#`.
pub const CHROMATIC: [&str; 12] = [
    "c", "c#", "d", "d#", "e", "f", "f#", "g", "g#", "a", "a#", "b",
];

/// Marker appended once per octave above the tonic.
pub const OCTAVE_MARK: char = '\'';

/// MIDI pitch of an unmarked `c`.
const BASE_PITCH: u32 = 48;

/// Highest MIDI pitch.
const MAX_PITCH: u32 = 127;

/// Musical mode (interval pattern applied to a tonic)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Major,
    Minor,
    Pentatonic,
    Blues,
}

/// Mode table: identifier, accepted names, semitone offsets from the tonic.
const MODES: &[(Mode, &[&str], &[u8])] = &[
    (Mode::Major, &["major", "ionian"], &[0, 2, 4, 5, 7, 9, 11]),
    (
        Mode::Minor,
        &["minor", "natural_minor", "aeolian"],
        &[0, 2, 3, 5, 7, 8, 10],
    ),
    (
        Mode::Pentatonic,
        &["pentatonic", "major_pentatonic"],
        &[0, 2, 4, 7, 9],
    ),
    (Mode::Blues, &["blues"], &[0, 3, 5, 6, 7, 10]),
];

impl Mode {
    /// All modes in table order
    pub fn all() -> impl Iterator<Item = Mode> {
        MODES.iter().map(|(mode, _, _)| *mode)
    }

    // Table rows are in declaration order.
    fn entry(self) -> &'static (Mode, &'static [&'static str], &'static [u8]) {
        &MODES[self as usize]
    }

    /// Semitone offsets from the tonic for one octave
    pub fn intervals(self) -> &'static [u8] {
        self.entry().2
    }

    /// Canonical name of the mode
    pub fn name(self) -> &'static str {
        self.entry().1[0]
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase().replace(['-', ' '], "_");
        MODES
            .iter()
            .find(|(_, names, _)| names.contains(&wanted.as_str()))
            .map(|(mode, _, _)| *mode)
            .ok_or_else(|| Error::InvalidMode(s.to_string()))
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A pitch class, 0 (C) through 11 (B)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PitchClass(u8);

impl PitchClass {
    /// Pitch class from a semitone number, wrapping at the octave
    pub fn new(semitone: u8) -> Self {
        Self(semitone % 12)
    }

    /// Semitones above C
    pub fn semitone(self) -> u8 {
        self.0
    }

    /// Lowercase name with `#` for sharps
    pub fn name(self) -> &'static str {
        CHROMATIC[self.0 as usize]
    }
}

impl FromStr for PitchClass {
    type Err = Error;

    /// Parse `C`, `c#`, `Cis`, `Db`, `Des` and similar spellings.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidKey(s.to_string());
        let lower = s.trim().to_lowercase();
        let mut chars = lower.chars();
        let letter = chars.next().ok_or_else(invalid)?;
        let natural: i8 = match letter {
            'c' => 0,
            'd' => 2,
            'e' => 4,
            'f' => 5,
            'g' => 7,
            'a' => 9,
            'b' => 11,
            _ => return Err(invalid()),
        };
        let shift: i8 = match chars.as_str() {
            "" => 0,
            "#" | "is" => 1,
            "b" | "es" => -1,
            _ => return Err(invalid()),
        };
        Ok(Self((natural + shift).rem_euclid(12) as u8))
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An ordered sequence of note labels built from a tonic and mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scale {
    tonic: PitchClass,
    mode: Mode,
    octaves: usize,
    notes: Vec<String>,
}

impl Scale {
    /// Build a scale spanning `octaves` octaves above `tonic`
    pub fn new(tonic: PitchClass, mode: Mode, octaves: usize) -> Result<Self> {
        if octaves == 0 {
            return Err(Error::InvalidRange {
                name: "octaves",
                value: 0,
                reason: "must be at least 1",
            });
        }

        let notes = semitones(mode, octaves)
            .map(|semitones| {
                let class = (tonic.semitone() as usize + semitones) % 12;
                let mut label = CHROMATIC[class].to_string();
                label.extend(std::iter::repeat(OCTAVE_MARK).take(semitones / 12));
                label
            })
            .collect();

        Ok(Self {
            tonic,
            mode,
            octaves,
            notes,
        })
    }

    /// The tonic this scale was built from
    pub fn tonic(&self) -> PitchClass {
        self.tonic
    }

    /// The mode this scale was built from
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Number of octaves spanned
    pub fn octaves(&self) -> usize {
        self.octaves
    }

    /// Note labels in ascending order
    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// Label at `index`, if inside the scale
    pub fn get(&self, index: usize) -> Option<&str> {
        self.notes.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// MIDI pitch of the highest label once it is read as notation.
    ///
    /// Labels only carry octave marks counted from the tonic, so the
    /// highest pitch is not always the last degree.
    pub fn highest_pitch(&self) -> u32 {
        let tonic = self.tonic.semitone() as usize;
        semitones(self.mode, self.octaves)
            .map(|s| BASE_PITCH + ((tonic + s) % 12) as u32 + 12 * (s / 12) as u32)
            .max()
            .unwrap_or(BASE_PITCH)
    }

    /// Fail with [`Error::InvalidRange`] when a label would land above
    /// MIDI pitch 127.
    pub fn check_midi_range(&self) -> Result<()> {
        if self.highest_pitch() > MAX_PITCH {
            return Err(Error::InvalidRange {
                name: "octaves",
                value: i64::try_from(self.octaves).unwrap_or(i64::MAX),
                reason: "scale climbs above MIDI pitch 127",
            });
        }
        Ok(())
    }
}

/// Semitones above the tonic for every degree, in order.
fn semitones(mode: Mode, octaves: usize) -> impl Iterator<Item = usize> {
    (0..octaves).flat_map(move |octave| {
        mode.intervals()
            .iter()
            .map(move |&offset| offset as usize + 12 * octave)
    })
}

impl Index<usize> for Scale {
    type Output = str;

    fn index(&self, index: usize) -> &str {
        &self.notes[index]
    }
}

/// Build a scale from string parameters, e.g. `build_scale("C", "major", 1)`.
///
/// # Errors
/// * [`Error::InvalidKey`] for an unknown tonic
/// * [`Error::InvalidMode`] for an unknown mode
/// * [`Error::InvalidRange`] when `octaves` is zero
pub fn build_scale(tonic: &str, mode: &str, octaves: usize) -> Result<Scale> {
    let tonic: PitchClass = tonic.parse()?;
    let mode: Mode = mode.parse()?;
    Scale::new(tonic, mode, octaves)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_c_major() {
        let scale = build_scale("C", "major", 1).unwrap();
        assert_eq!(scale.notes(), ["c", "d", "e", "f", "g", "a", "b"]);
    }

    #[test]
    fn test_a_minor() {
        let scale = build_scale("A", "minor", 1).unwrap();
        assert_eq!(scale.notes(), ["a", "b", "c", "d", "e", "f", "g"]);
        assert!(!scale.notes().iter().any(|n| n.contains('#')));
    }

    #[test]
    fn test_d_pentatonic_two_octaves() {
        let scale = build_scale("D", "pentatonic", 2).unwrap();
        assert_eq!(scale.len(), 10);
        assert_eq!(&scale.notes()[..5], ["d", "e", "f#", "a", "b"]);
        assert_eq!(&scale.notes()[5..], ["d'", "e'", "f#'", "a'", "b'"]);
    }

    #[test]
    fn test_octave_mark_follows_semitones_from_tonic() {
        // B major crosses C within the first octave but gets no mark.
        let scale = build_scale("B", "major", 2).unwrap();
        assert_eq!(&scale[1], "c#");
        assert_eq!(&scale[7], "b'");
        assert_eq!(&scale[8], "c#'");
    }

    #[test]
    fn test_blues() {
        let scale = build_scale("c", "blues", 1).unwrap();
        assert_eq!(scale.notes(), ["c", "d#", "f", "f#", "g", "a#"]);
    }

    #[test]
    fn test_lengths_match_patterns() {
        for mode in Mode::all() {
            for octaves in 1..4 {
                let scale = Scale::new(PitchClass::new(5), mode, octaves).unwrap();
                assert_eq!(scale.len(), mode.intervals().len() * octaves);
            }
        }
    }

    #[test]
    fn test_key_spellings() {
        assert_eq!("C#".parse::<PitchClass>().unwrap().semitone(), 1);
        assert_eq!("cis".parse::<PitchClass>().unwrap().semitone(), 1);
        assert_eq!("Db".parse::<PitchClass>().unwrap().semitone(), 1);
        assert_eq!("cb".parse::<PitchClass>().unwrap().semitone(), 11);
        assert_eq!(" g ".parse::<PitchClass>().unwrap().semitone(), 7);
    }

    #[test]
    fn test_mode_table_order() {
        for mode in Mode::all() {
            assert_eq!(mode.entry().0, mode);
        }
    }

    #[test]
    fn test_mode_names() {
        assert_eq!("MAJOR".parse::<Mode>().unwrap(), Mode::Major);
        assert_eq!("natural-minor".parse::<Mode>().unwrap(), Mode::Minor);
        assert_eq!(Mode::Blues.to_string(), "blues");
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            build_scale("H", "major", 1),
            Err(Error::InvalidKey(_))
        ));
        assert!(matches!(build_scale("", "major", 1), Err(Error::InvalidKey(_))));
        assert!(matches!(
            build_scale("C", "lydian", 1),
            Err(Error::InvalidMode(_))
        ));
        assert!(matches!(
            build_scale("C", "major", 0),
            Err(Error::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_highest_pitch() {
        assert_eq!(build_scale("C", "major", 1).unwrap().highest_pitch(), 59);
        // A minor peaks at b; its last degree g has no mark and sits lower.
        assert_eq!(build_scale("A", "minor", 1).unwrap().highest_pitch(), 59);
        assert_eq!(build_scale("C", "major", 6).unwrap().highest_pitch(), 119);
    }

    #[test]
    fn test_check_midi_range() {
        assert!(build_scale("C", "major", 6).unwrap().check_midi_range().is_ok());
        let too_high = build_scale("C", "major", 7).unwrap();
        assert!(matches!(
            too_high.check_midi_range(),
            Err(Error::InvalidRange { name: "octaves", value: 7, .. })
        ));
    }

    #[test]
    fn test_deterministic() {
        let a = build_scale("F#", "minor", 3).unwrap();
        let b = build_scale("f#", "minor", 3).unwrap();
        assert_eq!(a, b);
    }
}
