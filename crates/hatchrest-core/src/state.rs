//! Typed device state for the Hatch Rest

use serde::{Deserialize, Serialize};

// ----------------------------------------------------------------------------
// Sound Programs
// ----------------------------------------------------------------------------

/// Built-in sound programs of the Rest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sound {
    NoSound,
    Stream,
    Noise,
    Dryer,
    Ocean,
    Wind,
    Rain,
    Birds,
    Crickets,
    Brahms,
    Twinkle,
    RockABye,
    /// Program index this library does not know about
    Unknown(u8),
}

impl From<u8> for Sound {
    fn from(value: u8) -> Self {
        match value {
            0 => Sound::NoSound,
            2 => Sound::Stream,
            3 => Sound::Noise,
            4 => Sound::Dryer,
            5 => Sound::Ocean,
            6 => Sound::Wind,
            7 => Sound::Rain,
            9 => Sound::Birds,
            10 => Sound::Crickets,
            11 => Sound::Brahms,
            13 => Sound::Twinkle,
            14 => Sound::RockABye,
            other => Sound::Unknown(other),
        }
    }
}

impl Sound {
    /// Raw program index as the device reports it
    pub fn as_raw(&self) -> u8 {
        match self {
            Sound::NoSound => 0,
            Sound::Stream => 2,
            Sound::Noise => 3,
            Sound::Dryer => 4,
            Sound::Ocean => 5,
            Sound::Wind => 6,
            Sound::Rain => 7,
            Sound::Birds => 9,
            Sound::Crickets => 10,
            Sound::Brahms => 11,
            Sound::Twinkle => 13,
            Sound::RockABye => 14,
            Sound::Unknown(other) => *other,
        }
    }
}

// ----------------------------------------------------------------------------
// Device State
// ----------------------------------------------------------------------------

/// Color of the night light
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

/// State of a Hatch Rest device as of the last successful refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestState {
    /// Whether the light/sound program is running
    pub power: bool,
    /// Audio volume on the raw 0-255 device scale
    pub volume: u8,
    /// Light brightness on the raw 0-255 device scale
    pub brightness: u8,
    /// Night light color
    pub color: Rgb,
    /// Active sound program
    pub sound: Sound,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sound_round_trips_through_raw_index() {
        for raw in 0..=u8::MAX {
            assert_eq!(Sound::from(raw).as_raw(), raw);
        }
    }

    #[test]
    fn unknown_sound_preserves_index() {
        assert_eq!(Sound::from(42), Sound::Unknown(42));
    }
}
