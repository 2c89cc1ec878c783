//! GATT constants and payload parsing for the Hatch Rest
//!
//! The Rest exposes a text command characteristic and a feedback
//! characteristic whose payload packs the full device state behind ASCII
//! marker bytes. Parsing is a pure function so it can be tested without a
//! radio.

use uuid::Uuid;

use hatchrest_core::{DeviceError, RestState, Rgb, Sound};

// ----------------------------------------------------------------------------
// GATT Constants
// ----------------------------------------------------------------------------

/// Characteristic accepting ASCII command strings
pub const COMMAND_CHARACTERISTIC_UUID: Uuid =
    Uuid::from_u128(0x02240002_5efd_47eb_9c1a_de53f7a2b232);

/// Characteristic exposing the packed device state
pub const FEEDBACK_CHARACTERISTIC_UUID: Uuid =
    Uuid::from_u128(0x02260002_5efd_47eb_9c1a_de53f7a2b232);

/// Local name prefix the device advertises
pub const ADVERTISED_NAME_PREFIX: &str = "Hatch Rest";

// Feedback payload markers; each field group follows its marker byte
const MARKER_COLOR: u8 = 0x43; // 'C'
const MARKER_SOUND: u8 = 0x53; // 'S'
const MARKER_POWER: u8 = 0x50; // 'P'

// Marker positions within the payload
const COLOR_MARKER_INDEX: usize = 5;
const SOUND_MARKER_INDEX: usize = 10;
const POWER_MARKER_INDEX: usize = 13;
const MIN_FEEDBACK_LEN: usize = 15;

// Power is reported inverted: the program is running when these bits clear
const POWER_OFF_MASK: u8 = 0b1100_0000;

// ----------------------------------------------------------------------------
// Payload Parsing
// ----------------------------------------------------------------------------

/// Parse the feedback characteristic payload into a typed state.
pub fn parse_feedback(payload: &[u8]) -> Result<RestState, DeviceError> {
    if payload.len() < MIN_FEEDBACK_LEN {
        return Err(DeviceError::MalformedPayload {
            reason: format!("feedback payload too short: {} bytes", payload.len()),
        });
    }

    if payload[COLOR_MARKER_INDEX] != MARKER_COLOR
        || payload[SOUND_MARKER_INDEX] != MARKER_SOUND
        || payload[POWER_MARKER_INDEX] != MARKER_POWER
    {
        return Err(DeviceError::MalformedPayload {
            reason: "feedback markers out of place".to_owned(),
        });
    }

    Ok(RestState {
        color: Rgb {
            red: payload[COLOR_MARKER_INDEX + 1],
            green: payload[COLOR_MARKER_INDEX + 2],
            blue: payload[COLOR_MARKER_INDEX + 3],
        },
        brightness: payload[COLOR_MARKER_INDEX + 4],
        sound: Sound::from(payload[SOUND_MARKER_INDEX + 1]),
        volume: payload[SOUND_MARKER_INDEX + 2],
        power: payload[POWER_MARKER_INDEX + 1] & POWER_OFF_MASK == 0,
    })
}

/// Normalize a hardware address for comparison.
pub fn normalize_address(address: &str) -> String {
    address.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feedback(color: [u8; 3], brightness: u8, sound: u8, volume: u8, power: u8) -> Vec<u8> {
        vec![
            0, 0, 0, 0, 0, // header
            MARKER_COLOR,
            color[0],
            color[1],
            color[2],
            brightness,
            MARKER_SOUND,
            sound,
            volume,
            MARKER_POWER,
            power,
        ]
    }

    #[test]
    fn parses_a_running_device() {
        let state = parse_feedback(&feedback([255, 92, 0], 180, 5, 40, 0x00)).unwrap();
        assert_eq!(
            state,
            RestState {
                power: true,
                volume: 40,
                brightness: 180,
                color: Rgb {
                    red: 255,
                    green: 92,
                    blue: 0,
                },
                sound: Sound::Ocean,
            }
        );
    }

    #[test]
    fn power_bits_set_means_off() {
        let state = parse_feedback(&feedback([0, 0, 0], 0, 0, 0, 0xC0)).unwrap();
        assert!(!state.power);

        let state = parse_feedback(&feedback([0, 0, 0], 0, 0, 0, 0x40)).unwrap();
        assert!(!state.power);
    }

    #[test]
    fn low_power_bits_are_ignored() {
        let state = parse_feedback(&feedback([0, 0, 0], 0, 0, 0, 0x3F)).unwrap();
        assert!(state.power);
    }

    #[test]
    fn unknown_sound_index_is_preserved() {
        let state = parse_feedback(&feedback([0, 0, 0], 0, 42, 0, 0)).unwrap();
        assert_eq!(state.sound, Sound::Unknown(42));
    }

    #[test]
    fn short_payload_is_rejected() {
        let err = parse_feedback(&[0; 10]).unwrap_err();
        assert!(matches!(err, DeviceError::MalformedPayload { .. }));
    }

    #[test]
    fn misplaced_markers_are_rejected() {
        let mut payload = feedback([1, 2, 3], 4, 5, 6, 0);
        payload[SOUND_MARKER_INDEX] = 0x58;
        let err = parse_feedback(&payload).unwrap_err();
        assert!(matches!(err, DeviceError::MalformedPayload { .. }));
    }

    #[test]
    fn addresses_normalize_case_and_whitespace() {
        assert_eq!(normalize_address(" aa:bb:cc:dd:ee:ff "), "AA:BB:CC:DD:EE:FF");
    }
}
