//! Ambient audio settings.

use packwire_codec::{wire_enum, CodecError, LayoutContract, PresenceBits, Reader, Record, Writer};
use serde::{Deserialize, Serialize};

wire_enum! {
    /// Mixer bus a sound plays on.
    pub enum SoundCategory {
        Music = 0,
        Ambient = 1,
        Sfx = 2,
        Ui = 3,
        Voice = 4,
    }
}

/// Background audio for a zone.
///
/// ```text
/// presence │ volume f32 │ category u8 ║ track (VarInt string, if set)
///   1 B    │    4 B     │    1 B      ║
/// ```
///
/// `track` is the only variable field, so it is written sequentially
/// right at `variable_block_start`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmbientAudio {
    /// Asset path of the looping track; `None` keeps whatever plays now.
    pub track: Option<String>,
    pub volume: f32,
    pub category: SoundCategory,
}

impl AmbientAudio {
    pub const MAX_TRACK_LEN: usize = 4096;

    const TRACK_BIT: u16 = 1;
}

impl Record for AmbientAudio {
    const LAYOUT: LayoutContract = LayoutContract::sequential(
        "AmbientAudio",
        1,
        5,
        1,
        6 + packwire_codec::MAX_VARINT_LEN + Self::MAX_TRACK_LEN,
    );

    fn encode(&self, w: &mut Writer) -> Result<(), CodecError> {
        let frame = w.begin_record(&Self::LAYOUT);
        let mut bits = PresenceBits::new(Self::LAYOUT.presence_bytes);
        bits.set_if(Self::TRACK_BIT, self.track.is_some());
        w.write_presence(&bits);

        w.write_f32(self.volume);
        w.write_enum(self.category);
        frame.finish_head(w);

        if let Some(track) = &self.track {
            w.write_var_string("track", track, Self::MAX_TRACK_LEN)?;
        }
        Ok(())
    }

    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        let frame = r.begin_record(&Self::LAYOUT)?;
        let bits = frame.read_presence(r)?;

        let volume = r.read_f32()?;
        let category = r.read_enum::<SoundCategory>()?;
        frame.finish_head(r);

        let track = if bits.is_set(Self::TRACK_BIT) {
            Some(r.read_var_string("track", Self::MAX_TRACK_LEN)?)
        } else {
            None
        };
        Ok(Self {
            track,
            volume,
            category,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packwire_codec::{deserialize, serialize};

    #[test]
    fn test_layout_is_valid() {
        AmbientAudio::LAYOUT.validate().unwrap();
        assert_eq!(AmbientAudio::LAYOUT.variable_block_start, 6);
    }

    #[test]
    fn test_absent_track_encodes_head_only() {
        let audio = AmbientAudio {
            track: None,
            volume: 0.5,
            category: SoundCategory::Ambient,
        };
        let bytes = serialize(&audio).unwrap();
        assert_eq!(bytes, vec![0x00, 0x00, 0x00, 0x00, 0x3F, 0x01]);
        assert_eq!(bytes.len(), AmbientAudio::LAYOUT.variable_block_start);
        assert_eq!(deserialize::<AmbientAudio>(&bytes).unwrap(), audio);
    }

    #[test]
    fn test_present_track_round_trip() {
        let audio = AmbientAudio {
            track: Some("music/zone1/forest_day.ogg".into()),
            volume: 0.8,
            category: SoundCategory::Music,
        };
        let bytes = serialize(&audio).unwrap();
        assert_eq!(bytes[0], 0x01);
        assert_eq!(deserialize::<AmbientAudio>(&bytes).unwrap(), audio);
    }

    #[test]
    fn test_unknown_category_is_malformed() {
        let bytes = [0x00, 0x00, 0x00, 0x00, 0x3F, 0x09];
        let err = deserialize::<AmbientAudio>(&bytes).unwrap_err();
        assert!(matches!(err, CodecError::MalformedInput(_)));
    }

    #[test]
    fn test_category_json_is_case_insensitive() {
        let audio: AmbientAudio = serde_json::from_str(
            r#"{ "track": null, "volume": 1.0, "category": "sFX" }"#,
        )
        .unwrap();
        assert_eq!(audio.category, SoundCategory::Sfx);

        let json = serde_json::to_value(&audio).unwrap();
        assert_eq!(json["category"], "Sfx");
    }
}
