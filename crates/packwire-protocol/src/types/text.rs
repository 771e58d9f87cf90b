//! Text-bearing messages: localized labels and chat.

use packwire_codec::{
    read_offset_field, wire_enum, CodecError, LayoutContract, PresenceBits, Reader, Record,
    Writer, MAX_VARINT_LEN,
};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// LocalizedLabel
// ---------------------------------------------------------------------------

/// Display name and description of a game object.
///
/// Both fields are optional and offset-addressed, so a client listing
/// names can pull just the name out of a buffer with
/// [`LocalizedLabel::peek_name`] and never parse the description.
///
/// ```text
/// presence │ name offset i32 │ description offset i32 ║ variable block
///   1 B    │       4 B       │          4 B           ║
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LocalizedLabel {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl LocalizedLabel {
    pub const MAX_NAME_LEN: usize = 256;
    pub const MAX_DESCRIPTION_LEN: usize = 4096;

    const NAME_BIT: u16 = 1;
    const DESCRIPTION_BIT: u16 = 2;

    /// Decodes only the name from an encoded label.
    ///
    /// # Errors
    /// Decode errors of the head or the name field only.
    pub fn peek_name(bytes: &[u8]) -> Result<Option<String>, CodecError> {
        read_offset_field(bytes, &Self::LAYOUT, 0, Some(Self::NAME_BIT), |r| {
            r.read_var_string("name", Self::MAX_NAME_LEN)
        })
    }
}

impl Record for LocalizedLabel {
    const LAYOUT: LayoutContract = LayoutContract::offset_table(
        "LocalizedLabel",
        1,
        8,
        2,
        1,
        9 + (MAX_VARINT_LEN + Self::MAX_NAME_LEN)
            + (MAX_VARINT_LEN + Self::MAX_DESCRIPTION_LEN),
    );

    fn encode(&self, w: &mut Writer) -> Result<(), CodecError> {
        let frame = w.begin_record(&Self::LAYOUT);
        let mut bits = PresenceBits::new(Self::LAYOUT.presence_bytes);
        bits.set_if(Self::NAME_BIT, self.name.is_some());
        bits.set_if(Self::DESCRIPTION_BIT, self.description.is_some());
        w.write_presence(&bits);

        let slots = frame.reserve_offsets(w);
        let fields = frame.offset_fields(w, slots);
        fields.field(w, 0, self.name.as_deref(), |w, name| {
            w.write_var_string("name", name, Self::MAX_NAME_LEN)
        })?;
        fields.field(w, 1, self.description.as_deref(), |w, text| {
            w.write_var_string("description", text, Self::MAX_DESCRIPTION_LEN)
        })?;
        Ok(())
    }

    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        let frame = r.begin_record(&Self::LAYOUT)?;
        let bits = frame.read_presence(r)?;
        let table = frame.read_offsets(r)?;

        let mut fields = frame.offset_fields(r, table);
        let name = fields.field(r, 0, bits.is_set(Self::NAME_BIT), |r| {
            r.read_var_string("name", Self::MAX_NAME_LEN)
        })?;
        let description = fields.field(r, 1, bits.is_set(Self::DESCRIPTION_BIT), |r| {
            r.read_var_string("description", Self::MAX_DESCRIPTION_LEN)
        })?;
        fields.finish(r);

        Ok(Self { name, description })
    }
}

// ---------------------------------------------------------------------------
// ChatMessage
// ---------------------------------------------------------------------------

wire_enum! {
    /// Which audience a chat line is delivered to.
    pub enum ChatChannel {
        Global = 0,
        Party = 1,
        Whisper = 2,
        System = 3,
    }
}

/// One line of chat.
///
/// The text uses a fixed 32-bit length prefix rather than a VarInt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: u64,
    pub channel: ChatChannel,
    /// Milliseconds since the server started.
    pub sent_at: i64,
    pub text: String,
}

impl ChatMessage {
    pub const MAX_TEXT_LEN: usize = 256;
}

impl Record for ChatMessage {
    const LAYOUT: LayoutContract =
        LayoutContract::sequential("ChatMessage", 0, 17, 1, 17 + 4 + Self::MAX_TEXT_LEN);

    fn encode(&self, w: &mut Writer) -> Result<(), CodecError> {
        let frame = w.begin_record(&Self::LAYOUT);
        w.write_u64(self.sender);
        w.write_enum(self.channel);
        w.write_i64(self.sent_at);
        frame.finish_head(w);
        w.write_string("text", &self.text, Self::MAX_TEXT_LEN)
    }

    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        let frame = r.begin_record(&Self::LAYOUT)?;
        let sender = r.read_u64()?;
        let channel = r.read_enum::<ChatChannel>()?;
        let sent_at = r.read_i64()?;
        frame.finish_head(r);
        let text = r.read_string("text", Self::MAX_TEXT_LEN)?;
        Ok(Self {
            sender,
            channel,
            sent_at,
            text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packwire_codec::{deserialize, serialize};

    #[test]
    fn test_layouts_are_valid() {
        LocalizedLabel::LAYOUT.validate().unwrap();
        ChatMessage::LAYOUT.validate().unwrap();
    }

    #[test]
    fn test_label_with_only_description() {
        let label = LocalizedLabel {
            name: None,
            description: Some("ok".into()),
        };
        let bytes = serialize(&label).unwrap();
        assert_eq!(
            bytes,
            vec![
                0x02, // presence: bit 2
                0xFF, 0xFF, 0xFF, 0xFF, // name offset -1
                0x00, 0x00, 0x00, 0x00, // description offset 0
                0x02, b'o', b'k',
            ]
        );
        assert_eq!(deserialize::<LocalizedLabel>(&bytes).unwrap(), label);
    }

    #[test]
    fn test_label_empty() {
        let bytes = serialize(&LocalizedLabel::default()).unwrap();
        assert_eq!(bytes, vec![0, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(
            deserialize::<LocalizedLabel>(&bytes).unwrap(),
            LocalizedLabel::default()
        );
    }

    #[test]
    fn test_peek_name_skips_description() {
        let label = LocalizedLabel {
            name: Some("Iron Sword".into()),
            description: Some("A plain blade.".into()),
        };
        let bytes = serialize(&label).unwrap();
        assert_eq!(
            LocalizedLabel::peek_name(&bytes).unwrap().as_deref(),
            Some("Iron Sword")
        );

        let only_description = LocalizedLabel {
            name: None,
            description: Some("x".into()),
        };
        let bytes = serialize(&only_description).unwrap();
        assert_eq!(LocalizedLabel::peek_name(&bytes).unwrap(), None);
    }

    #[test]
    fn test_label_offset_minus_one_wins_over_presence_bit() {
        // Presence bit says "name present" but its offset is -1: the
        // sentinel is authoritative and nothing is dereferenced.
        let bytes = [0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF];
        let label = deserialize::<LocalizedLabel>(&bytes).unwrap();
        assert_eq!(label, LocalizedLabel::default());
    }

    #[test]
    fn test_label_offset_out_of_bounds_is_malformed() {
        let bytes = [0x01, 0x40, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF];
        let err = deserialize::<LocalizedLabel>(&bytes).unwrap_err();
        assert!(matches!(err, CodecError::MalformedInput(_)));
    }

    #[test]
    fn test_chat_message_uses_u32_prefix() {
        let msg = ChatMessage {
            sender: 7,
            channel: ChatChannel::Party,
            sent_at: 15_000,
            text: "gg".into(),
        };
        let bytes = serialize(&msg).unwrap();
        assert_eq!(bytes.len(), 17 + 4 + 2);
        assert_eq!(&bytes[17..21], &[2, 0, 0, 0]);
        assert_eq!(deserialize::<ChatMessage>(&bytes).unwrap(), msg);
    }

    #[test]
    fn test_chat_message_too_long() {
        let msg = ChatMessage {
            sender: 1,
            channel: ChatChannel::Global,
            sent_at: 0,
            text: "a".repeat(ChatMessage::MAX_TEXT_LEN + 1),
        };
        assert!(matches!(
            serialize(&msg),
            Err(CodecError::FieldTooLarge { field: "text", .. })
        ));
    }
}
