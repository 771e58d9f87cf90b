//! Item definitions and the abilities they grant.

use indexmap::IndexMap;
use packwire_codec::{
    wire_enum, CodecError, LayoutContract, PresenceBits, Reader, Record, Writer, MAX_VARINT_LEN,
};
use serde::{Deserialize, Serialize};

use super::Vector3f;

// ---------------------------------------------------------------------------
// AbilitySlot
// ---------------------------------------------------------------------------

/// An ability bound to one hotbar slot of an item.
///
/// `cooldown` is an optional fixed-width field: when absent its four
/// bytes are still written, as zeros, so the head stays 6 bytes wide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilitySlot {
    pub slot: u8,
    /// Seconds; `None` uses the ability's own default.
    pub cooldown: Option<f32>,
    pub ability_id: String,
}

impl AbilitySlot {
    pub const MAX_ABILITY_ID_LEN: usize = 64;

    const COOLDOWN_BIT: u16 = 1;
}

impl Record for AbilitySlot {
    const LAYOUT: LayoutContract = LayoutContract::sequential(
        "AbilitySlot",
        1,
        5,
        1,
        6 + MAX_VARINT_LEN + Self::MAX_ABILITY_ID_LEN,
    );

    fn encode(&self, w: &mut Writer) -> Result<(), CodecError> {
        let frame = w.begin_record(&Self::LAYOUT);
        let mut bits = PresenceBits::new(Self::LAYOUT.presence_bytes);
        bits.set_if(Self::COOLDOWN_BIT, self.cooldown.is_some());
        w.write_presence(&bits);

        w.write_u8(self.slot);
        w.write_optional_fixed(self.cooldown.as_ref(), 4, |w, v| {
            w.write_f32(*v);
            Ok(())
        })?;
        frame.finish_head(w);

        w.write_var_string("ability_id", &self.ability_id, Self::MAX_ABILITY_ID_LEN)
    }

    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        let frame = r.begin_record(&Self::LAYOUT)?;
        let bits = frame.read_presence(r)?;

        let slot = r.read_u8()?;
        let cooldown = r.read_optional_fixed(bits.is_set(Self::COOLDOWN_BIT), 4, |r| r.read_f32())?;
        frame.finish_head(r);

        let ability_id = r.read_var_string("ability_id", Self::MAX_ABILITY_ID_LEN)?;
        Ok(Self {
            slot,
            cooldown,
            ability_id,
        })
    }
}

// ---------------------------------------------------------------------------
// ItemDefinition
// ---------------------------------------------------------------------------

wire_enum! {
    /// Drop-table quality tier.
    pub enum ItemQuality {
        Junk = 0,
        Common = 1,
        Uncommon = 2,
        Rare = 3,
        Epic = 4,
        Legendary = 5,
    }
}

/// Full definition of an item type, sent when a client first sees it.
///
/// The widest record in the catalog: two presence bytes (nine optional
/// fields), a 64-byte content hash, an optional nested [`Vector3f`] and
/// an offset table over six variable fields.
///
/// ```text
/// presence (2) │ model_hash (64) │ quality (1) │ max_stack (2)
///              │ durability? (4) │ held_offset? (12) │ weight? (4)
///              │ consumable (1)  │ offset table (6 × 4)
/// ═════════════╪══════════════════════════════════════════════ 114
/// variable     │ name? description? tags? stats? abilities? icon?
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    /// Hex content hash of the item's model asset.
    pub model_hash: String,
    pub quality: ItemQuality,
    pub max_stack: u16,
    pub durability: Option<u32>,
    /// Where the item sits relative to the hand that holds it.
    pub held_offset: Option<Vector3f>,
    pub weight: Option<f32>,
    pub consumable: bool,
    pub name: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    /// Stat modifiers, kept in authoring order.
    pub stats: Option<IndexMap<String, i32>>,
    pub abilities: Option<Vec<AbilitySlot>>,
    /// PNG bytes of the inventory icon.
    pub icon: Option<Vec<u8>>,
}

impl ItemDefinition {
    pub const MODEL_HASH_LEN: usize = 64;
    pub const MAX_NAME_LEN: usize = 256;
    pub const MAX_DESCRIPTION_LEN: usize = 4096;
    pub const MAX_TAGS: usize = 32;
    pub const MAX_TAG_LEN: usize = 64;
    pub const MAX_STATS: usize = 64;
    pub const MAX_STAT_NAME_LEN: usize = 64;
    pub const MAX_ABILITIES: usize = 16;
    pub const MAX_ICON_LEN: usize = 16 * 1024;

    const DURABILITY_BIT: u16 = 1;
    const HELD_OFFSET_BIT: u16 = 2;
    const WEIGHT_BIT: u16 = 3;
    const NAME_BIT: u16 = 4;
    const DESCRIPTION_BIT: u16 = 5;
    const TAGS_BIT: u16 = 6;
    const STATS_BIT: u16 = 7;
    const ABILITIES_BIT: u16 = 8;
    const ICON_BIT: u16 = 9;

    /// Fixed fields before the offset table.
    const FIXED_FIELDS_WIDTH: usize = Self::MODEL_HASH_LEN + 1 + 2 + 4 + 12 + 4 + 1;

    const MAX_VARIABLE_SIZE: usize = (MAX_VARINT_LEN + Self::MAX_NAME_LEN)
        + (MAX_VARINT_LEN + Self::MAX_DESCRIPTION_LEN)
        + (MAX_VARINT_LEN + Self::MAX_TAGS * (MAX_VARINT_LEN + Self::MAX_TAG_LEN))
        + (MAX_VARINT_LEN + Self::MAX_STATS * (MAX_VARINT_LEN + Self::MAX_STAT_NAME_LEN + 4))
        + (MAX_VARINT_LEN + Self::MAX_ABILITIES * AbilitySlot::LAYOUT.max_size)
        + (MAX_VARINT_LEN + Self::MAX_ICON_LEN);
}

impl Record for ItemDefinition {
    const LAYOUT: LayoutContract = LayoutContract::offset_table(
        "ItemDefinition",
        2,
        Self::FIXED_FIELDS_WIDTH + 6 * 4,
        6,
        2 + Self::FIXED_FIELDS_WIDTH,
        2 + Self::FIXED_FIELDS_WIDTH + 6 * 4 + Self::MAX_VARIABLE_SIZE,
    );

    fn encode(&self, w: &mut Writer) -> Result<(), CodecError> {
        let frame = w.begin_record(&Self::LAYOUT);
        let mut bits = PresenceBits::new(Self::LAYOUT.presence_bytes);
        bits.set_if(Self::DURABILITY_BIT, self.durability.is_some());
        bits.set_if(Self::HELD_OFFSET_BIT, self.held_offset.is_some());
        bits.set_if(Self::WEIGHT_BIT, self.weight.is_some());
        bits.set_if(Self::NAME_BIT, self.name.is_some());
        bits.set_if(Self::DESCRIPTION_BIT, self.description.is_some());
        bits.set_if(Self::TAGS_BIT, self.tags.is_some());
        bits.set_if(Self::STATS_BIT, self.stats.is_some());
        bits.set_if(Self::ABILITIES_BIT, self.abilities.is_some());
        bits.set_if(Self::ICON_BIT, self.icon.is_some());
        w.write_presence(&bits);

        w.write_fixed_ascii("model_hash", &self.model_hash, Self::MODEL_HASH_LEN)?;
        w.write_enum(self.quality);
        w.write_u16(self.max_stack);
        w.write_optional_fixed(self.durability.as_ref(), 4, |w, v| {
            w.write_u32(*v);
            Ok(())
        })?;
        w.write_optional_fixed(
            self.held_offset.as_ref(),
            Vector3f::LAYOUT.fixed_block_width,
            |w, v| w.write_record(v),
        )?;
        w.write_optional_fixed(self.weight.as_ref(), 4, |w, v| {
            w.write_f32(*v);
            Ok(())
        })?;
        w.write_bool(self.consumable);

        let slots = frame.reserve_offsets(w);
        let fields = frame.offset_fields(w, slots);
        fields.field(w, 0, self.name.as_deref(), |w, v| {
            w.write_var_string("name", v, Self::MAX_NAME_LEN)
        })?;
        fields.field(w, 1, self.description.as_deref(), |w, v| {
            w.write_var_string("description", v, Self::MAX_DESCRIPTION_LEN)
        })?;
        fields.field(w, 2, self.tags.as_deref(), |w, tags| {
            w.write_array("tags", tags, Self::MAX_TAGS, |w, tag| {
                w.write_var_string("tag", tag, Self::MAX_TAG_LEN)
            })
        })?;
        fields.field(w, 3, self.stats.as_ref(), |w, stats| {
            w.write_map(
                "stats",
                stats,
                Self::MAX_STATS,
                |w, name| w.write_var_string("stat", name, Self::MAX_STAT_NAME_LEN),
                |w, value| {
                    w.write_i32(*value);
                    Ok(())
                },
            )
        })?;
        fields.field(w, 4, self.abilities.as_deref(), |w, abilities| {
            w.write_array("abilities", abilities, Self::MAX_ABILITIES, |w, a| {
                w.write_record(a)
            })
        })?;
        fields.field(w, 5, self.icon.as_deref(), |w, icon| {
            w.write_var_bytes("icon", icon, Self::MAX_ICON_LEN)
        })?;
        Ok(())
    }

    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        let frame = r.begin_record(&Self::LAYOUT)?;
        let bits = frame.read_presence(r)?;

        let model_hash = r.read_fixed_ascii("model_hash", Self::MODEL_HASH_LEN)?;
        let quality = r.read_enum::<ItemQuality>()?;
        let max_stack = r.read_u16()?;
        let durability =
            r.read_optional_fixed(bits.is_set(Self::DURABILITY_BIT), 4, |r| r.read_u32())?;
        let held_offset = r.read_optional_fixed(
            bits.is_set(Self::HELD_OFFSET_BIT),
            Vector3f::LAYOUT.fixed_block_width,
            |r| r.read_record::<Vector3f>(),
        )?;
        let weight = r.read_optional_fixed(bits.is_set(Self::WEIGHT_BIT), 4, |r| r.read_f32())?;
        let consumable = r.read_bool()?;

        let table = frame.read_offsets(r)?;
        let mut fields = frame.offset_fields(r, table);
        let name = fields.field(r, 0, bits.is_set(Self::NAME_BIT), |r| {
            r.read_var_string("name", Self::MAX_NAME_LEN)
        })?;
        let description = fields.field(r, 1, bits.is_set(Self::DESCRIPTION_BIT), |r| {
            r.read_var_string("description", Self::MAX_DESCRIPTION_LEN)
        })?;
        let tags = fields.field(r, 2, bits.is_set(Self::TAGS_BIT), |r| {
            r.read_array("tags", Self::MAX_TAGS, |r| {
                r.read_var_string("tag", Self::MAX_TAG_LEN)
            })
        })?;
        let stats = fields.field(r, 3, bits.is_set(Self::STATS_BIT), |r| {
            r.read_map(
                "stats",
                Self::MAX_STATS,
                |r| r.read_var_string("stat", Self::MAX_STAT_NAME_LEN),
                |r| r.read_i32(),
            )
        })?;
        let abilities = fields.field(r, 4, bits.is_set(Self::ABILITIES_BIT), |r| {
            r.read_array("abilities", Self::MAX_ABILITIES, |r| {
                r.read_record::<AbilitySlot>()
            })
        })?;
        let icon = fields.field(r, 5, bits.is_set(Self::ICON_BIT), |r| {
            r.read_var_bytes("icon", Self::MAX_ICON_LEN)
        })?;
        fields.finish(r);

        Ok(Self {
            model_hash,
            quality,
            max_stack,
            durability,
            held_offset,
            weight,
            consumable,
            name,
            description,
            tags,
            stats,
            abilities,
            icon,
        })
    }
}
