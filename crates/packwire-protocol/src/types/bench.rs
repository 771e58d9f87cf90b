//! Crafting bench state.

use packwire_codec::{
    wire_enum, CodecError, LayoutContract, PresenceBits, Reader, Record, Writer, MAX_VARINT_LEN,
};
use serde::{Deserialize, Serialize};

use super::{LocalizedLabel, Vector3f};

wire_enum! {
    pub enum BenchKind {
        Workbench = 0,
        Anvil = 1,
        Furnace = 2,
        Alchemy = 3,
        Loom = 4,
    }
}

/// Snapshot of one placed crafting bench.
///
/// Variable fields follow the head in declaration order, with no offset
/// table: `custom_name` (only when set), then `labels`, then
/// `recipe_ids`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchState {
    pub bench_id: i64,
    pub kind: BenchKind,
    pub tier: i16,
    /// Progress of the current craft in `[0, 1]`.
    pub progress: f64,
    pub powered: bool,
    /// Player that placed the bench, if it is private.
    pub owner: Option<u64>,
    pub position: Vector3f,
    pub custom_name: Option<String>,
    pub labels: Vec<LocalizedLabel>,
    pub recipe_ids: Vec<String>,
}

impl BenchState {
    pub const MAX_CUSTOM_NAME_LEN: usize = 64;
    pub const MAX_LABELS: usize = 8;
    pub const MAX_RECIPES: usize = 128;
    pub const MAX_RECIPE_ID_LEN: usize = 64;

    const OWNER_BIT: u16 = 1;
    const CUSTOM_NAME_BIT: u16 = 2;
}

impl Record for BenchState {
    const LAYOUT: LayoutContract = LayoutContract::sequential(
        "BenchState",
        1,
        40,
        3,
        41 + (MAX_VARINT_LEN + Self::MAX_CUSTOM_NAME_LEN)
            + (MAX_VARINT_LEN + Self::MAX_LABELS * LocalizedLabel::LAYOUT.max_size)
            + (MAX_VARINT_LEN + Self::MAX_RECIPES * (MAX_VARINT_LEN + Self::MAX_RECIPE_ID_LEN)),
    );

    fn encode(&self, w: &mut Writer) -> Result<(), CodecError> {
        let frame = w.begin_record(&Self::LAYOUT);
        let mut bits = PresenceBits::new(Self::LAYOUT.presence_bytes);
        bits.set_if(Self::OWNER_BIT, self.owner.is_some());
        bits.set_if(Self::CUSTOM_NAME_BIT, self.custom_name.is_some());
        w.write_presence(&bits);

        w.write_i64(self.bench_id);
        w.write_enum(self.kind);
        w.write_i16(self.tier);
        w.write_f64(self.progress);
        w.write_bool(self.powered);
        w.write_optional_fixed(self.owner.as_ref(), 8, |w, v| {
            w.write_u64(*v);
            Ok(())
        })?;
        w.write_record(&self.position)?;
        frame.finish_head(w);

        if let Some(name) = &self.custom_name {
            w.write_var_string("custom_name", name, Self::MAX_CUSTOM_NAME_LEN)?;
        }
        w.write_array("labels", &self.labels, Self::MAX_LABELS, |w, label| {
            w.write_record(label)
        })?;
        w.write_array("recipe_ids", &self.recipe_ids, Self::MAX_RECIPES, |w, id| {
            w.write_var_string("recipe_id", id, Self::MAX_RECIPE_ID_LEN)
        })
    }

    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        let frame = r.begin_record(&Self::LAYOUT)?;
        let bits = frame.read_presence(r)?;

        let bench_id = r.read_i64()?;
        let kind = r.read_enum::<BenchKind>()?;
        let tier = r.read_i16()?;
        let progress = r.read_f64()?;
        let powered = r.read_bool()?;
        let owner = r.read_optional_fixed(bits.is_set(Self::OWNER_BIT), 8, |r| r.read_u64())?;
        let position = r.read_record::<Vector3f>()?;
        frame.finish_head(r);

        let custom_name = if bits.is_set(Self::CUSTOM_NAME_BIT) {
            Some(r.read_var_string("custom_name", Self::MAX_CUSTOM_NAME_LEN)?)
        } else {
            None
        };
        let labels = r.read_array("labels", Self::MAX_LABELS, |r| {
            r.read_record::<LocalizedLabel>()
        })?;
        let recipe_ids = r.read_array("recipe_ids", Self::MAX_RECIPES, |r| {
            r.read_var_string("recipe_id", Self::MAX_RECIPE_ID_LEN)
        })?;

        Ok(Self {
            bench_id,
            kind,
            tier,
            progress,
            powered,
            owner,
            position,
            custom_name,
            labels,
            recipe_ids,
        })
    }
}
