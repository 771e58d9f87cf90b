//! Byte-sized enums on the wire.
//!
//! Enums travel as a single byte holding the variant's ordinal. Use the
//! [`wire_enum!`](crate::wire_enum) macro to declare one; it generates the
//! enum, its [`WireEnum`] impl, `Display`/`FromStr`, and the serde impls
//! used by the JSON mapping (name out; case-insensitive name or ordinal
//! in).

use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, Deserializer, Visitor};

/// An enum encoded as one ordinal byte.
pub trait WireEnum: Sized + Copy + 'static {
    /// Enum name, used in error messages.
    const TYPE_NAME: &'static str;

    /// Every variant, in declaration order.
    const VARIANTS: &'static [Self];

    fn ordinal(self) -> u8;

    /// Returns `None` for an ordinal with no matching variant.
    fn from_ordinal(ordinal: u8) -> Option<Self>;

    /// The declared variant name.
    fn name(self) -> &'static str;

    /// Looks a variant up by name, ignoring ASCII case.
    fn from_name(name: &str) -> Option<Self> {
        Self::VARIANTS
            .iter()
            .copied()
            .find(|v| v.name().eq_ignore_ascii_case(name))
    }
}

/// Deserializes a [`WireEnum`] from its name (any case) or its ordinal.
///
/// The `wire_enum!` macro routes its `Deserialize` impl here.
pub fn deserialize_wire_enum<'de, D, E>(deserializer: D) -> Result<E, D::Error>
where
    D: Deserializer<'de>,
    E: WireEnum,
{
    deserializer.deserialize_any(WireEnumVisitor(PhantomData))
}

struct WireEnumVisitor<E>(PhantomData<E>);

impl<E: WireEnum> Visitor<'_> for WireEnumVisitor<E> {
    type Value = E;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a {} name or ordinal", E::TYPE_NAME)
    }

    fn visit_str<Er: de::Error>(self, v: &str) -> Result<E, Er> {
        E::from_name(v).ok_or_else(|| {
            Er::custom(format!("unknown {} variant `{v}`", E::TYPE_NAME))
        })
    }

    fn visit_u64<Er: de::Error>(self, v: u64) -> Result<E, Er> {
        u8::try_from(v)
            .ok()
            .and_then(E::from_ordinal)
            .ok_or_else(|| Er::custom(format!("invalid {} ordinal {v}", E::TYPE_NAME)))
    }

    fn visit_i64<Er: de::Error>(self, v: i64) -> Result<E, Er> {
        match u64::try_from(v) {
            Ok(v) => self.visit_u64(v),
            Err(_) => Err(Er::custom(format!("invalid {} ordinal {v}", E::TYPE_NAME))),
        }
    }
}

/// Declares a byte-sized wire enum.
///
/// ```rust
/// packwire_codec::wire_enum! {
///     /// How loud a sound category is mixed.
///     pub enum Mix {
///         Quiet = 0,
///         Loud = 1,
///     }
/// }
///
/// use packwire_codec::WireEnum;
/// assert_eq!(Mix::Loud.ordinal(), 1);
/// assert_eq!(Mix::from_name("quiet"), Some(Mix::Quiet));
/// assert_eq!("LOUD".parse::<Mix>().unwrap(), Mix::Loud);
/// ```
#[macro_export]
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $ordinal:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant = $ordinal
            ),+
        }

        impl $crate::WireEnum for $name {
            const TYPE_NAME: &'static str = stringify!($name);
            const VARIANTS: &'static [Self] = &[$(Self::$variant),+];

            fn ordinal(self) -> u8 {
                self as u8
            }

            fn from_ordinal(ordinal: u8) -> Option<Self> {
                match ordinal {
                    $($ordinal => Some(Self::$variant),)+
                    _ => None,
                }
            }

            fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant),)+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::WireEnum::name(*self))
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::CodecError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <Self as $crate::WireEnum>::from_name(s).ok_or_else(|| {
                    $crate::CodecError::InvalidValue(format!(
                        "unknown {} variant `{}`",
                        stringify!($name),
                        s
                    ))
                })
            }
        }

        impl $crate::__private::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: $crate::__private::serde::Serializer,
            {
                serializer.serialize_str($crate::WireEnum::name(*self))
            }
        }

        impl<'de> $crate::__private::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: $crate::__private::serde::Deserializer<'de>,
            {
                $crate::wire_enum::deserialize_wire_enum(deserializer)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CodecError, Reader, Writer};

    crate::wire_enum! {
        enum Rarity {
            Common = 0,
            Rare = 1,
            Legendary = 5,
        }
    }

    #[test]
    fn test_ordinals_follow_declaration() {
        assert_eq!(Rarity::Common.ordinal(), 0);
        assert_eq!(Rarity::Legendary.ordinal(), 5);
        assert_eq!(Rarity::from_ordinal(1), Some(Rarity::Rare));
        assert_eq!(Rarity::from_ordinal(2), None);
    }

    #[test]
    fn test_name_lookup_ignores_case() {
        assert_eq!(Rarity::from_name("legendary"), Some(Rarity::Legendary));
        assert_eq!(Rarity::from_name("RARE"), Some(Rarity::Rare));
        assert_eq!(Rarity::from_name("mythic"), None);
        assert_eq!(Rarity::Rare.to_string(), "Rare");
    }

    #[test]
    fn test_from_str_error() {
        let err = "mythic".parse::<Rarity>().unwrap_err();
        assert!(matches!(err, CodecError::InvalidValue(_)));
    }

    #[test]
    fn test_wire_round_trip_and_unknown_ordinal() {
        let mut w = Writer::new();
        w.write_enum(Rarity::Legendary);
        assert_eq!(w.as_bytes(), &[5]);

        let mut r = Reader::new(w.as_bytes());
        assert_eq!(r.read_enum::<Rarity>().unwrap(), Rarity::Legendary);

        let mut r = Reader::new(&[3]);
        assert!(matches!(
            r.read_enum::<Rarity>(),
            Err(CodecError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_json_uses_names_and_accepts_ordinals() {
        assert_eq!(serde_json::to_string(&Rarity::Rare).unwrap(), "\"Rare\"");
        let by_name: Rarity = serde_json::from_str("\"legendary\"").unwrap();
        assert_eq!(by_name, Rarity::Legendary);
        let by_ordinal: Rarity = serde_json::from_str("1").unwrap();
        assert_eq!(by_ordinal, Rarity::Rare);
        assert!(serde_json::from_str::<Rarity>("4").is_err());
        assert!(serde_json::from_str::<Rarity>("-1").is_err());
    }
}
