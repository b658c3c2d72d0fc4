use fieldwork::Fieldwork;
use serde::de::{self, Deserialize, Deserializer, IgnoredAny, SeqAccess, Visitor};
use std::fmt;

/// A single implementor record from a `trait.impl` or `implementors` file
///
/// On disk this is `[html]` for a regular impl, or
/// `[html, synthetic, [type paths]]` for auto-trait impls that rustdoc
/// synthesised (`Send`, `Unpin`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Fieldwork)]
#[fieldwork(get, with)]
pub struct ImplementorEntry {
    /// Rendered impl header, still HTML-escaped
    html: String,
    /// Whether rustdoc generated this impl rather than finding it in source
    #[field(get = "is_synthetic")]
    synthetic: bool,
    /// Paths of the types a synthetic impl applies to
    types: Vec<String>,
}

impl ImplementorEntry {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            synthetic: false,
            types: Vec::new(),
        }
    }
}

impl<'de> Deserialize<'de> for ImplementorEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(EntryVisitor)
    }
}

struct EntryVisitor;

impl<'de> Visitor<'de> for EntryVisitor {
    type Value = ImplementorEntry;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an implementor array starting with an html string")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let html: String = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let synthetic = seq.next_element::<Flag>()?.is_some_and(|Flag(flag)| flag);
        let types = seq.next_element::<Vec<String>>()?.unwrap_or_default();
        while seq.next_element::<IgnoredAny>()?.is_some() {}

        Ok(ImplementorEntry {
            html,
            synthetic,
            types,
        })
    }
}

/// rustdoc writes the synthetic marker as `0`/`1`; older output used booleans
struct Flag(bool);

impl<'de> Deserialize<'de> for Flag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FlagVisitor;

        impl Visitor<'_> for FlagVisitor {
            type Value = Flag;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("0, 1, or a boolean")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Flag, E> {
                Ok(Flag(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Flag, E> {
                Ok(Flag(v != 0))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Flag, E> {
                Ok(Flag(v != 0))
            }
        }

        deserializer.deserialize_any(FlagVisitor)
    }
}
