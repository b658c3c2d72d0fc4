//! Decoding the JavaScript wrappers rustdoc puts around its data literals
//!
//! Implementor tables come in two layouts:
//!
//! - modern (`trait.impl/`): `var implementors = Object.fromEntries([...]);`
//!   followed by a trailing `//{"start":..,"fragment_lengths":[..]}` comment
//! - legacy (`implementors/`): `var implementors = {...};`, an object literal
//!
//! Both end with the `register_implementors` / `pending_implementors` check.
//! Description shards are a single `searchState.loadedDescShard(..)` call.

use crate::{ImplementorEntry, Payload};
use anyhow::{Context, Result, bail, ensure};
use fieldwork::Fieldwork;
use memchr::memmem;
use serde::Deserialize;
use serde::de::IgnoredAny;

const BINDING: &str = "var implementors = ";
const FROM_ENTRIES: &str = "Object.fromEntries(";
const REGISTER_CHECK: &str = "if (window.register_implementors)";
const REGISTER_CALL: &str = "window.register_implementors(implementors)";
const PENDING_FALLBACK: &str = "window.pending_implementors = implementors";
const DESC_SHARD_CALL: &str = "searchState.loadedDescShard(";

/// Which wrapper an implementor file uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImplementorStyle {
    /// `Object.fromEntries([[name, entries], ...])`
    Modern,
    /// `{name: entries, ...}`
    Legacy,
}

/// Byte layout of the per-crate fragments in a modern implementor file
///
/// rustdoc appends this so later runs can splice one crate's fragment in or
/// out without decoding the rest. `start` is the byte offset of the first
/// fragment; each later length also counts the comma in front of it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Fieldwork)]
#[fieldwork(get)]
pub struct PartsHeader {
    #[field(copy)]
    start: usize,
    fragment_lengths: Vec<usize>,
}

impl PartsHeader {
    /// Slice each crate's `[name, entries]` fragment out of `src`
    pub fn fragments<'s>(&self, src: &'s str) -> Result<Vec<&'s str>> {
        let mut offset = self.start;
        let mut fragments = Vec::with_capacity(self.fragment_lengths.len());

        for (index, &length) in self.fragment_lengths.iter().enumerate() {
            let end = offset
                .checked_add(length)
                .context("fragment length overflows")?;
            let fragment = src
                .get(offset..end)
                .with_context(|| format!("fragment {index} ({offset}..{end}) is out of bounds"))?;
            let fragment = if index == 0 {
                fragment
            } else {
                fragment
                    .strip_prefix(',')
                    .with_context(|| format!("fragment {index} does not start with a comma"))?
            };
            fragments.push(fragment);
            offset = end;
        }

        Ok(fragments)
    }

    /// Check that the fragments name the same crates, in the same order, as
    /// `payload`
    pub fn verify<T>(&self, src: &str, payload: &Payload<T>) -> Result<()> {
        let fragments = self.fragments(src)?;
        ensure!(
            fragments.len() == payload.len(),
            "parts header lists {} fragments but the payload has {} crates",
            fragments.len(),
            payload.len()
        );

        for (index, (fragment, expected)) in fragments.into_iter().zip(payload.names()).enumerate()
        {
            let (name, _): (String, IgnoredAny) = serde_json::from_str(fragment)
                .with_context(|| format!("fragment {index} is not a [name, entries] pair"))?;
            ensure!(
                name == expected,
                "fragment {index} is for `{name}` but the payload has `{expected}` there"
            );
        }

        Ok(())
    }
}

/// A decoded implementor file
#[derive(Debug, Clone, PartialEq, Eq, Fieldwork)]
#[fieldwork(get)]
pub struct ParsedImplementors {
    #[field(copy)]
    style: ImplementorStyle,
    parts: Option<PartsHeader>,
    payload: Payload<ImplementorEntry>,
}

impl ParsedImplementors {
    pub fn into_parts(self) -> (ImplementorStyle, Option<PartsHeader>, Payload<ImplementorEntry>) {
        (self.style, self.parts, self.payload)
    }
}

/// Decode a `trait.impl` or `implementors` file
pub fn parse_implementors(src: &str) -> Result<ParsedImplementors> {
    let (body, parts) = split_parts_header(src)?;

    let literal_start = memmem::find(body.as_bytes(), BINDING.as_bytes())
        .context("no `var implementors = ` binding")?
        + BINDING.len();

    let check = memmem::rfind(body.as_bytes(), REGISTER_CHECK.as_bytes())
        .filter(|&check| check >= literal_start)
        .context("no `window.register_implementors` check after the binding")?;

    let tail = &body[check..];
    ensure!(
        tail.contains(REGISTER_CALL),
        "register_implementors is checked but never called"
    );
    ensure!(
        tail.contains(PENDING_FALLBACK),
        "no pending_implementors fallback"
    );

    let expression = body[literal_start..check].trim_end();
    let expression = expression
        .strip_suffix(';')
        .context("binding is not terminated with `;`")?
        .trim_end();

    let (style, literal) = match expression.strip_prefix(FROM_ENTRIES) {
        Some(call) => (
            ImplementorStyle::Modern,
            call.strip_suffix(')')
                .context("unterminated Object.fromEntries call")?,
        ),
        None => (ImplementorStyle::Legacy, expression),
    };

    let payload: Payload<ImplementorEntry> =
        serde_json::from_str(literal).context("could not decode implementor literal")?;

    if let Some(parts) = &parts {
        parts
            .verify(src, &payload)
            .context("parts header does not match the implementor literal")?;
    }

    log::trace!(
        "decoded {style:?} implementor literal with {} crates",
        payload.len()
    );

    Ok(ParsedImplementors {
        style,
        parts,
        payload,
    })
}

/// Separate a trailing `//{...}` parts header from the script
fn split_parts_header(src: &str) -> Result<(&str, Option<PartsHeader>)> {
    let Some((body, last_line)) = src.trim_end().rsplit_once('\n') else {
        return Ok((src, None));
    };

    match last_line.strip_prefix("//") {
        Some(header) => {
            let header = serde_json::from_str(header).context("malformed parts header")?;
            Ok((body, Some(header)))
        }
        None => Ok((src, None)),
    }
}

/// A decoded `search.desc` shard
#[derive(Debug, Clone, PartialEq, Eq, Fieldwork)]
#[fieldwork(get)]
pub struct ParsedDescShard {
    crate_name: String,
    #[field(copy)]
    shard: usize,
    descriptions: Vec<String>,
}

impl ParsedDescShard {
    pub fn into_parts(self) -> (String, usize, Vec<String>) {
        (self.crate_name, self.shard, self.descriptions)
    }
}

/// Decode a `searchState.loadedDescShard(crate, shard, text)` file
///
/// The text is split on newlines the same way the search page does, so an
/// empty string is a single empty description.
pub fn parse_desc_shard(src: &str) -> Result<ParsedDescShard> {
    let args_start = memmem::find(src.as_bytes(), DESC_SHARD_CALL.as_bytes())
        .context("no searchState.loadedDescShard call")?
        + DESC_SHARD_CALL.len();

    let args = src[args_start..].trim_end();
    let args = args.strip_suffix(';').map_or(args, str::trim_end);
    let Some(args) = args.strip_suffix(')') else {
        bail!("unterminated loadedDescShard call");
    };

    let (crate_name, shard, text): (String, usize, String) =
        serde_json::from_str(&format!("[{args}]"))
            .context("loadedDescShard arguments are not (crate, shard, text)")?;

    Ok(ParsedDescShard {
        crate_name,
        shard,
        descriptions: text.split('\n').map(String::from).collect(),
    })
}

#[cfg(test)]
mod tests;
