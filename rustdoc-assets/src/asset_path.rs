//! What a data file describes, judged by where it sits under the doc root

use anyhow::{Result, bail};
use fieldwork::Fieldwork;
use std::fmt::{self, Display, Formatter};
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

/// Directory holding implementor tables in current rustdoc output
pub const TRAIT_IMPL_DIR: &str = "trait.impl";
/// Directory rustdoc used for implementor tables before `trait.impl`
pub const LEGACY_IMPLEMENTORS_DIR: &str = "implementors";
/// Directory holding search description shards
pub const SEARCH_DESC_DIR: &str = "search.desc";

/// Path of a trait, e.g. `core::convert::From`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Fieldwork)]
#[fieldwork(get)]
pub struct TraitPath {
    /// Module segments leading up to the trait
    module: Vec<String>,
    name: String,
}

impl TraitPath {
    pub fn new(module: Vec<String>, name: impl Into<String>) -> Self {
        Self {
            module,
            name: name.into(),
        }
    }

    /// Build a trait path from a file location relative to an implementor
    /// directory, e.g. `core/convert/trait.From.js`
    pub fn from_relative_file(path: &Path) -> Option<Self> {
        let segments = normal_segments(path)?;
        let (file_name, module) = segments.split_last()?;
        let name = file_name.strip_prefix("trait.")?.strip_suffix(".js")?;
        if name.is_empty() || module.is_empty() {
            return None;
        }

        Some(Self::new(
            module.iter().map(|segment| segment.to_string()).collect(),
            name,
        ))
    }

    /// Where this trait's implementor file lives inside `dir`
    pub fn relative_file(&self, dir: &str) -> PathBuf {
        let mut path = PathBuf::from(dir);
        path.extend(&self.module);
        path.push(format!("trait.{}.js", self.name));
        path
    }

    /// Whether every segment is an identifier, so that
    /// [`relative_file`](Self::relative_file) stays inside its directory
    pub fn is_plain(&self) -> bool {
        self.module
            .iter()
            .chain(std::iter::once(&self.name))
            .all(|segment| is_identifier(segment))
    }

    pub fn krate(&self) -> &str {
        self.module.first().map_or("", String::as_str)
    }
}

impl Display for TraitPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for segment in &self.module {
            write!(f, "{segment}::")?;
        }
        f.write_str(&self.name)
    }
}

impl FromStr for TraitPath {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut segments: Vec<String> = s.split("::").map(str::to_string).collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            bail!("`{s}` contains an empty path segment");
        }
        if let Some(segment) = segments.iter().find(|segment| !is_identifier(segment)) {
            bail!("`{segment}` in `{s}` is not an identifier");
        }
        let name = segments.pop().unwrap_or_default();
        if segments.is_empty() {
            bail!("`{s}` needs at least a crate and a trait name");
        }
        Ok(Self::new(segments, name))
    }
}

/// Location details of a search description shard
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Fieldwork)]
#[fieldwork(get)]
pub struct DescShardPath {
    crate_name: String,
    shard: usize,
    /// `--resource-suffix` rustdoc was run with, usually empty
    suffix: String,
}

impl DescShardPath {
    /// Recognise `<crate>/<crate>-desc-<n>-<suffix>.js`
    pub fn from_relative_file(path: &Path) -> Option<Self> {
        let segments = normal_segments(path)?;
        let [crate_name, file_name] = &segments[..] else {
            return None;
        };

        let (shard, suffix) = file_name
            .strip_prefix(*crate_name)?
            .strip_prefix("-desc-")?
            .strip_suffix(".js")?
            .split_once('-')?;

        Some(Self {
            crate_name: crate_name.to_string(),
            shard: shard.parse().ok()?,
            suffix: suffix.to_string(),
        })
    }
}

/// A recognised data file, without its contents
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AssetPath {
    /// An implementor table; `legacy` is true under `implementors/`
    Implementors { trait_path: TraitPath, legacy: bool },
    DescShard(DescShardPath),
}

impl AssetPath {
    /// Classify a path relative to the doc root
    pub fn classify(relative: &Path) -> Option<Self> {
        let mut components = relative.components();
        let top = match components.next()? {
            Component::Normal(top) => top.to_str()?,
            _ => return None,
        };
        let rest = components.as_path();

        match top {
            TRAIT_IMPL_DIR => TraitPath::from_relative_file(rest).map(|trait_path| {
                Self::Implementors {
                    trait_path,
                    legacy: false,
                }
            }),
            LEGACY_IMPLEMENTORS_DIR => TraitPath::from_relative_file(rest).map(|trait_path| {
                Self::Implementors {
                    trait_path,
                    legacy: true,
                }
            }),
            SEARCH_DESC_DIR => DescShardPath::from_relative_file(rest).map(Self::DescShard),
            _ => None,
        }
    }

    pub fn is_implementors(&self) -> bool {
        matches!(self, Self::Implementors { .. })
    }

    pub fn is_desc_shard(&self) -> bool {
        matches!(self, Self::DescShard(_))
    }
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    chars
        .next()
        .is_some_and(|first| first == '_' || first.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
}

fn normal_segments(path: &Path) -> Option<Vec<&str>> {
    path.components()
        .map(|component| match component {
            Component::Normal(segment) => segment.to_str(),
            _ => None,
        })
        .collect()
}
