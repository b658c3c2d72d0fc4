use crate::asset_path::{AssetPath, DescShardPath, TraitPath};
use crate::formats::{self, ImplementorStyle, PartsHeader};
use crate::registry::{DeferredRegistry, Submission};
use crate::{ImplementorEntry, Payload};
use anyhow::{Result, ensure};
use fieldwork::Fieldwork;

/// The contents of one implementor file, as handed to a registration handler
#[derive(Debug, Clone, PartialEq, Eq, Fieldwork)]
#[fieldwork(get)]
pub struct TraitImplementors {
    trait_path: TraitPath,
    #[field(copy)]
    style: ImplementorStyle,
    parts: Option<PartsHeader>,
    implementors: Payload<ImplementorEntry>,
}

impl TraitImplementors {
    pub fn parse(trait_path: TraitPath, src: &str) -> Result<Self> {
        let (style, parts, implementors) = formats::parse_implementors(src)?.into_parts();
        Ok(Self {
            trait_path,
            style,
            parts,
            implementors,
        })
    }

    pub fn into_implementors(self) -> Payload<ImplementorEntry> {
        self.implementors
    }
}

/// The contents of one search description shard
#[derive(Debug, Clone, PartialEq, Eq, Fieldwork)]
#[fieldwork(get)]
pub struct DescShard {
    crate_name: String,
    #[field(copy)]
    shard: usize,
    suffix: String,
    descriptions: Vec<String>,
}

impl DescShard {
    /// Decode `src`, checking that the call names the shard its path claims
    pub fn parse(path: &DescShardPath, src: &str) -> Result<Self> {
        let (crate_name, shard, descriptions) = formats::parse_desc_shard(src)?.into_parts();
        ensure!(
            crate_name == path.crate_name() && shard == path.shard(),
            "file is named for {} shard {} but registers {crate_name} shard {shard}",
            path.crate_name(),
            path.shard()
        );

        Ok(Self {
            crate_name,
            shard,
            suffix: path.suffix().to_string(),
            descriptions,
        })
    }

    pub fn into_descriptions(self) -> Vec<String> {
        self.descriptions
    }
}

/// A loaded data file, ready to be submitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Asset {
    Implementors(TraitImplementors),
    DescShard(DescShard),
}

impl Asset {
    pub fn parse(path: &AssetPath, src: &str) -> Result<Self> {
        match path {
            AssetPath::Implementors { trait_path, .. } => {
                TraitImplementors::parse(trait_path.clone(), src).map(Self::Implementors)
            }
            AssetPath::DescShard(shard_path) => {
                DescShard::parse(shard_path, src).map(Self::DescShard)
            }
        }
    }

    /// Hand this asset to the registry for its kind
    pub fn submit(self, registries: &mut Registries<'_>) -> Submission {
        match self {
            Self::Implementors(implementors) => {
                log::debug!("registering implementors of {}", implementors.trait_path());
                registries.implementors.submit(implementors)
            }
            Self::DescShard(shard) => {
                log::debug!(
                    "registering description shard {} of {}",
                    shard.shard(),
                    shard.crate_name()
                );
                registries.desc_shards.submit(shard)
            }
        }
    }
}

/// One registry per kind of data file
///
/// Built once by the caller and passed by reference to every load.
#[derive(Debug, Default)]
pub struct Registries<'a> {
    pub implementors: DeferredRegistry<'a, TraitImplementors>,
    pub desc_shards: DeferredRegistry<'a, DescShard>,
}

impl Registries<'_> {
    pub fn new() -> Self {
        Self::default()
    }
}
