//! Loading data files from a documentation output directory

use crate::asset::{Asset, Registries};
use crate::asset_path::{AssetPath, LEGACY_IMPLEMENTORS_DIR, TRAIT_IMPL_DIR, TraitPath};
use crate::registry::Submission;
use anyhow::{Context, Result, bail};
use fieldwork::Fieldwork;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Finds, decodes and submits the data files under a doc root
#[derive(Debug, Clone, Fieldwork)]
#[fieldwork(get, with)]
pub struct AssetLoader {
    /// Documentation output directory, e.g. `target/doc`
    #[field(with = false)]
    root: PathBuf,
    /// Load `trait.impl/` and `implementors/` files
    #[field(get = "includes_implementors")]
    include_implementors: bool,
    /// Load `search.desc/` shards
    #[field(get = "includes_desc_shards")]
    include_desc_shards: bool,
    /// Fail on the first file that cannot be decoded instead of skipping it
    #[field(get = "is_strict")]
    strict: bool,
}

/// Tally of one [`AssetLoader::load`] run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Fieldwork)]
#[fieldwork(get)]
pub struct LoadReport {
    /// Handed straight to an installed handler
    delivered: usize,
    /// Parked in a pending slot
    deferred: usize,
    /// Deferred over an earlier, never consumed payload
    replaced: usize,
    /// Not decodable; only non-zero outside strict mode
    skipped: usize,
}

impl LoadReport {
    fn record(&mut self, submission: Submission) {
        match submission {
            Submission::Delivered => self.delivered += 1,
            Submission::Deferred { replaced } => {
                self.deferred += 1;
                if replaced {
                    self.replaced += 1;
                }
            }
        }
    }

    /// Number of files that were submitted
    pub fn submitted(&self) -> usize {
        self.delivered + self.deferred
    }
}

impl AssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            include_implementors: true,
            include_desc_shards: true,
            strict: false,
        }
    }

    fn wants(&self, asset_path: &AssetPath) -> bool {
        match asset_path {
            AssetPath::Implementors { .. } => self.include_implementors,
            AssetPath::DescShard(_) => self.include_desc_shards,
        }
    }

    /// Every recognised data file under the root, ordered by path
    pub fn discover(&self) -> Result<Vec<(PathBuf, AssetPath)>> {
        self.discover_counting_skips().map(|(found, _)| found)
    }

    fn discover_counting_skips(&self) -> Result<(Vec<(PathBuf, AssetPath)>, usize)> {
        if !self.root.is_dir() {
            bail!("{} is not a directory", self.root.display());
        }

        let mut found = vec![];
        let mut skipped = 0;
        for entry in WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) if self.strict => {
                    return Err(error)
                        .with_context(|| format!("could not walk {}", self.root.display()));
                }
                Err(error) => {
                    log::warn!("skipping unreadable entry under {}: {error}", self.root.display());
                    skipped += 1;
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };

            match AssetPath::classify(relative) {
                Some(asset_path) if self.wants(&asset_path) => {
                    found.push((entry.into_path(), asset_path));
                }
                Some(_) => log::trace!("{} is excluded", relative.display()),
                None => log::trace!("ignoring {}", relative.display()),
            }
        }

        found.sort_by(|(a, _), (b, _)| a.cmp(b));
        log::debug!(
            "found {} data files under {}",
            found.len(),
            self.root.display()
        );
        Ok((found, skipped))
    }

    /// Decode every discovered file, in discovery order
    pub fn read(&self) -> Result<Vec<Asset>> {
        self.read_counting_skips().map(|(assets, _)| assets)
    }

    fn read_counting_skips(&self) -> Result<(Vec<Asset>, usize)> {
        let (found, mut skipped) = self.discover_counting_skips()?;
        let decoded: Vec<_> = found
            .into_par_iter()
            .map(|(path, asset_path)| {
                let asset = read_asset(&path, &asset_path);
                (path, asset)
            })
            .collect();

        let mut assets = Vec::with_capacity(decoded.len());
        for (path, asset) in decoded {
            match asset {
                Ok(asset) => assets.push(asset),
                Err(error) if self.strict => return Err(error),
                Err(error) => {
                    log::warn!("skipping {}: {error:#}", path.display());
                    skipped += 1;
                }
            }
        }

        Ok((assets, skipped))
    }

    /// Decode every data file and submit each one, in path order, to the
    /// registry for its kind
    pub fn load(&self, registries: &mut Registries<'_>) -> Result<LoadReport> {
        let (assets, skipped) = self.read_counting_skips()?;
        let mut report = LoadReport {
            skipped,
            ..LoadReport::default()
        };

        for asset in assets {
            report.record(asset.submit(registries));
        }

        log::debug!("{report:?}");
        Ok(report)
    }

    /// Load the implementor file for a single trait, the way that trait's
    /// page would
    ///
    /// Returns `Ok(None)` when no crate in this output implements the trait.
    pub fn load_trait(
        &self,
        trait_path: &TraitPath,
        registries: &mut Registries<'_>,
    ) -> Result<Option<Submission>> {
        if !trait_path.is_plain() {
            bail!("{trait_path} is not a plain trait path");
        }

        for (dir, legacy) in [(TRAIT_IMPL_DIR, false), (LEGACY_IMPLEMENTORS_DIR, true)] {
            let path = self.root.join(trait_path.relative_file(dir));
            if !path.is_file() {
                continue;
            }

            let asset_path = AssetPath::Implementors {
                trait_path: trait_path.clone(),
                legacy,
            };
            let asset = read_asset(&path, &asset_path)?;
            return Ok(Some(asset.submit(registries)));
        }

        log::debug!("no implementor file for {trait_path}");
        Ok(None)
    }
}

fn read_asset(path: &Path, asset_path: &AssetPath) -> Result<Asset> {
    let src = std::fs::read_to_string(path)
        .with_context(|| format!("could not read {}", path.display()))?;
    Asset::parse(asset_path, &src).with_context(|| format!("could not decode {}", path.display()))
}
