// Loader and deferred registry for rustdoc's static data files
//
// rustdoc writes trait implementor tables (`trait.impl/`, formerly
// `implementors/`) and search description shards (`search.desc/`) as small
// scripts that either call a registration hook or park their data until the
// hook exists. This crate reads those files and replays that hand-off through
// explicit registries.

pub mod asset;
pub mod asset_path;
pub mod entry;
pub mod formats;
pub mod loader;
pub mod payload;
pub mod registry;


// Re-export commonly used types
pub use asset::{Asset, DescShard, Registries, TraitImplementors};
pub use asset_path::{AssetPath, DescShardPath, TraitPath};
pub use entry::ImplementorEntry;
pub use loader::{AssetLoader, LoadReport};
pub use payload::Payload;
pub use registry::{DeferredRegistry, Registration, Submission};
