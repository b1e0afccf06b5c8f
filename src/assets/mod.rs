//! Helpers for listing asset folders and matching image references against them.
//!
//! Listing, file name normalisation and tiered matching live in separate submodules so
//! each can be tested with plain inputs. Only [`list_asset_files`] touches the filesystem.

mod listing;
mod matcher;
mod names;

pub use listing::list_asset_files;
pub use matcher::AssetPools;
pub use names::{image_basename, image_extension, image_stem};
