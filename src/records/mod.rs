//! Loading localized posts and extracting the image references they declare.

mod loading;
mod references;

pub use loading::{
  LocaleBatch, decode_post, list_record_files, load_locale_records, load_record, read_post_value,
};
pub use references::{extract_references, img_sources};
