mod asset_loader_error;
mod matching_error;

pub use asset_loader_error::*;
pub use matching_error::*;
