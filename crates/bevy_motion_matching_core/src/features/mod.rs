//! Per-frame feature descriptors: pose, trajectory and contacts.

mod contact;
mod pose;
mod trajectory;

pub use contact::*;
pub use pose::*;
pub use trajectory::*;
