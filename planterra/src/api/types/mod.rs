mod action_types;
mod response;

pub use action_types::*;
pub use response::*;
