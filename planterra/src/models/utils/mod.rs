pub(crate) use default_callbacks::*;

mod default_callbacks;
pub mod defaults;
