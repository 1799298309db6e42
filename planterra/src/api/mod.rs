pub mod types;

mod customer_api;
mod draft_item_api;
mod plant_api;
mod public_api;
mod request;
mod shortlist_api;

pub use customer_api::*;
pub use draft_item_api::*;
pub use plant_api::*;
pub use public_api::*;
pub use request::*;
pub use shortlist_api::*;
