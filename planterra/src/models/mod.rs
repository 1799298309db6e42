pub mod audit_event;
pub mod customer;
pub mod draft_item;
pub mod materialized_views;
pub mod plant;
pub mod public_link;
pub mod shortlist;
pub mod user;
pub mod utils;
pub mod version;
pub mod version_item;
