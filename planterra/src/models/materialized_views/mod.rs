pub mod shortlists_by_customer;

pub use shortlists_by_customer::ShortlistsByCustomer;
