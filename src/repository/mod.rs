//! Concrete repositories
//!
//! Each repository pairs the generic [`repo_core`] engine with one entity's
//! capability set: its SQL declarations, parameter binders, row extraction
//! and identity accessor. The SQL lives here as constants next to the code
//! that binds and reads it, so a statement and its extractor are always
//! reviewed together.

pub mod addresses;
pub mod people;

pub use addresses::AddressRepository;
pub use people::PeopleRepository;
