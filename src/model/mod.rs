//! Domain entities mapped onto store rows

pub mod address;
pub mod person;

pub use address::{Address, Region, UnknownRegion};
pub use person::Person;
