pub mod dealership;
pub mod registry;
