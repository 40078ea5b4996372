pub mod donors;
pub mod inventory;
pub mod lookups;
pub mod pos;
