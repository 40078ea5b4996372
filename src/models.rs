pub mod catalog;
pub mod donor;
pub mod inventory;
pub mod sales;
