pub mod catalog_repo;
pub use catalog_repo::CatalogRepository;
pub mod donor_repo;
pub use donor_repo::DonorRepository;
pub mod inventory_repo;
pub use inventory_repo::InventoryRepository;
pub mod sales_repo;
pub use sales_repo::SalesRepository;
