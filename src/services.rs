pub mod catalog_service;
pub use catalog_service::CatalogService;
pub mod donor_service;
pub use donor_service::DonorService;
pub mod intake_service;
pub use intake_service::IntakeService;
pub mod pos_service;
pub use pos_service::PosService;
