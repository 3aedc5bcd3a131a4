//! Business logic services for the EkoTregu marketplace backend

pub mod category;
pub mod listing;

pub use category::CategoryService;
pub use listing::ListingService;
