//! HTTP handlers for the EkoTregu marketplace backend

pub mod category;
pub mod health;
pub mod listing;

pub use category::list_categories;
pub use health::health_check;
pub use listing::{
    create_listing, delete_listing, get_listing, get_my_listing, list_listings,
    list_my_listings, update_listing,
};
