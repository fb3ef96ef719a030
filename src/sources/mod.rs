pub mod genie;
pub mod traits;
pub mod types;

pub use genie::PropertyGenieApi;
pub use traits::ListingSource;
