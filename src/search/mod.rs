pub mod filters;
pub mod pagination;
pub mod presets;
pub mod url_state;

pub use filters::{apply_filters, get_cities_for_state, get_unique_values};
pub use pagination::paginate;
pub use url_state::UrlState;
