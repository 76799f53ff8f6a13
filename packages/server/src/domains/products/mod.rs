pub mod lookup;
pub mod models;

pub use lookup::ProductLookup;
pub use models::ProductPriceInfo;
