// Enum fields of a transaction record
// Each is a closed set with a display name used as its wire format.

pub mod product_category;
pub mod location;

pub use product_category::ProductCategory;
pub use location::Location;
