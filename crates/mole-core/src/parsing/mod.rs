pub mod normalize;
pub mod values;

pub use normalize::normalize_header;
pub use values::parse_metric;
