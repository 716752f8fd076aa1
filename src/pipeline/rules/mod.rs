pub mod keywords;
pub mod explain;
pub mod scorer;

pub use scorer::*;
