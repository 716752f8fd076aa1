pub mod enums;
pub mod disease;
pub mod prediction;

pub use disease::*;
pub use prediction::*;
