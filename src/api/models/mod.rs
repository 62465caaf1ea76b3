pub mod favorites;
pub mod pokemon;

pub use favorites::*;
pub use pokemon::*;
