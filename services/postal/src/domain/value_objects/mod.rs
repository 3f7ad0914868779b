//! 值对象

mod ids;
mod inner_number;
mod postcode;

pub use ids::*;
pub use inner_number::*;
pub use postcode::*;
