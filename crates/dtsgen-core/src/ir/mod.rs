pub mod shapes;

pub use shapes::*;
