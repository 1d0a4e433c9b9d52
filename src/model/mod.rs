pub mod hierarchy;
pub mod requests;

pub use hierarchy::*;
pub use requests::*;
