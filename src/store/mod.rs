pub mod memory;
pub mod postgres;
pub mod rename;
pub mod traits;

pub use memory::*;
pub use postgres::*;
pub use rename::*;
pub use traits::*;
