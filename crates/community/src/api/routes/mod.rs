pub mod pages;
pub mod session;
pub mod system;

pub use pages::*;
pub use system::*;
