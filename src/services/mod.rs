pub mod fetch;
pub mod log;
pub mod publish;
pub mod store;

pub use fetch::*;
pub use log::*;
pub use publish::*;
pub use store::*;
