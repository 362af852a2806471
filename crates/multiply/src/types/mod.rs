pub mod close;
pub mod market;
pub mod result;

pub use close::*;
pub use market::*;
pub use result::*;
