pub mod system;
pub mod text;

pub use system::*;
pub use text::*;
