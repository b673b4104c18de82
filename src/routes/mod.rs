pub mod lookup;
pub mod page;
pub mod system;
