pub mod enums;
pub mod screening;
pub mod user;

pub use enums::*;
pub use screening::*;
pub use user::*;
