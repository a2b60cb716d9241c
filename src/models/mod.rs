mod ordem;
mod user;

pub use ordem::*;
pub use user::*;
