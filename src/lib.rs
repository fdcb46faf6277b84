mod error;
mod rand;
mod request;
#[cfg(feature = "serde")]
mod serde;
mod session;
mod thread_random;

pub use crate::error::*;
pub use crate::rand::*;
pub use crate::request::*;
pub use crate::session::*;
pub use crate::thread_random::*;
