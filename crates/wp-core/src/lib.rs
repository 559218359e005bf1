pub mod catalog;
pub mod codec;
pub mod id;
pub mod model;

pub use catalog::WindowStyle;
pub use codec::{DecodeError, RECORD_VERSION, decode, encode};
pub use id::{ElementId, IdAllocator, MAX_ELEMENT_ID};
pub use model::*;
