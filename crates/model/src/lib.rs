//! Wire types shared by the Hugging Face inference adaptors.
//!
//! Types in this crate carry no behavior beyond (de)serialization. They are
//! constructed per call by the adaptors in `hf-adaptor`, or by callers that
//! assemble a conversation history.

#![deny(missing_docs)]

mod call;
mod de;
mod message;
mod request;
mod response;
mod tool;

pub use call::*;
pub use message::*;
pub use request::*;
pub use response::*;
pub use tool::*;
