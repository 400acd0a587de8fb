//! Adaptors for Hugging Face style inference endpoints.
//!
//! [`ChatAdaptor`] talks to chat completion endpoints and returns the reply
//! text together with any tool calls the model made. [`QnAAdaptor`] talks to
//! extractive question answering endpoints. Both post JSON through a
//! [`Sender`], which retries `503 Service Unavailable` answers after a fixed
//! interval.
//!
//! ```no_run
//! use hf_adaptor::{AdaptorConfigBuilder, ChatAdaptor, Extractor};
//!
//! # async fn example() -> Result<(), hf_adaptor::Error> {
//! let config = AdaptorConfigBuilder::with_api_key("hf_xxx")
//!     .with_model("meta-llama/Llama-3.1-8B-Instruct")
//!     .with_instruction("You are a helpful assistant.")
//!     .build();
//! let adaptor = ChatAdaptor::new(config, Extractor::Chat);
//! let reply = adaptor.send_request("Hello!").await?;
//! println!("{}", reply.content);
//! # Ok(())
//! # }
//! ```

#[macro_use]
extern crate tracing;

mod chat;
mod config;
mod error;
mod extract;
mod io;
mod proto;
mod qna;
mod sender;

pub use chat::ChatAdaptor;
pub use config::{AdaptorConfig, AdaptorConfigBuilder};
pub use error::{Error, ErrorKind};
pub use extract::{ChatReply, Extractor, extract_chat, extract_raw};
pub use hf_adaptor_model as model;
pub use io::Body;
pub use qna::{QnAAdaptor, QnaExtractor, extract_answers};
pub use sender::Sender;
