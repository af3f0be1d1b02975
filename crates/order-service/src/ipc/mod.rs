//! Bus-facing side of the order service: request publishing and reply routing.

pub mod client;
pub mod dispatcher;

pub use client::{ReplyHandle, RequestReplyClient, RequestState};
pub use dispatcher::ReplyDispatcher;
