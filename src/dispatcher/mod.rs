//! Request dispatch to registered handlers.
//!
//! The dispatcher owns the handler-id → handler-function table. The
//! registry resolves a request to a [`MatchResult`](crate::MatchResult);
//! the dispatcher turns it into a [`HandlerRequest`], invokes the handler
//! with panic recovery, and returns its [`HandlerResponse`]. Transport
//! concerns (sockets, header parsing, concurrency runtime) live outside
//! this crate.

mod core;

pub use core::{
    DispatchError, Dispatcher, HandlerRequest, HandlerResponse, HeaderVec, MAX_INLINE_HEADERS,
};
