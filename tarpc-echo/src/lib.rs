//! Echo RPC service over TCP.
//!
//! A client sends a [`Message`], the server returns it unchanged. The service
//! contract lives in [`echo`]; [`EchoServer`] and [`Client`] wrap the TCP
//! plumbing around the tarpc-generated stub.

pub mod client;
pub mod config;
pub mod echo;
pub mod logging;
pub mod server;

mod error;

pub use client::{Client, next_request_id};
pub use echo::{Echo, EchoClient, EchoService, Message, ReceiptLog, TracingLog};
pub use error::{Error, Result};
pub use server::EchoServer;

use tarpc::tokio_serde::formats::Bincode;
use tokio::io::{AsyncRead, AsyncWrite};

/// Creates a tarpc transport over `stream` that frames messages with a length
/// prefix and serializes them with [`Bincode`].
pub fn bincode_transport<S, Item, SinkItem>(
    stream: S,
) -> tarpc::serde_transport::Transport<S, Item, SinkItem, Bincode<Item, SinkItem>>
where
    S: AsyncRead + AsyncWrite,
    Item: for<'de> serde::Deserialize<'de>,
    SinkItem: serde::Serialize,
{
    tarpc::serde_transport::Transport::from((stream, Bincode::default()))
}
