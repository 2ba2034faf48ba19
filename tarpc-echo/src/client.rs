use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, Instant},
};

use tarpc::{
    client::{self, RpcError},
    context,
};
use tokio::{net::TcpStream, time::timeout};
use tracing::debug;

use crate::{
    bincode_transport,
    echo::{EchoClient, Message},
    error::{Error, Result},
};

/// Returns a fresh request identifier.
///
/// Identifiers count up from `"1"` for the lifetime of the process.
pub fn next_request_id() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(1);
    COUNTER.fetch_add(1, Ordering::Relaxed).to_string()
}

/// Connected echo client with a per-call timeout.
#[derive(Clone, Debug)]
pub struct Client {
    inner: EchoClient,
    timeout: Duration,
}

impl Client {
    /// Connects to the echo server at `addr`.
    ///
    /// `timeout_after` bounds the connection attempt and, later, every call.
    pub async fn connect(addr: &str, timeout_after: Duration) -> Result<Self> {
        let stream = timeout(timeout_after, TcpStream::connect(addr))
            .await
            .map_err(|_| Error::Timeout(timeout_after))?
            .map_err(|source| Error::Connect {
                addr: addr.to_string(),
                source,
            })?;
        debug!(%addr, "connected");

        let inner = EchoClient::new(client::Config::default(), bincode_transport(stream)).spawn();
        Ok(Self {
            inner,
            timeout: timeout_after,
        })
    }

    /// Sends `message` and waits for the echoed copy.
    pub async fn echo(&self, message: Message) -> Result<Message> {
        let mut ctx = context::current();
        ctx.deadline = Instant::now() + self.timeout;
        let call = self.inner.echo(ctx, message);
        match timeout(self.timeout, call).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(RpcError::DeadlineExceeded)) | Err(_) => Err(Error::Timeout(self.timeout)),
            Ok(Err(err)) => Err(Error::Call(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    fn unused_local_addr() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
        let addr = listener.local_addr().expect("bound address");
        drop(listener);
        addr.to_string()
    }

    #[test]
    fn request_ids_are_fresh() {
        let first: u64 = next_request_id().parse().unwrap();
        let second: u64 = next_request_id().parse().unwrap();
        assert!(first >= 1);
        assert!(second > first);
    }

    #[tokio::test]
    async fn connect_fails_when_nothing_listens() {
        let addr = unused_local_addr();
        match Client::connect(&addr, Duration::from_secs(5)).await {
            Err(Error::Connect { addr: failed, .. }) => assert_eq!(failed, addr),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("connect should fail without a server"),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn call_times_out_when_peer_never_answers() -> Result<()> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("bound address").to_string();
        let silent = tokio::spawn(async move {
            // Hold the connection open without reading from it.
            let (_stream, _) = listener.accept().await.expect("accept");
            std::future::pending::<()>().await;
        });

        let limit = Duration::from_millis(200);
        let client = Client::connect(&addr, limit).await?;
        match client.echo(Message::new("1", "anyone there?")).await {
            Err(Error::Timeout(after)) => assert_eq!(after, limit),
            other => panic!("expected a timeout, got {other:?}"),
        }

        silent.abort();
        Ok(())
    }
}
