use std::{sync::Arc, time::Duration};

use criterion::{Criterion, criterion_group, criterion_main};
use tarpc_echo::{Client, EchoServer, Message, ReceiptLog};

struct NoLog;

impl ReceiptLog for NoLog {
    fn received(&self, _: Option<std::net::SocketAddr>, _: &Message) {}
}

fn roundtrip_benchmark(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");

    let (client, server) = runtime.block_on(async {
        let server = EchoServer::bind("127.0.0.1:0", Arc::new(NoLog))
            .await
            .expect("bind echo server");
        let addr = server.local_addr().expect("bound address").to_string();
        let server = tokio::spawn(server.run());
        let client = Client::connect(&addr, Duration::from_secs(5))
            .await
            .expect("connect to echo server");
        (client, server)
    });

    c.bench_function("echo_roundtrip", |b| {
        b.to_async(&runtime).iter(|| async {
            let _ = client
                .echo(Message::new("1", "benchmark payload"))
                .await
                .expect("rpc call succeeds");
        });
    });

    server.abort();
}

criterion_group!(benches, roundtrip_benchmark);
criterion_main!(benches);
