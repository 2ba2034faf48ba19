use std::{process::ExitCode, sync::Arc};

use clap::Parser;
use tarpc_echo::{
    EchoServer, TracingLog,
    config::{ServerArgs, ServerConfig},
    logging,
};
use tracing::{error, info};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    let config = match ServerConfig::resolve(ServerArgs::parse()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("echo_server: {err}");
            return ExitCode::FAILURE;
        }
    };
    logging::init(&config.log_level);

    let server = match EchoServer::bind(&config.listen, Arc::new(TracingLog)).await {
        Ok(server) => server,
        Err(err) => {
            error!(error = %err, "cannot start echo server");
            return ExitCode::FAILURE;
        }
    };

    tokio::select! {
        () = server.run() => {}
        result = tokio::signal::ctrl_c() => {
            if let Err(err) = result {
                error!(error = %err, "failed to listen for Ctrl-C");
                return ExitCode::FAILURE;
            }
            info!("received Ctrl-C, shutting down");
        }
    }

    ExitCode::SUCCESS
}
