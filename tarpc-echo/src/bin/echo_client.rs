use std::process::ExitCode;

use clap::Parser;
use tarpc_echo::{
    Client, Message, Result,
    config::{ClientArgs, ClientConfig},
    logging, next_request_id,
};
use tracing::{debug, info};

async fn run(config: &ClientConfig) -> Result<Message> {
    let client = Client::connect(&config.connect, config.timeout).await?;

    let request = Message::new(next_request_id(), config.text.as_str());
    debug!(id = %request.id, "sending echo request");

    let reply = client.echo(request).await?;
    info!(id = %reply.id, msg = %reply.msg, "echo reply");
    Ok(reply)
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    let config = match ClientConfig::resolve(ClientArgs::parse()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("echo_client: {err}");
            return ExitCode::FAILURE;
        }
    };
    logging::init(&config.log_level);

    match run(&config).await {
        Ok(reply) => {
            println!("{}", reply.msg);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("echo_client: {err}");
            ExitCode::FAILURE
        }
    }
}
