use color_eyre::eyre::{bail, WrapErr};
use color_eyre::Result;
use futures::StreamExt;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use gitter_stream::cli::{
    format_message, format_room, format_timestamp, parse_args, version_string, CliCommand, USAGE,
};
use gitter_stream::config::{ClientConfig, TOKEN_ENV};
use gitter_stream::GitterClient;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    match parse_args(std::env::args()) {
        CliCommand::Version => {
            println!("{}", version_string());
            Ok(())
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            Ok(())
        }
        CliCommand::Invalid(reason) => {
            eprintln!("error: {}\n\n{}", reason, USAGE);
            std::process::exit(2);
        }
        CliCommand::Rooms => {
            init_tracing();
            list_rooms(&client_from_env()?).await
        }
        CliCommand::Tail { room_id } => {
            init_tracing();
            tail_room(&client_from_env()?, &room_id).await
        }
    }
}

/// Log to stderr so stdout carries only output. `RUST_LOG` overrides the
/// default `info` filter.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn client_from_env() -> Result<GitterClient> {
    let config = ClientConfig::from_env();
    if config.bearer_token().is_none() {
        bail!("{} is not set", TOKEN_ENV);
    }
    Ok(GitterClient::new(config))
}

async fn list_rooms(client: &GitterClient) -> Result<()> {
    let rooms = match client.rooms().await {
        Ok(rooms) => rooms,
        Err(e) => {
            let hint = e.user_message();
            return Err(e).wrap_err(hint);
        }
    };

    for room in &rooms {
        println!("{}", format_room(room));
    }
    Ok(())
}

async fn tail_room(client: &GitterClient, room_id: &str) -> Result<()> {
    let mut subscription = client.realtime_messages(room_id).subscribe();
    info!(
        room = %room_id,
        started = %format_timestamp(chrono::Utc::now()),
        "tailing room, Ctrl-C to stop"
    );

    loop {
        let next = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
            next = subscription.next() => next,
        };

        match next {
            Some(Ok(message)) => println!("{}", format_message(&message)),
            Some(Err(e)) => {
                subscription.shutdown().await;
                let hint = e.user_message();
                return Err(e).wrap_err(hint);
            }
            None => {
                warn!("stream ended");
                break;
            }
        }
    }

    subscription.shutdown().await;
    Ok(())
}
