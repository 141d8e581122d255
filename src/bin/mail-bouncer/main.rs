use std::process::ExitCode;
use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use anyhow::{Context, Result};
use clap::Parser;
use mail_bouncer::server::{AppState, configure, cors_headers};
use mail_bouncer::{
    CallbackNotifier, EventSink, TracingSink, ValidationRequest, Validator,
};

mod args;
mod logging;
mod output;

use args::{Cli, Commands, output_format};

#[actix_web::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(cli.log_json)?;

    let sender = cli.sender()?;
    let sink: Arc<dyn EventSink> = Arc::new(TracingSink);
    let validator = Validator::system(cli.probe_options(), sink.clone());

    match &cli.cmd {
        Some(Commands::Check { email, format }) => {
            let format = output_format(format)?;
            let request = ValidationRequest::new(email.as_str(), cli.host.as_str(), sender);
            let result = web::block(move || validator.validate(&request))
                .await
                .context("validation task failed")?;
            println!("{}", output::render(&result, format)?);
            Ok(ExitCode::from(output::exit_status(&result)))
        }
        None => {
            serve(&cli, validator, sink, sender).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn serve(
    cli: &Cli,
    validator: Validator,
    sink: Arc<dyn EventSink>,
    sender: String,
) -> Result<()> {
    let listen = cli.listen_addr()?;
    let state = web::Data::new(AppState::new(
        validator,
        CallbackNotifier::new(sink),
        cli.host.as_str(),
        sender,
    ));

    tracing::info!(listen = %listen, hostname = %cli.host, "Listening");
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(cors_headers())
            .configure(configure)
    })
    .bind(listen.as_str())
    .with_context(|| format!("failed to bind {listen}"))?
    .run()
    .await
    .context("HTTP server failed")
}
