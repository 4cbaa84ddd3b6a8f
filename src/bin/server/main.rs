#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Mail relay server: delivers the emails a host hands over on its send hook

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use global_sender_relay::{
    domain::communication::delivery::{DeliveryConfig, OutboundMailAdapter},
    infrastructure::{
        config::DeliveryArgs,
        email::smtp::SmtpMailer,
        http::{
            servers::http::HttpServer,
            state::{AppConfig, AppState},
            HttpServerConfig,
        },
        logging,
    },
};
use tracing::info;

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
pub struct Args {
    /// The HTTP server configuration
    #[clap(flatten)]
    pub server: HttpServerConfig,

    /// The mail delivery configuration
    #[clap(flatten)]
    pub delivery: DeliveryArgs,
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    logging::init(args.delivery.show_stacktrace);

    let config = AppConfig {
        site_title: args.delivery.site_title.clone(),
    };

    let delivery = DeliveryConfig::try_from(args.delivery).context("invalid mail configuration")?;

    info!(
        smtp = delivery.smtp.enabled,
        host = %delivery.smtp.host,
        force_default_envelope_sender = delivery.forced_sender().is_some(),
        "starting mail relay"
    );

    let mail = OutboundMailAdapter::new(Arc::new(SmtpMailer::new()));
    let state = AppState::new(config, delivery, mail);

    HttpServer::new(&args.server, state)?.run().await
}
