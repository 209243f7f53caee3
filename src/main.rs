use clap::Parser;
use log::info;
use snafu::ErrorCompat;
use std::sync::Arc;
use std::time::Duration;

mod app;
mod args;

use crate::app::data::ElectionData;
use crate::app::geocode::GeocodeClient;
use crate::app::{create_router, AppState};
use election_report::ReportOptions;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

#[tokio::main]
async fn main() {
    let args = args::Args::parse();
    init_logging(args.verbose);

    let data = match ElectionData::load(&args.results, &args.profiles) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Failed to load the election tables: {}", e);
            if let Some(bt) = ErrorCompat::backtrace(&e) {
                eprintln!("trace: {}", bt);
            }
            std::process::exit(1);
        }
    };

    let timeout = Duration::from_secs(args.geocoder_timeout_secs);
    let geocoder = match GeocodeClient::new(&args.geocoder_url, timeout) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to build the geocoding client: {}", e);
            std::process::exit(1);
        }
    };

    let state = AppState {
        data: Arc::new(data),
        geocoder: Arc::new(geocoder),
        options: ReportOptions::DEFAULT,
    };
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind the listening port");
    info!("seatfinder listening on {}", addr);
    axum::serve(listener, app).await.expect("server error");
}
