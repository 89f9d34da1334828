use std::{process, sync::Arc};

use directions::client::{DirectionsClient, DirectionsCredentials};
use editor::EditorConfig;
use web::{start_web_server, WebState};

#[tokio::main]
async fn main() {
    env_logger::init();

    // config
    let config = EditorConfig::load().unwrap_or_else(|why| {
        log::error!("{}", why);
        process::exit(1);
    });

    // directions
    let directions = DirectionsCredentials::env()
        .and_then(|credentials| DirectionsClient::new(&credentials))
        .unwrap_or_else(|why| {
            log::error!("Could not set up the directions client: {}", why);
            process::exit(1);
        });

    // web server
    if let Err(why) = start_web_server(WebState::new(config, Arc::new(directions))).await {
        log::error!("Web server stopped: {}", why);
        process::exit(1);
    }
}
