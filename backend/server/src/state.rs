use std::sync::Arc;

use anyhow::Error;
use tracing::info;

use super::{config::Config, forward::Destination, handler::SubmissionHandler};

pub struct AppState {
    pub config: Config,
    pub handler: SubmissionHandler,
}

impl AppState {
    pub fn new() -> Result<Arc<Self>, Error> {
        let config = Config::load()?;
        let handler = SubmissionHandler::from_config(&config)?;

        match handler.destination() {
            Destination::Endpoint(url) => info!("Forwarding RSVPs to {url}"),
            Destination::Unconfigured => info!("Demo mode, RSVPs will not be forwarded"),
        }

        Ok(Self::from_parts(config, handler))
    }

    pub fn from_parts(config: Config, handler: SubmissionHandler) -> Arc<Self> {
        Arc::new(Self { config, handler })
    }
}
