//! CRM dashboard API server.
//!
//! Reads configuration from the environment (and `.env` when present), then
//! serves the lead, message and post endpoints.

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match crm_dashboard::state::load_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = crm_dashboard::run(config).await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
