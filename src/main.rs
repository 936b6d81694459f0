#[tokio::main(flavor = "current_thread")]
async fn main() -> groupme_marv::error::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("groupme_marv=info"),
    )
    .init();
    log::info!("Starting groupme-marv bot");

    match groupme_marv::run().await {
        Ok(()) => {
            log::info!("Bot shut down successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Bot encountered an error: {}", e);
            Err(e)
        }
    }
}
