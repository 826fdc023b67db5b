#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = curricula_api::run().await {
        eprintln!("curricula-api fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
