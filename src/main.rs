use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    forgefolio::cli::run().await
}
