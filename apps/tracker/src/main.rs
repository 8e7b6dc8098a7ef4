#[tokio::main]
async fn main() -> anyhow::Result<()> {
    study_tracker::run().await
}
