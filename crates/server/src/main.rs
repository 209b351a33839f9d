#[tokio::main]
async fn main() -> anyhow::Result<()> {
    castbook_server::start().await
}
