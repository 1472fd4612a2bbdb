//src/main.rs

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    sweetbite::start_server().await
}
