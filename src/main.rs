mod config;
mod error;
mod library;
mod logging;
mod runtime;
mod server;
mod stream;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    runtime::run().await
}
