use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    flatscript_cli::main_entry().await
}
