#[tokio::main]
async fn main() -> std::io::Result<()> {
    gridwalk_server::start_server().await
}
