#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    emitter_replay::init().await
}
