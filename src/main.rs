#[tokio::main]
async fn main() {
    sporzo_backend::run().await;
}
