#[tokio::main]
async fn main() -> std::io::Result<()> {
    hearme_vitals::run().await
}
