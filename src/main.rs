#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    rpp_generator::run().await
}
