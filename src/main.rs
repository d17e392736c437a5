#[tokio::main]
async fn main() {
    survey_api::start_server().await;
}
