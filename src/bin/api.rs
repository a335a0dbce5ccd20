pub use sns_hook::api::handler;

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    sns_hook::setup_logging();
    lambda_runtime::run(lambda_runtime::service_fn(handler)).await
}
