use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    launchkit::run().await
}
