#[tokio::main]
async fn main() {
    if let Err(e) = patient_intel_lib::run().await {
        tracing::error!("Fatal: {e}");
        eprintln!("patient-intel: {e}");
        std::process::exit(1);
    }
}
