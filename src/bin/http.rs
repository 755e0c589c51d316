#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use gantt_tool::config::{self, HttpConfig};
    use gantt_tool::http_api;

    config::init_tracing();
    let config = HttpConfig::from_env()?;

    println!("gantt-tool HTTP API listening on http://{}", config.addr);
    http_api::serve(config.addr, http_api::AppState::new()).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
