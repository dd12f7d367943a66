//! `sqlgate ask` - run one request from the command line.

use sqlgate_core::GatewayConfig;

pub async fn run(config: GatewayConfig, message: &str) -> anyhow::Result<()> {
    let gateway = super::build_gateway(&config)?;

    match gateway.handle(message).await {
        Ok(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Err(e) if e.is_client_error() => Err(anyhow::anyhow!("request rejected: {}", e)),
        Err(e) => Err(anyhow::anyhow!("request failed: {}", e)),
    }
}
