use crate::api::DataApiClient;
use crate::config::ApiConfig;
use crate::error::Result;
use crate::resolver::resolve;

pub async fn run(channel: &str) -> Result<()> {
    let client = DataApiClient::new(ApiConfig::from_env()?)?;

    eprintln!("Resolving channel...");
    let channel_id = resolve(&client, channel.trim()).await?;

    println!("{}", channel_id);
    Ok(())
}
