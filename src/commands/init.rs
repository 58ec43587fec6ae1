use std::io::{self, Write};

use crate::api::{DataApiClient, YouTubeApi};
use crate::config::{data_dir, ensure_directories, env_file_path, ApiConfig};
use crate::error::{Error, Result};

/// Public channel used to check a key; a lookup costs one quota unit.
const KNOWN_CHANNEL_ID: &str = "UC_x5XG1OV2P6uZZ5FSM9Ttw";

pub async fn run(api_key: Option<String>, force: bool, verify: bool) -> Result<()> {
    let env_file = env_file_path();

    if env_file.exists() && !force {
        println!("Config already exists at {}. Use --force to overwrite.", env_file.display());
        return Ok(());
    }

    let api_key = match api_key {
        Some(key) => key.trim().to_string(),
        None => prompt_for_key()?,
    };

    if api_key.is_empty() {
        return Err(Error::Validation("API key is required".to_string()));
    }

    if verify {
        eprintln!("Checking API key...");
        let client = DataApiClient::new(ApiConfig::from_env_with_key(&api_key)?)?;
        verify_api_key(&client).await?;
    }

    ensure_directories()?;
    std::fs::write(&env_file, format!("YOUTUBE_API_KEY={}\n", api_key))?;

    println!("Config saved to {}", env_file.display());
    println!("Data directory: {}", data_dir().display());

    Ok(())
}

fn prompt_for_key() -> Result<String> {
    print!("Enter your YouTube Data API key: ");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Make one cheap channel lookup; a rejected key surfaces as a config error
pub async fn verify_api_key(api: &dyn YouTubeApi) -> Result<()> {
    match api.channels_by_id(KNOWN_CHANNEL_ID).await {
        Ok(_) => Ok(()),
        Err(Error::Fetch(message)) => {
            Err(Error::Config(format!("API key was rejected: {}", message)))
        }
        Err(e) => Err(e),
    }
}
