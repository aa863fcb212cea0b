use provision::config::Config;
use provision::core::credentials::HUB_TOKEN_KEY;
use provision::core::{CredentialStore, ProvisionError, ProvisionResult};
use provision::hub::HubClient;
use std::io::{self, Write};

pub async fn run(config: &Config, token: Option<String>) -> ProvisionResult<()> {
    let token = match token {
        Some(token) => token.trim().to_string(),
        None => {
            println!("Artifact Hub Login");
            print!("Access token: ");
            io::stdout().flush()?;
            let mut token = String::new();
            io::stdin().read_line(&mut token)?;
            token.trim().to_string()
        }
    };

    if token.is_empty() {
        return Err(ProvisionError::Auth("Token cannot be empty".to_string()));
    }

    HubClient::authenticate(&config.hub_endpoint, &token).await?;
    CredentialStore::store(HUB_TOKEN_KEY, &token)?;

    println!("✓ Token verified and stored securely");
    Ok(())
}

pub fn logout() -> ProvisionResult<()> {
    if !CredentialStore::exists(HUB_TOKEN_KEY) {
        println!("No stored token");
        return Ok(());
    }

    CredentialStore::delete(HUB_TOKEN_KEY)?;
    println!("✓ Stored token removed");
    Ok(())
}
