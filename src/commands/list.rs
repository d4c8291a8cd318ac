use crate::commands::{Credentials, LoggedIn};
use crate::core::client::StoreClient;
use crate::core::config::Config;
use crate::error::Result;

pub fn list_items(credentials: &Credentials) -> Result<()> {
    let config = Config::load()?;
    let client = StoreClient::new(&config)?;
    let _session = LoggedIn::new(&client, &config, credentials)?;

    let items = client.shelf()?;
    if items.is_empty() {
        println!("Your shelf is empty.");
        return Ok(());
    }

    println!("Items on your shelf:");
    for (index, item) in items.iter().enumerate() {
        println!("{:>3}: {} {}", index + 1, item.name, item.href);
    }

    Ok(())
}
