use crate::commands::{Credentials, LoggedIn};
use crate::core::client::StoreClient;
use crate::core::config::Config;
use crate::core::item::{ShelfItem, Summary};
use crate::core::pipeline::Pipeline;
use crate::error::{Result, ShelfError};
use dialoguer::Select;
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct DownloadOptions {
    /// Reference URL of the item; the first shelf item when absent.
    pub item: Option<String>,
    pub output: Option<PathBuf>,
    /// Ask which shelf item to download instead of taking the first.
    pub pick: bool,
}

pub fn download_item(credentials: &Credentials, options: &DownloadOptions) -> Result<()> {
    let config = Config::load()?;
    let output = options
        .output
        .clone()
        .unwrap_or_else(|| config.output_dir.clone());

    let client = StoreClient::new(&config)?;
    let _session = LoggedIn::new(&client, &config, credentials)?;

    let reference = match &options.item {
        Some(item) => item.clone(),
        None => {
            let items = client.shelf()?;
            choose_item(&items, options.pick)?.href.clone()
        }
    };

    let target = client.target_for(&reference)?;
    println!("Downloading {} to {}...", target.id, output.display());

    let result = Pipeline::new(&client).run(&target, &output);
    report(&result);
    result.map(|_| ())
}

/// Prints the outcome of a pipeline run, including what a failure left behind.
pub fn report(result: &Result<Summary>) {
    match result {
        Ok(summary) => {
            println!(
                "✅ {} entries extracted to {} ({} files, {} directories, {} bytes)",
                summary.entries,
                summary.extract_dir.display(),
                summary.files,
                summary.directories,
                summary.bytes
            );
        }
        Err(e) => {
            let partial = e.partial_entries();
            if !partial.is_empty() {
                println!("⚠️  {} entries were extracted before the failure", partial.len());
            }
            if let Some(archive) = e.retained_archive() {
                println!("⚠️  Archive kept at {}", archive.display());
            }
        }
    }
}

fn choose_item(items: &[ShelfItem], pick: bool) -> Result<&ShelfItem> {
    if items.is_empty() {
        return Err(ShelfError::NoItems);
    }

    for (index, item) in items.iter().enumerate() {
        println!("{:>3}: {} {}", index + 1, item.name, item.href);
    }

    let index = if pick {
        let names: Vec<&str> = items.iter().map(|item| item.name.as_str()).collect();
        Select::new()
            .with_prompt("Which item do you want to download?")
            .items(&names)
            .default(0)
            .interact()
            .map_err(std::io::Error::other)?
    } else {
        0
    };

    Ok(&items[index])
}
