use crate::core::config::{get_config_path, Config};
use crate::error::Result;

pub fn show_config() -> Result<()> {
    let path = get_config_path()?;
    let config = Config::load_from(&path)?;

    println!("Config file: {}", path.display());
    println!("  base_url:   {}", config.base_url);
    println!("  locale:     {}", config.locale);
    println!("  output_dir: {}", config.output_dir.display());
    println!(
        "  username:   {}",
        config.username.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  user_agent: {}",
        config.user_agent.as_deref().unwrap_or("(default)")
    );

    Ok(())
}
