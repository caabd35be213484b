use anyhow::Result;
use fsync::config::load_host_entries;
use fsync::Settings;

use crate::ui::hosts::render_host_table;

pub fn cmd_config(settings: &Settings, json: bool) -> Result<()> {
    let entries = load_host_entries(&settings.hosts_file)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        println!("Hosts file: {}", settings.hosts_file.display());
        println!("Private key: {}", settings.private_key.display());
        println!("Known hosts: {}", settings.known_hosts.display());
        println!();
        print!("{}", render_host_table(&entries));
    }
    Ok(())
}
