use slipway_core::config::DeployConfig;
use slipway_core::{io, paths};
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    let name = root
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("project")
        .to_string();

    let cfg = DeployConfig::new(&name);
    let yaml = serde_yaml::to_string(&cfg)?;
    let data = format!("# slipway deployment configuration\n{yaml}");

    let path = paths::config_path(root);
    if io::write_if_missing(&path, data.as_bytes())? {
        println!("Created {}", path.display());
        println!("Set 'repo' and 'host' before deploying.");
    } else {
        println!("{} already exists, leaving it alone.", path.display());
    }
    Ok(())
}
