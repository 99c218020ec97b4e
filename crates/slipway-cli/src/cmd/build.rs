use anyhow::Context;
use slipway_core::config::DeployConfig;
use slipway_core::exec::LocalExecutor;
use slipway_core::pipeline;
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    let cfg = DeployConfig::load(root).context("failed to load slipway.yaml")?;
    pipeline::build(&cfg, &LocalExecutor, root)?;
    Ok(())
}
