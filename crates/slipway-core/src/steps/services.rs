use crate::error::Result;
use crate::exec::{require_command, Executor};
use tracing::info;

/// Restart everything serving the site: the supervised application
/// processes, then nginx, then memcached.
pub fn restart(exec: &dyn Executor) -> Result<()> {
    require_command(exec, "supervisorctl")?;
    info!("restarting services");
    exec.run_checked("sudo supervisorctl restart all")?;
    exec.run_checked("sudo /etc/init.d/nginx restart")?;
    exec.run_checked("sudo /etc/init.d/memcached restart")?;
    info!("services restarted");
    Ok(())
}
