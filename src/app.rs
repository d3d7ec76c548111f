use crate::{cli, context};
use anyhow::{Context as AnyhowContext, Result};

/// Parse the command line, set up logging and run the selected command.
pub fn run() -> Result<()> {
    crate::tracing::init();
    let cli = cli::parse();
    let ctx = context::Context::from_cli(&cli);

    crate::tracing::set_log_file(ctx.log_file.as_deref()).context("opening log file")?;
    log_startup_info(&ctx);

    let _span = ::tracing::info_span!("pacli", network = %ctx.network).entered();
    cli.cmd.run(&ctx)
}

fn log_startup_info(ctx: &context::Context) {
    log::debug!("🔗 Node RPC URL: {}", ctx.rpc_url);
    log::debug!("🌐 Network: {}", ctx.network);
    log::debug!(
        "🗂️ Registry: {} (deck version {})",
        crate::protocol::registry_label(ctx.production),
        ctx.deck_version
    );
    if let Some(path) = ctx.log_file.as_deref() {
        log::debug!("📝 Log file: {}", path.to_string_lossy());
    }
}
