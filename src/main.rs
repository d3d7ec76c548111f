mod app;
mod cli;
mod commands;
mod context;
mod display;
mod error;
mod finder;
mod network;
mod protocol;
mod provider;
mod spawn;
mod tracing;

fn main() -> anyhow::Result<()> {
    app::run()
}
