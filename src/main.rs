mod app;
mod color;
mod config;
mod data;
mod peaks;
mod render;
mod summary;

use anyhow::Result;

use config::Config;

fn main() -> Result<()> {
    env_logger::init();

    let config = Config::from_env()?;
    app::run(&config)
}
