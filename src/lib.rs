pub mod api;
pub mod cli;
pub mod plan;
pub mod player;
pub mod settings;
pub mod timeline;
pub mod utils;

use anyhow::Context;
use clap::Parser;

pub use plan::{parse_seconds, Exercise, Section, SectionType, TrainingPlan};
pub use player::{PlaybackController, PlaybackEngine, PlaybackStatus};
pub use timeline::{flatten, section_widths, LayoutBasis, PlaybackStep};

pub fn run() -> anyhow::Result<()> {
    // Reads RUST_LOG; TRAINPLAY_DEBUG lowers the default level.
    utils::init_logging();

    let cli = cli::Cli::parse();
    log::info!("trainplay starting up...");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(cli::execute(cli))
}
