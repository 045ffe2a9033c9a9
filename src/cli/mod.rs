pub mod render;
pub mod session;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::api::TrainingClient;
use crate::settings::{SettingsStore, TrainingParams};
use crate::timeline::{section_widths, LayoutBasis};

use session::PlanSource;

const BAR_COLUMNS: usize = 60;

#[derive(Parser, Debug)]
#[command(name = "trainplay", version, about = "Fetch a generated training plan and play it back")]
pub struct Cli {
    /// Settings file (JSON). Falls back to TRAINPLAY_CONFIG.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate (or load) a training plan and play it back.
    Play(PlayArgs),
    /// Generate a standalone combo and play it back.
    Combo {
        /// Number of movements in the combo.
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        movements: Option<u32>,
        /// Print playback events as JSON lines.
        #[arg(long)]
        json: bool,
    },
    /// Print a plan and its proportion bar without playing it.
    Show(ShowArgs),
    /// Browse the service catalogs.
    Catalog {
        #[arg(value_enum)]
        kind: CatalogKind,
    },
}

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Play a plan stored as JSON instead of asking the service.
    #[arg(long)]
    pub file: Option<PathBuf>,
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub total_minutes: Option<u32>,
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub warmup_minutes: Option<u32>,
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub calisthenics_exercises: Option<u32>,
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub combo_movements: Option<u32>,
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub combo_buildup: Option<u32>,
}

impl PlanArgs {
    /// Flags override the configured defaults field by field.
    pub fn params(&self, defaults: TrainingParams) -> TrainingParams {
        TrainingParams {
            total_minutes: self.total_minutes.unwrap_or(defaults.total_minutes),
            warmup_minutes: self.warmup_minutes.unwrap_or(defaults.warmup_minutes),
            calisthenics_exercises: self
                .calisthenics_exercises
                .unwrap_or(defaults.calisthenics_exercises),
            combo_movements: self.combo_movements.unwrap_or(defaults.combo_movements),
            combo_buildup: self.combo_buildup.unwrap_or(defaults.combo_buildup),
        }
    }

    pub fn source(&self, defaults: TrainingParams) -> PlanSource {
        match &self.file {
            Some(path) => PlanSource::File(path.clone()),
            None => PlanSource::Training(self.params(defaults)),
        }
    }
}

#[derive(Args, Debug)]
pub struct PlayArgs {
    #[command(flatten)]
    pub plan: PlanArgs,
    /// Print playback events as JSON lines.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub plan: PlanArgs,
    /// Durations used for the proportion bar.
    #[arg(long, value_enum, default_value_t = BasisArg::Flattened)]
    pub basis: BasisArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BasisArg {
    Flattened,
    Declared,
}

impl From<BasisArg> for LayoutBasis {
    fn from(basis: BasisArg) -> Self {
        match basis {
            BasisArg::Flattened => LayoutBasis::Flattened,
            BasisArg::Declared => LayoutBasis::Declared,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CatalogKind {
    Movements,
    Exercises,
}

pub async fn execute(cli: Cli) -> Result<()> {
    let settings = SettingsStore::from_env(cli.config)?;
    let client = TrainingClient::new(&settings.api())?;

    match cli.command {
        Command::Play(args) => {
            let source = args.plan.source(settings.training());
            session::run_playback(&client, &settings, source, args.json).await
        }
        Command::Combo { movements, json } => {
            let movements = movements.unwrap_or(settings.training().combo_movements);
            session::run_playback(&client, &settings, PlanSource::Combo(movements), json).await
        }
        Command::Show(args) => {
            let source = args.plan.source(settings.training());
            let mut input = BufReader::new(tokio::io::stdin()).lines();
            let Some(plan) = session::obtain_with_retry(&client, &source, &mut input).await?
            else {
                return Ok(());
            };
            let widths = section_widths(&plan, args.basis.into());
            println!("{}", render::render_plan(&plan));
            println!("{}", render::render_bar(&plan, &widths, BAR_COLUMNS));
            Ok(())
        }
        Command::Catalog { kind } => {
            match kind {
                CatalogKind::Movements => {
                    for movement in client.movements().await? {
                        println!("{:>6}  {}", movement.id, render::render_movement(&movement));
                    }
                }
                CatalogKind::Exercises => {
                    let mut out = String::new();
                    for exercise in client.exercises().await? {
                        render::render_exercise(&mut out, &exercise, 0);
                    }
                    print!("{out}");
                }
            }
            Ok(())
        }
    }
}
