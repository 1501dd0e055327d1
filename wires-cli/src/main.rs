//! wires-sim - simulador do painel de fios
//!
//! Cria painéis a partir de um template, aplica cortes/emendas/pulsos
//! aleatórios ao longo de vários ticks e imprime os snapshots finais em JSON.

mod demo;

use std::path::{Path, PathBuf};
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wires_core::{EntityId, TemplateStore, ToolQuality, WireId, WiresAction, WiresConfig};
use wires_system::{ActionOutcome, PanelConfig, StaticInteraction, WiresSystem, probability};

const ACTOR: EntityId = EntityId(1_000_000);
const CUTTERS: EntityId = EntityId(1_000_001);
const MULTITOOL: EntityId = EntityId(1_000_002);

#[derive(Parser)]
#[command(name = "wires-sim")]
#[command(author = "Silvano Neto")]
#[command(version = "2026.1.16")]
#[command(about = "Wire panel simulator", long_about = None)]
struct Cli {
    /// Config file (wires.toml)
    #[arg(short, long, global = true, env = "WIRES_CONFIG")]
    config: Option<PathBuf>,

    /// Layout templates file (defaults to the built-in demo layouts)
    #[arg(short, long, global = true, env = "WIRES_LAYOUTS")]
    layouts: Option<PathBuf>,

    /// RNG seed (overrides the config)
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Spawn panels and run random wire actions
    Simulate {
        /// Layout template id
        #[arg(value_name = "LAYOUT", default_value = "Airlock")]
        layout: String,

        /// Number of panels
        #[arg(short, long, default_value_t = 2)]
        panels: u64,

        /// Number of ticks
        #[arg(short, long, default_value_t = 600)]
        ticks: u32,

        /// Tick length in seconds
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f32,

        /// Chance per tick of a random wire action
        #[arg(long, default_value_t = 0.05)]
        action_chance: f64,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// List layout templates and their resolved wires
    Layouts,

    /// Validate config and layout files
    Check,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wires_system=info,wires_sim=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_deref())?;
    if cli.seed.is_some() {
        config.rng_seed = cli.seed;
    }
    let templates = load_templates(cli.layouts.as_deref())?;

    match cli.command {
        Commands::Simulate {
            layout,
            panels,
            ticks,
            dt,
            action_chance,
            pretty,
        } => simulate_command(config, templates, &layout, panels, ticks, dt, action_chance, pretty),
        Commands::Layouts => layouts_command(&templates),
        Commands::Check => {
            println!("{} config and {} layout(s) OK", "✓".green(), templates.len());
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<WiresConfig> {
    match path {
        Some(path) => WiresConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(WiresConfig::default()),
    }
}

fn load_templates(path: Option<&Path>) -> Result<TemplateStore> {
    match path {
        Some(path) => TemplateStore::from_file(path)
            .with_context(|| format!("loading layouts {}", path.display())),
        None => demo::default_templates().context("parsing built-in layouts"),
    }
}

fn layouts_command(templates: &TemplateStore) -> Result<()> {
    let mut ids: Vec<&str> = templates.ids().collect();
    ids.sort_unstable();

    for id in ids {
        let effective = templates
            .resolve_effective(id)
            .with_context(|| format!("resolving layout {}", id))?;
        let wires = effective.wires.as_deref().unwrap_or_default().join(", ");
        let inherited = if effective.id != id {
            format!(" (from {})", effective.id)
        } else {
            String::new()
        };
        println!(
            "{}{}: [{}] + {} dummy",
            id.bold(),
            inherited.dimmed(),
            wires,
            effective.dummy_wires
        );
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn simulate_command(
    config: WiresConfig,
    templates: TemplateStore,
    layout: &str,
    panels: u64,
    ticks: u32,
    dt: f32,
    action_chance: f64,
    pretty: bool,
) -> Result<()> {
    if !templates.contains(layout) {
        bail!("unknown layout '{}'", layout);
    }
    if !(0.0..=1.0).contains(&action_chance) {
        bail!("action chance must be within [0, 1], got {}", action_chance);
    }

    let mut script_rng = match config.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
        None => StdRng::from_entropy(),
    };
    let mut system = WiresSystem::new(config, templates, demo::registry()?)?;

    let objects: Vec<EntityId> = (1..=panels).map(EntityId).collect();
    for &object in &objects {
        system.add_panel(object, PanelConfig::with_layout(layout).opened())?;
        system.map_init(object)?;
    }
    info!(layout, panels, ticks, "simulation started");

    let mut tools = StaticInteraction::new()
        .with_tool(CUTTERS, [ToolQuality::Cutting])
        .with_tool(MULTITOOL, [ToolQuality::Pulsing]);

    let mut dispatched = 0usize;
    let mut rejected = 0usize;
    for tick in 0..ticks {
        if rng_hit(&mut script_rng, action_chance) {
            let Some(&object) = objects.choose(&mut script_rng) else {
                break;
            };
            let wire_count = system.wires(object)?.len();
            if wire_count > 0 {
                let wire = WireId(script_rng.gen_range(0..wire_count as u32));
                let action = *[WiresAction::Cut, WiresAction::Mend, WiresAction::Pulse]
                    .choose(&mut script_rng)
                    .unwrap_or(&WiresAction::Pulse);
                let tool = match action {
                    WiresAction::Pulse => MULTITOOL,
                    WiresAction::Cut | WiresAction::Mend => CUTTERS,
                };

                match system.apply_action(object, ACTOR, tool, wire, action, &mut tools) {
                    ActionOutcome::Dispatched { is_cut } => {
                        dispatched += 1;
                        debug!(tick, %object, %wire, ?action, is_cut, "scripted action");
                    }
                    ActionOutcome::Rejected(message) => {
                        rejected += 1;
                        debug!(tick, %object, %wire, ?action, reason = message.loc_key(), "scripted action rejected");
                    }
                    ActionOutcome::Ignored => {}
                }
            }
        }
        system.update(dt);
    }
    info!(dispatched, rejected, pending = system.timed_actions().pending_count(), "simulation finished");

    let mut output = serde_json::Map::new();
    for &object in &objects {
        if let Some(snapshot) = system.snapshot(object) {
            output.insert(object.to_string(), serde_json::to_value(snapshot)?);
        }
    }
    let output = serde_json::Value::Object(output);

    if pretty {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", output);
    }
    Ok(())
}

fn rng_hit(rng: &mut StdRng, chance: f64) -> bool {
    rng.gen_bool(probability(chance))
}
