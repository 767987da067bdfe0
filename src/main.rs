use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::egui;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc::{self, Receiver as TokioReceiver};

mod config;
mod display;
mod sim;
mod vitals;
mod widget;

use config::{Config, Overrides};
use display::{ChannelDisplay, LogDisplay, VitalsDisplay, VitalsFrame};
use sim::{SimulationHandle, SimulationLoop};

const GUI_CHANNEL_CAPACITY: usize = 128;


/// Simulated heart-rate and body-temperature monitor
#[derive(Parser)]
#[command(name = "vitals")]
#[command(version, about, long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Milliseconds between readings
    #[arg(long, value_name = "MS")]
    interval_ms: Option<u64>,

    /// Readings kept per series (0 keeps everything)
    #[arg(long, value_name = "N")]
    max_samples: Option<usize>,

    /// Seed for a reproducible session
    #[arg(long)]
    seed: Option<u64>,

    /// Log readings to the terminal instead of opening a window
    #[arg(long)]
    headless: bool,

    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}


#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = default_log_level(cli.headless, cli.verbose);
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let overrides = Overrides {
        update_interval_ms: cli.interval_ms,
        max_samples: cli.max_samples,
        seed: cli.seed,
    };
    let config = Config::resolve(cli.config.as_deref(), overrides)
        .context("could not load configuration")?;
    info!("using {:?}", config);

    if cli.headless {
        run_headless(&config).await
    } else {
        run_gui(config)
    }
}

// headless readings are logged at info, so that mode never goes below it
fn default_log_level(headless: bool, verbose: u8) -> &'static str {
    match (headless, verbose) {
        (_, 2..) => "debug",
        (true, _) | (_, 1) => "info",
        _ => "warn",
    }
}

fn session_rng(config: &Config) -> StdRng {
    match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn start_simulation<D: VitalsDisplay>(config: &Config, display: D) -> SimulationHandle {
    SimulationLoop::new(config.update_interval(), config.max_samples, session_rng(config), display)
        .start()
}

async fn run_headless(config: &Config) -> Result<()> {
    let handle = start_simulation(config, LogDisplay);
    info!("running headless, press Ctrl-C to stop");

    tokio::signal::ctrl_c().await.context("failed to listen for Ctrl-C")?;
    handle.shutdown().await;
    Ok(())
}

fn run_gui(config: Config) -> Result<()> {
    let native_options = eframe::NativeOptions::default();
    eframe::run_native(
        "Health Monitor",
        native_options,
        Box::new(move |cc| Ok(Box::new(VitalsApp::new(cc, &config)))),
    )
    .map_err(|err| anyhow!("window closed with an error: {err}"))
}


struct VitalsApp {
    rx_from_sim: TokioReceiver<VitalsFrame>,
    latest: Option<VitalsFrame>,
    simulation: SimulationHandle,
}

impl VitalsApp {
    /// Screen activation: the simulation lives exactly as long as the window.
    fn new(cc: &eframe::CreationContext<'_>, config: &Config) -> Self {
        let (tx, rx) = mpsc::channel(GUI_CHANNEL_CAPACITY);
        let display = ChannelDisplay::new(tx, Some(cc.egui_ctx.clone()));

        VitalsApp {
            rx_from_sim: rx,
            latest: None,
            simulation: start_simulation(config, display),
        }
    }

    fn read_channel(&mut self) {
        // every frame carries the full series, only the newest matters
        while let Ok(frame) = self.rx_from_sim.try_recv() {
            self.latest = Some(frame);
        }
    }
}

impl eframe::App for VitalsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.read_channel();

        let central_panel = egui::CentralPanel::default();
        central_panel.show(ctx, |ui| {
            match &self.latest {
                Some(frame) => {
                    ui.add(widget::get_heart_rate_label(&frame.heart_rate_label()));
                    ui.add(widget::get_body_temp_label(&frame.body_temp_label()));
                    widget::show_vitals_chart(ui, &frame.heart_rate, &frame.body_temp);
                }
                None => {
                    ui.add(widget::get_waiting_label());
                    widget::show_vitals_chart(ui, &[], &[]);
                }
            }
        });
    }

    /// Screen teardown.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.simulation.stop();
    }
}
