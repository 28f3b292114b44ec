//! Headless runner: boots the snapshot, plays through to the first player
//! view of a landscape, then runs paced frames logging every game event.

use std::path::PathBuf;
use std::process;
use std::thread;
use std::time::{Duration, Instant};

use emu_sentinel::{
    InputAction, InterruptPacer, LANDSCAPE_0000_CODE, Result, SentinelConfig, Sentinel,
    SentinelEvents,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Host display refresh the paced loop runs at.
const TICK: Duration = Duration::from_millis(10);

struct CliArgs {
    config_path: Option<PathBuf>,
    rom_path: Option<PathBuf>,
    sna_path: Option<PathBuf>,
    landscape: u16,
    code: u32,
    frames: u32,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        config_path: None,
        rom_path: None,
        sna_path: None,
        landscape: 0x0000,
        code: LANDSCAPE_0000_CODE,
        frames: 500,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                cli.config_path = args.get(i).map(PathBuf::from);
            }
            "--rom" => {
                i += 1;
                cli.rom_path = args.get(i).map(PathBuf::from);
            }
            "--sna" => {
                i += 1;
                cli.sna_path = args.get(i).map(PathBuf::from);
            }
            "--landscape" => {
                i += 1;
                if let Some(s) = args.get(i) {
                    cli.landscape =
                        u16::from_str_radix(s.trim_start_matches("0x"), 16).unwrap_or(0x0000);
                }
            }
            "--code" => {
                i += 1;
                if let Some(s) = args.get(i) {
                    cli.code = u32::from_str_radix(s.trim_start_matches("0x"), 16)
                        .unwrap_or(LANDSCAPE_0000_CODE);
                }
            }
            "--frames" => {
                i += 1;
                if let Some(s) = args.get(i) {
                    cli.frames = s.parse().unwrap_or(500);
                }
            }
            "--help" | "-h" => {
                eprintln!("Usage: emu-sentinel [OPTIONS]");
                eprintln!();
                eprintln!("Options:");
                eprintln!("  --config <file>      JSON configuration file");
                eprintln!("  --rom <file>         48K ROM image [default: 48.rom]");
                eprintln!("  --sna <file>         The Sentinel SNA snapshot [default: sentinel.sna]");
                eprintln!("  --landscape <bcd>    Landscape number, e.g. 0042 [default: 0000]");
                eprintln!("  --code <bcd>         Secret code for the landscape [default: 75914644]");
                eprintln!("  --frames <n>         Display ticks to run after the first player view [default: 500]");
                eprintln!();
                eprintln!("Set RUST_LOG to change the log level (default: info).");
                process::exit(0);
            }
            other => {
                eprintln!("Unknown option: {other}");
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

/// Event handler that logs everything and tracks how far the game has got.
struct Host {
    landscape: u16,
    code: u32,
    title_screens: u32,
    generated: bool,
    player_views: u32,
    dead: bool,
}

impl Host {
    fn new(landscape: u16, code: u32) -> Self {
        Self {
            landscape,
            code,
            title_screens: 0,
            generated: false,
            player_views: 0,
            dead: false,
        }
    }
}

impl SentinelEvents for Host {
    fn on_title_screen(&mut self) {
        self.title_screens += 1;
        info!("title screen");
    }

    fn on_landscape_input(&mut self) -> (u16, u32) {
        info!(
            landscape = format_args!("{:04X}", self.landscape),
            code = format_args!("{:08X}", self.code),
            "entering landscape"
        );
        (self.landscape, self.code)
    }

    fn on_landscape_generated(&mut self) {
        self.generated = true;
        info!("landscape generated");
    }

    fn on_new_player_view(&mut self) {
        self.player_views += 1;
        debug!(view = self.player_views, "new player view");
    }

    fn on_player_dead(&mut self) {
        self.dead = true;
        info!("player dead");
    }

    fn on_game_model_changed(&mut self, index: u8, player_initiated: bool) {
        debug!(index, player_initiated, "object changed");
    }

    fn on_target_action_tile(&mut self, action: InputAction) -> Option<(u8, u8)> {
        debug!(?action, "target check");
        None
    }

    fn on_hide_energy_panel(&mut self) {
        debug!("energy panel hidden");
    }

    fn on_add_energy_symbol(&mut self, symbol: u8, x_offset: u8) {
        debug!(symbol, x_offset, "energy symbol");
    }

    fn on_play_tune(&mut self, tune: u8) {
        debug!(tune, "tune");
    }

    fn on_sound_effect(&mut self, effect: u8, object: u8) {
        debug!(effect, object, "sound effect");
    }
}

fn run(cli: &CliArgs) -> Result<()> {
    let mut config = match &cli.config_path {
        Some(path) => SentinelConfig::load(path)?,
        None => SentinelConfig::default(),
    };
    if let Some(path) = &cli.rom_path {
        config.rom.clone_from(path);
    }
    if let Some(path) = &cli.sna_path {
        config.snapshot.clone_from(path);
    }

    let mut game = Sentinel::from_config(&config)?;
    let mut host = Host::new(cli.landscape, cli.code);

    let frames = game.run_until(&mut host, "title screen", |h| h.title_screens > 0)?;
    info!(frames, "reached title screen");

    let frames = game.run_until(&mut host, "landscape preview", |h| h.generated)?;
    info!(frames, "reached landscape preview");

    let frames = game.run_until(&mut host, "player view", |h| h.player_views > 0)?;
    let (landscape, code) = game.landscape_and_code();
    info!(
        frames,
        landscape = format_args!("{landscape:04X}"),
        code = format_args!("{code:08X}"),
        objects = game.extract_placed_models().len(),
        sentries = game.memory().peek(emu_sentinel::layout::SENTRY_COUNT),
        "reached player view"
    );

    let mut pacer = InterruptPacer::new(config.game_speed());
    let mut last = Instant::now();
    for _ in 0..cli.frames {
        game.run_frame(&mut host, false)?;

        let now = Instant::now();
        if pacer.tick(now - last) {
            game.run_interrupt(&mut host)?;
        }
        last = now;

        if host.dead {
            break;
        }
        thread::sleep(TICK);
    }

    info!(
        views = host.player_views,
        energy = game.player_energy(),
        seen = ?game.player_seen_state(),
        "done"
    );
    Ok(())
}

fn main() {
    let cli = parse_args();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
