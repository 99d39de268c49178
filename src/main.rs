//! Headless host: walks a scripted observer through an endless tile world and
//! reports what the streamer did along the way.
#![forbid(unsafe_code)]

mod player;

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tilestream_geom::Vec2;
use tilestream_runtime::ChunkStreamer;
use tilestream_runtime::memory::{MemoryTileSurface, RecordingPropSink};
use tilestream_world::{PropArchetype, WorldConfig, load_config_from_path};

use crate::player::Walker;

#[derive(Parser, Debug)]
#[command(name = "tilestream", about = "Stream an endless tile world around a scripted walker")]
struct Args {
    /// World config (TOML). Built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Simulation steps to run.
    #[arg(long, default_value_t = 2000)]
    steps: u64,
    /// World units travelled per step.
    #[arg(long, default_value_t = 0.5)]
    speed: f32,
    /// Initial heading in degrees, counter-clockwise from +X.
    #[arg(long, default_value_t = 30.0, allow_negative_numbers = true)]
    heading: f32,
    /// Degrees turned per step; non-zero walks a circle.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    turn: f32,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    spawn_x: f32,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    spawn_y: f32,
    #[arg(long, allow_negative_numbers = true)]
    seed: Option<i32>,
    #[arg(long)]
    view_distance: Option<i32>,
    /// Prop palette override, comma separated; `-` leaves a slot unassigned.
    #[arg(long, value_delimiter = ',')]
    props: Option<Vec<String>>,
}

fn load_world_config(args: &Args) -> Result<WorldConfig, Box<dyn Error>> {
    let mut cfg = match &args.config {
        Some(path) => {
            log::info!("loading world config from {}", path.display());
            load_config_from_path(path)?
        }
        None => WorldConfig::default(),
    };
    if let Some(seed) = args.seed {
        cfg.seed = seed;
    }
    if let Some(vd) = args.view_distance {
        cfg.view_distance_chunks = vd;
    }
    if let Some(names) = &args.props {
        cfg.palette = names
            .iter()
            .map(|n| match n.trim() {
                "" | "-" => None,
                name => Some(PropArchetype::new(name)),
            })
            .collect();
    }
    Ok(cfg)
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let cfg = load_world_config(&args)?;
    let mut streamer = ChunkStreamer::builder(cfg)
        .tile_surface(MemoryTileSurface::new())
        .prop_sink(RecordingPropSink::new())
        .build()?;

    let mut walker = Walker::new(Vec2::new(args.spawn_x, args.spawn_y));
    walker.yaw = args.heading;
    walker.speed = args.speed;
    walker.turn_rate = args.turn;

    let bound = streamer.config().window_chunk_count();
    let mut peak_resident = 0usize;
    let mut peak_props = 0usize;
    let mut streaming_steps = 0u64;
    for tick in 0..args.steps {
        let report = streamer.step(&walker);
        if !report.is_noop() {
            streaming_steps += 1;
            log::debug!(
                target: "events",
                "[tick {}] walker at ({:.2}, {:.2}) -> {:?}",
                tick,
                walker.pos.x,
                walker.pos.y,
                report
            );
        }
        peak_resident = peak_resident.max(streamer.resident_count());
        peak_props = peak_props.max(streamer.live_prop_count());
        if streamer.resident_count() != bound {
            log::warn!(
                "[tick {}] resident={} differs from window bound {}",
                tick,
                streamer.resident_count(),
                bound
            );
        }
        walker.advance();
    }

    let stats = streamer.stats();
    let hist = streamer.surface().histogram();
    log::info!(
        "walked {:.1} units over {} steps ({} streaming passes)",
        walker.travelled,
        args.steps,
        streaming_steps
    );
    log::info!(
        "chunks: loaded={} evicted={} resident={} peak={} bound={}",
        stats.chunks_loaded,
        stats.chunks_evicted,
        stats.resident,
        peak_resident,
        bound
    );
    log::info!("tiles on surface: A={} B={} C={}", hist[0], hist[1], hist[2]);
    log::info!(
        "props: spawned={} destroyed={} live={} peak={}",
        stats.props_spawned,
        stats.props_destroyed,
        stats.live_props,
        peak_props
    );

    streamer.unload_all();
    let (surface, sink) = streamer.into_parts();
    if sink.live_count() != 0 || surface.painted_cells() != 0 {
        log::error!(
            "shutdown left {} live prop(s) and {} painted cell(s)",
            sink.live_count(),
            surface.painted_cells()
        );
        return Err("streamer did not release all chunks".into());
    }
    log::info!("shutdown clean: {} surface batches", surface.batches);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
