extern crate describer;
extern crate failure;
extern crate structopt;

use describer::*;
use describer::output::frame::TextFrame;
use describer::telemetry::cycle::Fetch;
use describer::telemetry::inference::EngineConfig;
use log::{error, info, LevelFilter};
use std::path::PathBuf;
use structopt::StructOpt;

/// Describer -- train describer for a signal box view
#[derive(StructOpt, Debug)]
#[structopt(name="describer")]
struct Opt {
    /// Verbose mode (-v, -vv)
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    verbose: u8,

    /// Layout file with diagrams, anchors and signal topology
    #[structopt(parse(from_os_str))]
    layout: PathBuf,

    /// Feed snapshots in JSON, one processing cycle each
    #[structopt(parse(from_os_str))]
    feeds: Vec<PathBuf>,

    /// Draw the layout mirrored
    #[structopt(short = "m", long = "mirrored")]
    mirrored: bool,

    /// Area to draw after every cycle
    #[structopt(short = "a", long = "area", default_value = "L001_KO_Zw")]
    area: String,

    /// Distance beyond which a train is assumed not to have passed its signal
    #[structopt(short = "t", long = "threshold")]
    threshold: Option<f64>,

    /// Tolerance for matching a position to a track segment
    #[structopt(short = "e", long = "epsilon")]
    epsilon: Option<f64>,

    /// Draw velocities above the train numbers
    #[structopt(short = "s", long = "show-speed")]
    show_speed: bool,

    /// List the speed band of the signal in front of each train
    #[structopt(long = "signal-speed")]
    signal_speed: bool,

    /// Print the signals each train passed when done
    #[structopt(long = "trail")]
    trail: bool,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run(opt :&Opt) -> AppResult<()> {
    let graph = get_track_graph(&opt.layout)?;
    info!("Loaded {} areas from {}", graph.areas.len(), opt.layout.display());

    let mut config = EngineConfig::default();
    if let Some(t) = opt.threshold { config.carry_over_threshold = t; }
    if let Some(e) = opt.epsilon { config.geometric_epsilon = e; }

    let mut d = describer(graph, opt.mirrored, config)?;
    if opt.trail {
        d = d.with_trail();
    }
    if d.graph().area(&opt.area).is_none() {
        return Err(failure::format_err!("no area named {}", opt.area));
    }

    for feed in &opt.feeds {
        let fetch = match get_feed(feed) {
            Ok(trains) => Fetch::Ready(trains),
            Err(e) => {
                error!("Could not read feed {}: {}", feed.display(), e);
                Fetch::Pending
            }
        };

        if d.tick(fetch).is_some() {
            let mut frame = TextFrame::new(opt.show_speed);
            if opt.signal_speed {
                frame = frame.with_signal_speed();
            }
            d.present(&opt.area, &mut frame);
            println!("# {} ({})", opt.area, feed.display());
            print!("{}", frame);
        }
    }

    if let Some(trail) = d.trail() {
        println!("# Signal trail:");
        print!("{}", trail.listing()?);
    }

    Ok(())
}

pub fn main() {
    let opt = Opt::from_args();
    init_logging(opt.verbose);
    match run(&opt) {
        Ok(()) => {},
        Err(e) => {
            println!("Error:\n{}", e.as_fail());
            std::process::exit(1);
        },
    }
}
