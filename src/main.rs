use std::env;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use radial_gauge::{default_ranges, load_font, Gauge, GaugeCommand, GaugeConfig};
use rand::Rng;

struct Options {
    range: (f64, f64),
    sweep: (f64, f64),
    title: String,
    font: Option<PathBuf>,
    svg: bool,
    value: Option<f64>,
    random: bool,
}

fn parse_pair(args: &mut impl Iterator<Item = String>) -> Option<(f64, f64)> {
    let (a, b) = (args.next()?, args.next()?);
    Some((a.parse().ok()?, b.parse().ok()?))
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Options {
    let mut options = Options {
        range: (0.0, 100.0),
        sweep: (0.0, 360.0),
        title: "Gauge".to_string(),
        font: None,
        svg: false,
        value: None,
        random: false,
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--range" => match parse_pair(&mut args) {
                Some(range) => options.range = range,
                None => log::warn!("--range expects two numbers"),
            },
            "--sweep" => match parse_pair(&mut args) {
                Some(sweep) => options.sweep = sweep,
                None => log::warn!("--sweep expects two angles"),
            },
            "--title" => {
                if let Some(title) = args.next() {
                    options.title = title;
                }
            }
            "--font" => options.font = args.next().map(PathBuf::from),
            "--value" => options.value = args.next().and_then(|v| v.parse().ok()),
            "--svg" => options.svg = true,
            "--random" => options.random = true,
            other => log::warn!("ignoring unknown argument {other}"),
        }
    }
    options
}

/// Feeds one value per stdin line to the gauge until stdin closes.
fn read_values(sender: mpsc::Sender<GaugeCommand>) {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        match line.trim().parse::<f64>() {
            Ok(value) => {
                if sender.send(GaugeCommand::SetValue(value)).is_err() {
                    break;
                }
            }
            Err(_) => log::warn!("skipping non-numeric input {:?}", line.trim()),
        }
    }
}

fn random_values(sender: mpsc::Sender<GaugeCommand>, (min, max): (f64, f64)) {
    let mut rng = rand::rng();
    loop {
        let value = rng.random_range(min..=max).round();
        if sender.send(GaugeCommand::SetValue(value)).is_err() {
            break;
        }
        thread::sleep(Duration::from_millis(500));
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let options = parse_args(env::args().skip(1));

    let config = GaugeConfig::builder()
        .min(options.range.0)
        .max(options.range.1)
        .start_angle(options.sweep.0)
        .end_angle(options.sweep.1)
        .build();
    let mut gauge = Gauge::new(config, default_ranges())?;
    if let Some(value) = options.value {
        gauge.set_value(value);
    }

    if options.svg {
        print!("{}", gauge.to_svg());
        return Ok(());
    }

    let font = match &options.font {
        Some(path) => Some(load_font(path)?),
        None => None,
    };

    let (sender, receiver) = mpsc::channel();
    if options.random {
        let range = options.range;
        thread::spawn(move || random_values(sender, range));
    } else {
        thread::spawn(move || read_values(sender));
    }

    gauge.show_with_commands(&options.title, font, receiver)?;
    Ok(())
}
