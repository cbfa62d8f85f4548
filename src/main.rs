//! Command-line front end for the beatmap codec.
//!
//! Decodes a `.osu` chart and prints a summary, a JSON digest, the
//! re-encoded document, or a round-trip verification report.

use std::env;
use std::process::ExitCode;

use anyhow::{Context, Result};
use beatmap_codec::{Beatmap, HitObjectKind};
use serde::Serialize;

/// Human and JSON summary of a decoded chart
#[derive(Serialize)]
struct Summary {
    version: i32,
    title: Option<String>,
    artist: Option<String>,
    creator: Option<String>,
    difficulty_name: Option<String>,
    background: Option<String>,
    circles: usize,
    sliders: usize,
    spinners: usize,
    holds: usize,
    timing_points: usize,
    bpm_min: Option<f64>,
    bpm_max: Option<f64>,
}

impl Summary {
    fn new(beatmap: &Beatmap) -> Self {
        let mut circles = 0;
        let mut sliders = 0;
        let mut spinners = 0;
        let mut holds = 0;
        for object in &beatmap.hit_objects.objects {
            match object.kind {
                HitObjectKind::Circle => circles += 1,
                HitObjectKind::Slider(_) => sliders += 1,
                HitObjectKind::Spinner { .. } => spinners += 1,
                HitObjectKind::Hold { .. } => holds += 1,
            }
        }

        let bpms: Vec<f64> = beatmap
            .timing_points
            .iter()
            .flat_map(|t| &t.points)
            .filter_map(|p| match p {
                beatmap_codec::TimingPoint::Uninherited(p) => Some(p.bpm()),
                beatmap_codec::TimingPoint::Inherited(_) => None,
            })
            .collect();

        Summary {
            version: beatmap.version,
            title: beatmap.metadata.title.clone(),
            artist: beatmap.metadata.artist.clone(),
            creator: beatmap.metadata.creator.clone(),
            difficulty_name: beatmap.metadata.version.clone(),
            background: beatmap.background_filename().map(str::to_string),
            circles,
            sliders,
            spinners,
            holds,
            timing_points: beatmap
                .timing_points
                .as_ref()
                .map(|t| t.points.len())
                .unwrap_or(0),
            bpm_min: bpms.iter().copied().reduce(f64::min),
            bpm_max: bpms.iter().copied().reduce(f64::max),
        }
    }

    fn print(&self) {
        let unknown = || "<unknown>".to_string();
        println!(
            "{} - {} [{}] by {}",
            self.artist.clone().unwrap_or_else(unknown),
            self.title.clone().unwrap_or_else(unknown),
            self.difficulty_name.clone().unwrap_or_else(unknown),
            self.creator.clone().unwrap_or_else(unknown),
        );
        println!("format version: v{}", self.version);
        if let (Some(min), Some(max)) = (self.bpm_min, self.bpm_max) {
            if (min - max).abs() < f64::EPSILON {
                println!("bpm: {min:.2}");
            } else {
                println!("bpm: {min:.2}-{max:.2}");
            }
        }
        println!(
            "objects: {} circles, {} sliders, {} spinners, {} holds",
            self.circles, self.sliders, self.spinners, self.holds
        );
        println!("timing points: {}", self.timing_points);
        if let Some(bg) = &self.background {
            println!("background: {bg}");
        }
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {program} [OPTIONS] <chart.osu>");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --json       print a JSON summary instead of text");
    eprintln!("  --encode     print the re-encoded document to stdout");
    eprintln!("  --roundtrip  verify decode/encode stability and exit");
    eprintln!("  --strict     fail on mismatched slider edge lists");
    eprintln!("  -h, --help   show this help");
}

fn run() -> Result<bool> {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("beatmap-codec");

    let mut path: Option<&str> = None;
    let mut json = false;
    let mut encode = false;
    let mut roundtrip = false;
    let mut options = beatmap_codec::DecodeOptions::default();

    for arg in &args[1..] {
        match arg.as_str() {
            "--json" => json = true,
            "--encode" => encode = true,
            "--roundtrip" => roundtrip = true,
            "--strict" => options.strict_edge_lists = true,
            "-h" | "--help" => {
                print_usage(program);
                return Ok(true);
            }
            other if other.starts_with('-') => {
                eprintln!("unknown option: {other}");
                print_usage(program);
                return Ok(false);
            }
            other => path = Some(other),
        }
    }

    let Some(path) = path else {
        print_usage(program);
        return Ok(false);
    };

    let text = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    let beatmap =
        Beatmap::decode_with(&text, options).with_context(|| format!("decoding {path}"))?;

    if roundtrip {
        let encoded = beatmap.encode();
        let reparsed = Beatmap::decode_with(&encoded, options)
            .context("re-decoding the encoded document")?;
        let stable = reparsed == beatmap && reparsed.encode() == encoded;
        if stable {
            println!("round trip stable ({} bytes)", encoded.len());
        } else {
            eprintln!("round trip UNSTABLE");
        }
        return Ok(stable);
    }

    if encode {
        print!("{}", beatmap.encode());
        return Ok(true);
    }

    let summary = Summary::new(&beatmap);
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        summary.print();
    }
    Ok(true)
}

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
