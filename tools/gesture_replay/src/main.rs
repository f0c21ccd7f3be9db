use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use touch_gestures::{
    load_config, GestureConfig, GestureEvent, GestureEventKind, GestureRecognizer,
    GestureTraceSample, Modifiers, TouchPhase, TouchSample,
};

const TRACE_HEADER: &str = "touch,t_ms,slot,phase,x,y,modifiers,consumed";

#[derive(Parser, Debug)]
#[command(name = "gesture_replay")]
#[command(about = "Replay a CSV touch trace through the gesture recognizer")]
struct Cli {
    /// CSV trace: touch,<t_ms>,<slot>,<phase>,<x>,<y>[,<modifiers>[,<consumed>]]
    trace: PathBuf,
    /// Gesture tunables; built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// One expected event kind per line; exits non-zero on mismatch.
    #[arg(long)]
    expect: Option<PathBuf>,
    /// Also print the recognizer snapshot after every sample.
    #[arg(long = "trace")]
    trace_states: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GestureConfig::default(),
    };
    let samples = parse_trace(&cli.trace)?;
    log::info!(
        "replaying {} samples from {}",
        samples.len(),
        cli.trace.display()
    );

    let mut recognizer = GestureRecognizer::new(config);
    let mut events: Vec<GestureEvent> = Vec::new();
    if cli.trace_states {
        println!("trace,t_ms,state_id,state,axis,active,ignored_id,ignored,events");
    }
    for sample in samples {
        events.extend(recognizer.process(sample));
        if cli.trace_states {
            println!("{}", trace_row(&recognizer.trace()));
        }
    }

    println!("event,t_ms,kind,x,y,a,b,modifiers");
    for event in &events {
        println!("{}", event_row(event));
    }

    if let Some(expect_path) = &cli.expect {
        let expected = parse_expected_kinds(expect_path)?;
        let actual: Vec<&'static str> = events.iter().map(|e| e.kind.label()).collect();
        if actual != expected {
            eprintln!("expected kinds: {}", expected.join(","));
            eprintln!("actual kinds:   {}", actual.join(","));
            bail!("event sequence mismatch");
        }
    }

    Ok(())
}

fn trace_row(trace: &GestureTraceSample) -> String {
    let (ignored_id, ignored) = match trace.ignored {
        Some(reason) => (reason.as_u8(), reason.label()),
        None => (0, ""),
    };
    format!(
        "trace,{},{},{},{},{},{},{},{}",
        trace.t_ms,
        trace.state_id.as_u8(),
        trace.state_id.label(),
        trace.scroll_axis.label(),
        trace.active_points,
        ignored_id,
        ignored,
        trace.event_count
    )
}

fn event_row(event: &GestureEvent) -> String {
    let (a, b) = payload(event.kind);
    format!(
        "event,{},{},{},{},{},{},{}",
        event.t_ms,
        event.kind.label(),
        event.position.x,
        event.position.y,
        a,
        b,
        event.modifiers.bits()
    )
}

fn payload(kind: GestureEventKind) -> (f32, f32) {
    match kind {
        GestureEventKind::ScrollUpdate { dx, dy } => (dx, dy),
        GestureEventKind::ScrollEnd { vx, vy } => (vx, vy),
        GestureEventKind::PinchUpdate { scale } | GestureEventKind::PinchEnd { scale } => {
            (scale, 0.0)
        }
        _ => (0.0, 0.0),
    }
}

fn parse_trace(path: &Path) -> Result<Vec<TouchSample>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut out = Vec::new();
    for (line_no, line_result) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line =
            line_result.with_context(|| format!("failed to read {}:{line_no}", path.display()))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed == TRACE_HEADER {
            continue;
        }
        let sample = parse_sample(trimmed)
            .with_context(|| format!("{}:{line_no} invalid trace line", path.display()))?;
        out.push(sample);
    }

    Ok(out)
}

fn parse_sample(line: &str) -> Result<TouchSample> {
    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    if parts.len() < 6 || parts.len() > 8 {
        bail!("expected 6 to 8 columns, got {}", parts.len());
    }
    if parts[0] != "touch" {
        bail!("unknown record type '{}'", parts[0]);
    }

    let t_ms: u64 = parts[1]
        .parse()
        .with_context(|| format!("invalid t_ms '{}'", parts[1]))?;
    let slot: u32 = parts[2]
        .parse()
        .with_context(|| format!("invalid slot '{}'", parts[2]))?;
    let phase = parse_phase(parts[3])?;
    let x: f32 = parts[4]
        .parse()
        .with_context(|| format!("invalid x '{}'", parts[4]))?;
    let y: f32 = parts[5]
        .parse()
        .with_context(|| format!("invalid y '{}'", parts[5]))?;

    let mut sample = TouchSample::new(slot, phase, x, y, t_ms);
    if let Some(raw) = parts.get(6) {
        let bits: u32 = raw
            .parse()
            .with_context(|| format!("invalid modifiers '{raw}'"))?;
        sample = sample.with_modifiers(Modifiers(bits));
    }
    if let Some(raw) = parts.get(7) {
        match *raw {
            "1" | "true" => sample = sample.consumed(),
            "0" | "false" => {}
            other => bail!("invalid consumed flag '{other}'"),
        }
    }
    Ok(sample)
}

fn parse_phase(raw: &str) -> Result<TouchPhase> {
    Ok(match raw.to_ascii_lowercase().as_str() {
        "pressed" => TouchPhase::Pressed,
        "moved" => TouchPhase::Moved,
        "stationary" => TouchPhase::Stationary,
        "released" => TouchPhase::Released,
        "cancelled" => TouchPhase::Cancelled,
        _ => bail!("invalid phase '{raw}'"),
    })
}

fn parse_expected_kinds(path: &Path) -> Result<Vec<&'static str>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut kinds = Vec::new();
    for (line_no, line_result) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line =
            line_result.with_context(|| format!("failed to read {}:{line_no}", path.display()))?;
        let token = line.trim();
        if token.is_empty() || token.starts_with('#') {
            continue;
        }
        let Some(kind) = normalize_kind(token) else {
            bail!(
                "{}:{line_no} invalid expected event kind: {token}",
                path.display()
            );
        };
        kinds.push(kind);
    }

    Ok(kinds)
}

fn normalize_kind(kind: &str) -> Option<&'static str> {
    match kind.to_ascii_lowercase().as_str() {
        "tap_down" => Some("tap_down"),
        "tap" => Some("tap"),
        "double_tap" => Some("double_tap"),
        "scroll_begin" => Some("scroll_begin"),
        "scroll_update" => Some("scroll_update"),
        "scroll_end" => Some("scroll_end"),
        "pinch_begin" => Some("pinch_begin"),
        "pinch_update" => Some("pinch_update"),
        "pinch_end" => Some("pinch_end"),
        _ => None,
    }
}
