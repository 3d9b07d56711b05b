// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use tracing::{warn, Level};

use scale_trainer::audio::{AudioSink, CaptureSink, SynthOutput};
use scale_trainer::config::{Settings, SettingsEvent, SettingsWatcher};
use scale_trainer::music::{
    all_scales, assign_octaves, display_pitches, enharmonic_equivalent, resolve, staff_notes,
    AccidentalMark, KeySignature, Scale, ScaleForm, ScaleType,
};
use scale_trainer::playback::{PlaybackEvent, PlaybackMode, PlaybackPlan, Player, Tempo};
use scale_trainer::practice::{Confidence, PracticeSession};
use scale_trainer::storage::{FileStore, PracticeRepository};

const DEFAULT_DATA_FILE: &str = "practice.json";
const DEFAULT_SETTINGS_FILE: &str = "settings.yaml";

fn print_usage() {
    println!("scale-trainer - Piano scale practice");
    println!();
    println!("Usage: scale-trainer [-v] [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --list [TYPE]                  List catalog scales (major, natural-minor, ...)");
    println!("  --show <SCALE>                 Show spelling, octaves, keys and staff marks");
    println!("  --enharmonic <ALT NAME>        Build an enharmonic spelling, e.g. \"Gb Major\"");
    println!("  --play <SCALE> [up|down|updown] [slow|medium|fast] [--silent]");
    println!("                                 Play a scale");
    println!("  --daily [DATA] [SETTINGS]      Run today's practice session");
    println!("                                 (defaults: {}, {})", DEFAULT_DATA_FILE, DEFAULT_SETTINGS_FILE);
    println!("  --watch [SETTINGS]             Print settings whenever the file changes");
    println!("  --help                         Show this help message");
    println!("  -v                             Verbose logging");
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn spelled(notes: &[scale_trainer::music::Note]) -> String {
    notes
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn list_scales(filter: Option<&str>) -> Result<()> {
    let scale_type = match filter {
        Some(name) => Some(
            ScaleType::from_str(name).ok_or_else(|| anyhow!("Unknown scale type: {}", name))?,
        ),
        None => None,
    };

    for scale in all_scales()
        .iter()
        .filter(|s| scale_type.map_or(true, |t| s.scale_type() == t))
    {
        match scale.alt_name() {
            Some(alt) => println!(
                "{:<22} {:<28} (also {})",
                scale.name(),
                spelled(scale.notes()),
                alt
            ),
            None => println!("{:<22} {}", scale.name(), spelled(scale.notes())),
        }
    }
    Ok(())
}

fn mark_symbol(mark: AccidentalMark) -> &'static str {
    match mark {
        AccidentalMark::None => "",
        AccidentalMark::Natural => "natural",
        AccidentalMark::Sharp => "#",
        AccidentalMark::Flat => "b",
        AccidentalMark::DoubleSharp => "x",
        AccidentalMark::DoubleFlat => "bb",
    }
}

fn print_scale(scale: &Scale, start_octave: i32) {
    println!("{}", scale.name());
    if let Some(alt) = scale.alt_name() {
        println!("  Also known as: {}", alt);
    }
    println!("  Notes:      {}", spelled(scale.notes()));
    if let Some(desc) = scale.notes_descending() {
        println!("  Descending: {}", spelled(desc));
    }

    let notes = scale.with_octave_root(ScaleForm::Ascending);
    println!("  Octaves:    {:?}", assign_octaves(&notes, start_octave));

    let keys: Vec<String> = display_pitches(scale, ScaleForm::Ascending, start_octave)
        .iter()
        .map(|p| p.keyboard_key().label())
        .collect();
    println!("  Keys:       {}", keys.join(" "));

    if let Some(signature) = KeySignature::for_scale(scale) {
        let sig = match (signature.sharps(), signature.flats()) {
            (0, 0) => "no sharps or flats".to_string(),
            (s, 0) => format!("{} sharp(s)", s),
            (_, f) => format!("{} flat(s)", f),
        };
        println!("  Signature:  {}", sig);
    }
    let staff: Vec<String> = staff_notes(scale, ScaleForm::Ascending, start_octave)
        .iter()
        .map(|n| format!("{}{}{}", n.letter, mark_symbol(n.mark), n.written_octave))
        .collect();
    println!("  Staff:      {}", staff.join(" "));
}

fn show_scale(name: &str) -> Result<()> {
    let scale = resolve(name).ok_or_else(|| anyhow!("Unknown scale: {}", name))?;
    print_scale(&scale, Settings::default().start_octave);
    Ok(())
}

fn show_enharmonic(alt_name: &str) -> Result<()> {
    let scale = enharmonic_equivalent(alt_name)
        .ok_or_else(|| anyhow!("No catalog scale has the alternative name {}", alt_name))?;
    print_scale(&scale, Settings::default().start_octave);
    Ok(())
}

/// Open the speakers, or fall back to a silent sink
fn open_sink(settings: &Settings, silent: bool) -> Arc<dyn AudioSink> {
    if silent {
        return Arc::new(CaptureSink::new());
    }
    let output = SynthOutput::new(settings.audio.clone());
    match output.ensure_ready() {
        Ok(()) => Arc::new(output),
        Err(e) => {
            warn!("Audio unavailable ({}), playing silently", e);
            Arc::new(CaptureSink::new())
        }
    }
}

async fn play_scale(
    scale: &Scale,
    mode: PlaybackMode,
    tempo: Tempo,
    player: &Player,
    start_octave: i32,
) -> Result<()> {
    let plan = PlaybackPlan::build(scale, mode, tempo, start_octave);
    println!("Playing {} ({}, {})", scale.name(), mode, tempo);

    let mut playback = player.play(&plan)?;
    while let Some(event) = playback.next_event().await {
        match event {
            PlaybackEvent::NoteStarted {
                display_index,
                label,
                pitch,
                ..
            } => {
                println!(
                    "  [{}] {:<5} key {}",
                    display_index,
                    label,
                    pitch.keyboard_key().label()
                );
            }
            PlaybackEvent::DirectionChanged { .. } => println!("  -- descending --"),
            PlaybackEvent::Cleared { .. } => {}
        }
    }
    Ok(())
}

async fn run_play(args: &[String]) -> Result<()> {
    let name = args
        .first()
        .ok_or_else(|| anyhow!("--play requires a scale name"))?;
    let scale = resolve(name).ok_or_else(|| anyhow!("Unknown scale: {}", name))?;

    let settings = Settings::load_or_default(DEFAULT_SETTINGS_FILE)?;
    let mut mode = settings.playback_mode;
    let mut tempo = settings.tempo;
    let mut silent = false;
    for arg in &args[1..] {
        if arg == "--silent" {
            silent = true;
        } else if let Some(m) = PlaybackMode::from_str(arg) {
            mode = m;
        } else if let Some(t) = Tempo::from_str(arg) {
            tempo = t;
        } else {
            return Err(anyhow!("Unknown play option: {}", arg));
        }
    }

    let player = Player::new(open_sink(&settings, silent));
    play_scale(&scale, mode, tempo, &player, settings.start_octave).await?;
    player.dispose();
    Ok(())
}

fn prompt_confidence(scale: &str) -> Result<Option<Confidence>> {
    let stdin = io::stdin();
    loop {
        print!("How did {} go? 1 needs work, 2 getting there, 3 mastered (enter to stop): ", scale);
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        match line.parse::<u8>().ok().and_then(|n| Confidence::try_from(n).ok()) {
            Some(confidence) => return Ok(Some(confidence)),
            None => println!("Please enter 1, 2 or 3."),
        }
    }
}

async fn run_daily(data_path: &str, settings_path: &str) -> Result<()> {
    let settings = Settings::load_or_default(settings_path)?;
    let store = FileStore::open(data_path)
        .with_context(|| format!("Failed to open practice data: {}", data_path))?;
    let mut repo = PracticeRepository::new(store);

    let now = Utc::now();
    let today = now.date_naive();
    let mut session = match repo.session(today) {
        Some(session) => session,
        None => {
            let mut rng = rand::thread_rng();
            let session = PracticeSession::start(
                &repo.history(),
                &settings.enabled_scale_types.enabled(),
                settings.daily_scale_count,
                now,
                &mut rng,
            );
            repo.save_session(&session)?;
            session
        }
    };

    if session.scales().is_empty() {
        println!("No scales to practice. Enable a scale type in {}.", settings_path);
        return Ok(());
    }
    println!("Today's scales: {}", session.scales().join(", "));

    let player = Player::new(open_sink(&settings, false));
    while let Some(scale) = session.current() {
        println!();
        print_scale(&scale, settings.start_octave);
        play_scale(
            &scale,
            settings.playback_mode,
            settings.tempo,
            &player,
            settings.start_octave,
        )
        .await?;

        let Some(confidence) = prompt_confidence(scale.name())? else {
            break;
        };
        repo.record_feedback(&mut session, confidence, Utc::now())?;
    }
    player.dispose();

    if session.is_complete() {
        println!("Practice complete for {}.", today);
    }
    Ok(())
}

async fn watch_settings(path: &str) -> Result<()> {
    let mut events = SettingsWatcher::new(Path::new(path), None)?.into_channel()?;
    println!("Watching {} (press Ctrl+C to stop)...", path);
    while let Some(event) = events.recv().await {
        match event {
            SettingsEvent::Reloaded(settings) => println!("{}", settings.to_yaml()?),
            SettingsEvent::Error(e) => eprintln!("Error: {}", e),
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut args: Vec<String> = env::args().collect();
    let verbose = args.iter().any(|a| a == "-v");
    args.retain(|a| a != "-v");
    init_logging(verbose);

    if args.len() < 2 {
        println!("scale-trainer - Piano scale practice");
        println!("Run with --help for usage information");
        return Ok(());
    }

    match args[1].as_str() {
        "--list" => {
            list_scales(args.get(2).map(String::as_str))?;
        }
        "--show" => {
            if args.len() < 3 {
                eprintln!("Error: --show requires a scale name");
                eprintln!("Use --list to see available scales");
                std::process::exit(1);
            }
            show_scale(&args[2])?;
        }
        "--enharmonic" => {
            if args.len() < 3 {
                eprintln!("Error: --enharmonic requires an alternative name, e.g. \"Gb Major\"");
                std::process::exit(1);
            }
            show_enharmonic(&args[2])?;
        }
        "--play" => {
            run_play(&args[2..]).await?;
        }
        "--daily" => {
            let data = args.get(2).map(String::as_str).unwrap_or(DEFAULT_DATA_FILE);
            let settings = args.get(3).map(String::as_str).unwrap_or(DEFAULT_SETTINGS_FILE);
            run_daily(data, settings).await?;
        }
        "--watch" => {
            let settings = args.get(2).map(String::as_str).unwrap_or(DEFAULT_SETTINGS_FILE);
            watch_settings(settings).await?;
        }
        "--help" | "-h" => {
            print_usage();
        }
        _ => {
            eprintln!("Unknown option: {}", args[1]);
            print_usage();
            std::process::exit(1);
        }
    }

    Ok(())
}
