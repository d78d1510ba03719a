//! chordwheel: command-line front end for the chord wheel core

mod config;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chordwheel_core::{
    apply_voicing, chord_to_numeral, contrasting_text_color, diatonic_chords,
    format_chord_for_display, mode_scale, parse_note, parse_numeral, parse_voicing_suggestions,
    wheel_colors, Chord, ChordQuality, EditCommand, EditIntent, Key, Mode, Section, Session,
    Song, Spelling, Transport, Voicing,
};

#[derive(Parser)]
#[command(name = "chordwheel")]
#[command(
    author,
    version,
    about = "Chord wheel theory queries and song sketching",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path (default: <config dir>/chordwheel/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Spell a chord from a root and quality
    Chord {
        root: String,
        #[arg(default_value = "major")]
        quality: String,
        #[arg(short, long, default_value = "0")]
        inversion: u8,
        #[arg(long, value_enum, default_value = "close")]
        voicing: VoicingArg,
        /// Also show the roman numeral in this key
        #[arg(short, long)]
        key: Option<String>,
    },
    /// Resolve a roman numeral in a key
    Numeral {
        numeral: String,
        #[arg(short, long)]
        key: Option<String>,
        #[arg(long)]
        minor: bool,
    },
    /// List a scale, optionally in a mode
    Scale {
        root: String,
        #[arg(short, long, default_value = "ionian")]
        mode: String,
        /// Also list the diatonic seventh chords
        #[arg(long)]
        sevenths: bool,
    },
    /// Show the wheel palette
    Colors,
    /// Expand a voicing hint such as "maj7, maj9 or 6"
    Suggest {
        text: String,
        #[arg(short, long, default_value = "major")]
        base: String,
    },
    /// Sketch a short song through the editor and print it
    Demo,
    /// Show the configuration file path
    ConfigPath,
}

#[derive(Clone, Copy, ValueEnum)]
enum VoicingArg {
    Close,
    Open,
    Drop2,
    Drop3,
    RootBass,
}

impl From<VoicingArg> for Voicing {
    fn from(arg: VoicingArg) -> Self {
        match arg {
            VoicingArg::Close => Voicing::Close,
            VoicingArg::Open => Voicing::Open,
            VoicingArg::Drop2 => Voicing::Drop2,
            VoicingArg::Drop3 => Voicing::Drop3,
            VoicingArg::RootBass => Voicing::RootBass,
        }
    }
}

#[derive(Serialize)]
struct ChordReport {
    symbol: String,
    display: String,
    notes: Vec<String>,
    midi: Vec<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    numeral: Option<String>,
}

#[derive(Serialize)]
struct ScaleReport {
    tonic: String,
    mode: String,
    notes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    chords: Vec<String>,
}

#[derive(Serialize)]
struct ColorRow {
    pitch_class: String,
    background: String,
    text: String,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("chordwheel=info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => config::load_config_from(path)?,
        None => config::load_config(),
    };
    let out = Output {
        json: cli.json,
        ascii: config.display.ascii,
    };

    match cli.command {
        Commands::Chord {
            root,
            quality,
            inversion,
            voicing,
            key,
        } => {
            let root = parse_note(&root)?;
            let quality: ChordQuality = quality.parse()?;
            let chord = Chord::with_inversion(root, quality, inversion);
            let key = key.map(|k| parse_note(&k).map(Key::major)).transpose()?;
            let notes = apply_voicing(&chord.notes, chord.root, voicing.into());
            let report = ChordReport {
                numeral: key.and_then(|k| chord_to_numeral(&chord, &k)),
                ..out.chord_report(&chord, &notes)
            };
            out.print(&report, || print_chord(&report))?;
        }
        Commands::Numeral { numeral, key, minor } => {
            let key = match key {
                Some(k) => Key::major(parse_note(&k)?),
                None => config.session.key(),
            };
            let key = if minor { Key::minor(key.root) } else { key };
            let chord = parse_numeral(&numeral)?.to_chord(&key);
            let report = ChordReport {
                numeral: Some(numeral),
                ..out.chord_report(&chord, &chord.notes)
            };
            out.print(&report, || {
                println!("{} in {}", report.numeral.as_deref().unwrap_or_default(), key);
                print_chord(&report);
            })?;
        }
        Commands::Scale { root, mode, sevenths } => {
            let tonic = parse_note(&root)?;
            let Some(mode) = Mode::from_name(&mode) else {
                bail!("unknown mode '{}'", mode);
            };
            let scale = mode_scale(tonic, mode);
            let chords: Vec<String> = if sevenths {
                let parent = Key::major(scale[(7 - mode.degree_index()) % 7]);
                let mut all = diatonic_chords(&parent, true);
                all.rotate_left(mode.degree_index());
                all.iter().map(|c| out.symbol(&c.symbol)).collect()
            } else {
                Vec::new()
            };
            let report = ScaleReport {
                tonic: tonic.name().to_string(),
                mode: mode.name().to_string(),
                notes: scale.iter().map(|pc| pc.name().to_string()).collect(),
                chords,
            };
            out.print(&report, || {
                println!("{} {}: {}", report.tonic, report.mode, report.notes.join(" "));
                if !report.chords.is_empty() {
                    println!("  {}", report.chords.join("  "));
                }
            })?;
        }
        Commands::Colors => {
            let rows: Vec<ColorRow> = wheel_colors()
                .into_iter()
                .map(|(pc, bg)| ColorRow {
                    pitch_class: pc.name().to_string(),
                    background: bg.to_string(),
                    text: contrasting_text_color(bg).to_string(),
                })
                .collect();
            out.print(&rows, || {
                for row in &rows {
                    println!("{:<3} {}  text {}", row.pitch_class, row.background, row.text);
                }
            })?;
        }
        Commands::Suggest { text, base } => {
            let base: ChordQuality = base.parse()?;
            let options = parse_voicing_suggestions(&text, base);
            out.print(&options, || {
                for option in &options {
                    println!("{:<8} {}", option.quality.suffix(), option.label);
                }
            })?;
        }
        Commands::Demo => {
            let song = demo_song(config.session.clone())?;
            out.print(&song, || print_song(&song, &out))?;
        }
        Commands::ConfigPath => {
            println!("{}", config::config_path().display());
        }
    }

    Ok(())
}

struct Output {
    json: bool,
    ascii: bool,
}

impl Output {
    fn print<T: Serialize>(&self, value: &T, text: impl FnOnce()) -> Result<()> {
        if self.json {
            let rendered = serde_json::to_string_pretty(value).context("serializing output")?;
            println!("{}", rendered);
        } else {
            text();
        }
        Ok(())
    }

    fn symbol(&self, symbol: &str) -> String {
        if self.ascii {
            symbol.to_string()
        } else {
            format_chord_for_display(symbol)
        }
    }

    fn chord_report(&self, chord: &Chord, notes: &[chordwheel_core::Note]) -> ChordReport {
        ChordReport {
            symbol: chord.symbol.clone(),
            display: self.symbol(&chord.symbol),
            notes: notes.iter().map(|n| n.to_string()).collect(),
            midi: notes.iter().map(|n| n.midi()).collect(),
            numeral: None,
        }
    }
}

fn print_chord(report: &ChordReport) {
    match &report.numeral {
        Some(numeral) => println!("{} ({})", report.display, numeral),
        None => println!("{}", report.display),
    }
    println!("  notes: {}", report.notes.join(" "));
}

/// Verse/chorus sketch in the configured key, built entirely from commands
fn demo_song(config: chordwheel_core::SessionConfig) -> Result<Song> {
    let mut session = Session::new(config);
    let key = session.song().key;

    session.dispatch(&EditCommand::SetTitle("Wheel Demo".into()));
    let verse = session.song().sections[0].id;
    session.dispatch(&EditCommand::SetSectionMeasures { section: verse, count: 4 });
    session.dispatch(&EditCommand::SetSectionSubdivision { section: verse, steps: 1 });

    for (i, numeral) in ["I", "vi", "IV", "V"].iter().enumerate() {
        let at = session.song().slot_refs()[i];
        session.select_chord(Some(chordwheel_core::numeral_to_chord(numeral, &key)));
        session.place_selected_chord(at);
    }

    session.dispatch(&EditCommand::AddSuggestedSection);
    let chorus = session
        .song()
        .sections
        .last()
        .map(|s| s.id)
        .context("demo song lost its sections")?;
    session.dispatch(&EditCommand::SetSectionSubdivision { section: chorus, steps: 1 });
    let chorus_slots: Vec<_> = session
        .song()
        .slot_refs()
        .into_iter()
        .filter(|at| at.section == chorus)
        .collect();
    for (at, numeral) in chorus_slots.iter().zip(["IV", "V", "iii", "vi"]) {
        session.dispatch(&EditCommand::SetSlotChord {
            slot: *at,
            chord: Some(chordwheel_core::numeral_to_chord(numeral, &key)),
        });
    }

    // Try the chorus first, then think better of it
    session.handle_intent(EditIntent::ReorderRequested { from: 1, to: 0 });
    session.undo();

    tracing::info!(
        "Demo song built with {} sections (undo available: {})",
        session.song().sections.len(),
        session.can_undo()
    );
    Ok(session.song().clone())
}

fn print_song(song: &Song, out: &Output) {
    let spelling = song.key.spelling();
    println!(
        "{} - {} bpm, {}, {} ({})",
        song.title,
        song.tempo,
        song.time_signature,
        song.key,
        song.instrument.name()
    );
    for section in &song.sections {
        let bars: Vec<String> = section
            .measures
            .iter()
            .map(|m| {
                m.beats
                    .iter()
                    .map(|slot| match &slot.chord {
                        Some(chord) => out.symbol(&spelled(chord, spelling)),
                        None => "-".to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();
        let length = Transport::format_time(section_secs(song, section));
        println!("  {:<10} {} | {} |", section.name, length, bars.join(" | "));
    }
}

/// Playing time of one section at the song tempo
fn section_secs(song: &Song, section: &Section) -> f64 {
    song.slot_refs()
        .into_iter()
        .filter(|at| at.section == section.id)
        .filter_map(|at| Transport::slot_duration_secs(song, at))
        .sum()
}

/// Chord symbol with the root spelled for the song key
fn spelled(chord: &Chord, spelling: Spelling) -> String {
    match chord.symbol.strip_prefix(chord.root.name()) {
        Some(rest) => format!("{}{}", chord.root.spelled(spelling), rest),
        None => chord.symbol.clone(),
    }
}
