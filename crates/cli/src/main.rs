use std::error::Error;
use std::io::BufRead;
use std::path::PathBuf;
use std::process;
use std::thread;

use clap::Parser;
use crossbeam_channel::{select, Receiver};

use dictate_core::export::infrastructure::command_clipboard::CommandClipboard;
use dictate_core::export::infrastructure::text_file_exporter::TextFileExporter;
use dictate_core::session::domain::controller::SessionController;
use dictate_core::session::domain::recognizer::{RecognitionEvent, SessionConfig};
use dictate_core::session::domain::view::{NullSessionView, StdoutSessionView};
use dictate_core::session::infrastructure::fixed_gate::FixedGate;
use dictate_core::session::infrastructure::replay_recognizer::{ReplayRecognizer, ReplayScript};
use dictate_core::shared::constants::DEFAULT_LANGUAGE;

/// Live speech-to-text transcription with transcript management.
///
/// Replays a recorded recognition session (JSON Lines, one event per
/// line) through the session controller. Interactive mode offers the
/// usual controls as commands; batch mode runs the session to completion
/// and prints the final transcript.
#[derive(Parser)]
#[command(name = "dictate")]
struct Cli {
    /// Recorded recognition session to replay (JSON Lines).
    script: PathBuf,

    /// Recognition language tag.
    #[arg(long, default_value = DEFAULT_LANGUAGE)]
    lang: String,

    /// Hide interim (not yet finalized) results.
    #[arg(long)]
    no_interim: bool,

    /// Directory for saved transcripts (default: platform download dir).
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Start immediately, run the session to completion, print the
    /// transcript, and exit.
    #[arg(long)]
    batch: bool,

    /// Ignore scripted delays and deliver events back-to-back.
    #[arg(long)]
    no_delay: bool,

    /// Copy the final transcript to the clipboard (batch mode).
    #[arg(long, requires = "batch")]
    copy: bool,

    /// Save the final transcript to the export directory (batch mode).
    #[arg(long, requires = "batch")]
    save: bool,

    /// Simulate a denied microphone permission.
    #[arg(long)]
    deny_mic: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let script = ReplayScript::load(&cli.script)?;
    log::debug!("loaded {} scripted events from {}", script.len(), cli.script.display());
    let (events_tx, events_rx) = crossbeam_channel::unbounded();
    let recognizer = ReplayRecognizer::new(script, events_tx).honor_delays(!cli.no_delay);

    let gate = if cli.deny_mic {
        FixedGate::denied()
    } else {
        FixedGate::granted()
    };
    let export_dir = cli
        .export_dir
        .clone()
        .unwrap_or_else(TextFileExporter::default_dir);
    let config = SessionConfig {
        language: cli.lang.clone(),
        interim_results: !cli.no_interim,
    };

    let mut controller = SessionController::new(
        Some(Box::new(recognizer)),
        Box::new(gate),
        Box::new(CommandClipboard::system()),
        Box::new(TextFileExporter::new(export_dir)),
        if cli.batch {
            Box::new(NullSessionView)
        } else {
            Box::new(StdoutSessionView::new())
        },
        config,
    );

    if cli.batch {
        run_batch(&mut controller, &events_rx, cli.copy, cli.save)
    } else {
        run_interactive(&mut controller, &events_rx);
        Ok(())
    }
}

fn run_batch(
    controller: &mut SessionController,
    events_rx: &Receiver<RecognitionEvent>,
    copy: bool,
    save: bool,
) -> Result<(), Box<dyn Error>> {
    controller.start();
    if !controller.is_session_active() {
        return Err("recognition session did not start".into());
    }

    for event in events_rx.iter() {
        let ended = event == RecognitionEvent::Ended;
        controller.handle_event(event);
        if ended {
            break;
        }
    }

    println!("{}", controller.displayed());
    if copy {
        controller.copy();
    }
    if save {
        controller.save();
    }
    Ok(())
}

fn run_interactive(controller: &mut SessionController, events_rx: &Receiver<RecognitionEvent>) {
    println!("dictate — type `help` for commands");

    let (commands_tx, commands_rx) = crossbeam_channel::unbounded::<String>();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if commands_tx.send(line).is_err() {
                break;
            }
        }
    });

    loop {
        select! {
            recv(events_rx) -> event => {
                let Ok(event) = event else { break };
                controller.handle_event(event);
            }
            recv(commands_rx) -> line => {
                // Closed stdin ends the program.
                let Ok(line) = line else {
                    controller.stop();
                    break;
                };
                if !dispatch(controller, &line) {
                    break;
                }
            }
        }
    }
}

/// Applies one command line. Returns false when the program should exit.
fn dispatch(controller: &mut SessionController, line: &str) -> bool {
    let mut parts = line.split_whitespace();
    match parts.next() {
        None => {}
        Some("start") => controller.start(),
        Some("stop") => controller.stop(),
        Some("clear") => controller.clear(),
        Some("copy") => controller.copy(),
        Some("save") => controller.save(),
        Some("show") => println!("{}", controller.displayed()),
        Some("interim") => match parts.next() {
            Some("on") => controller.set_interim_enabled(true),
            Some("off") => controller.set_interim_enabled(false),
            _ => println!("usage: interim on|off"),
        },
        Some("lang") => match parts.next() {
            Some(tag) => {
                controller.set_language(tag);
                println!("language set to {tag} (applies on next start)");
            }
            None => println!("usage: lang <tag>"),
        },
        Some("status") => println!(
            "state: {:?}, language: {}, interim: {}",
            controller.state(),
            controller.language(),
            if controller.interim_enabled() { "on" } else { "off" },
        ),
        Some("help") => print_help(),
        Some("quit") | Some("exit") => {
            controller.stop();
            return false;
        }
        Some(other) => println!("unknown command: {other} (try `help`)"),
    }
    true
}

fn print_help() {
    println!(
        "\
commands:
  start           begin a recognition session (resets the transcript)
  stop            end the session (transcript is kept)
  clear           empty the transcript
  copy            copy the displayed transcript to the clipboard
  save            save the displayed transcript as a timestamped .txt
  show            print the displayed transcript
  interim on|off  show or hide interim results
  lang <tag>      set the recognition language for the next start
  status          print session state and settings
  quit            stop and exit"
    );
}
