use carepoint_core::{
    share_record, Appointment, AppointmentBook, ChatSession, ClinicalRecord, CoreConfig,
    CoreError, DocumentRenderer, FileClipboard, PrescriptionGenerator, Sender, ShareOutcome,
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "carepoint")]
#[command(about = "Carepoint prescription and portal CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a prescription record as printable HTML
    Render {
        /// Record file (YAML, or JSON with a .json extension)
        record: PathBuf,
        /// Write the HTML here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Run the generate flow (with its configured delay), then write the HTML
    Generate {
        /// Record file (YAML, or JSON with a .json extension)
        record: PathBuf,
        /// Write the HTML here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the plain-text summary of a prescription record
    Summary {
        /// Record file (YAML, or JSON with a .json extension)
        record: PathBuf,
    },
    /// Share a prescription; without a share surface the summary is copied to a file
    Share {
        /// Record file (YAML, or JSON with a .json extension)
        record: PathBuf,
        /// File standing in for the clipboard
        #[arg(long, default_value = "prescription.txt")]
        clipboard_file: PathBuf,
    },
    /// List appointments split into upcoming and past
    Appointments {
        /// Appointments fixture (defaults to the bundled demo data)
        #[arg(long)]
        fixture: Option<PathBuf>,
        /// Reference day (YYYY-MM-DD), defaults to today
        #[arg(long)]
        today: Option<String>,
    },
    /// Send a message to the chat assistant and print the transcript
    Chat {
        /// Message words
        #[arg(required = true)]
        message: Vec<String>,
    },
}

fn write_output(html: &str, out: Option<&Path>) -> Result<(), CoreError> {
    match out {
        Some(path) => {
            std::fs::write(path, html).map_err(|source| CoreError::FileWrite {
                path: path.to_path_buf(),
                source,
            })?;
            println!("Wrote prescription to {}", path.display());
        }
        None => print!("{}", html),
    }
    Ok(())
}

/// One listing line; the location is appended only when asked for and known.
fn appointment_line(a: &Appointment, with_location: bool) -> String {
    let mut line = format!(
        "  {} {} - {} ({}), {} [{}]",
        a.date, a.time, a.doctor, a.specialty, a.kind, a.status
    );
    if let Some(location) = a.location.as_deref().filter(|_| with_location) {
        line.push(' ');
        line.push_str(location);
    }
    line
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = CoreConfig::from_lookup(|key| std::env::var(key).ok())?;
    let renderer = DocumentRenderer::new(cfg.letterhead().clone());

    match cli.command {
        Some(Commands::Render { record, out }) => match ClinicalRecord::load(&record) {
            Ok(record) => {
                let document = renderer.generate(&record);
                if let Err(e) = write_output(document.html(), out.as_deref()) {
                    eprintln!("Error writing prescription: {}", e);
                }
            }
            Err(e) => eprintln!("Error loading record: {}", e),
        },
        Some(Commands::Generate { record, out }) => match ClinicalRecord::load(&record) {
            Ok(record) => {
                let mut generator = PrescriptionGenerator::new(record, renderer);
                eprintln!("Generating...");
                let html = generator
                    .run(cfg.generation_delay(), |_| {})
                    .await?
                    .html()
                    .to_string();
                if let Some(confirmation) = generator.confirmation() {
                    eprintln!("{}", confirmation);
                }
                if let Err(e) = write_output(&html, out.as_deref()) {
                    eprintln!("Error writing prescription: {}", e);
                }
            }
            Err(e) => eprintln!("Error loading record: {}", e),
        },
        Some(Commands::Summary { record }) => match ClinicalRecord::load(&record) {
            Ok(record) => print!("{}", renderer.summarize(&record)),
            Err(e) => eprintln!("Error loading record: {}", e),
        },
        Some(Commands::Share {
            record,
            clipboard_file,
        }) => match ClinicalRecord::load(&record) {
            Ok(record) => {
                let clipboard = FileClipboard::new(&clipboard_file);
                match share_record(&record, None, &clipboard) {
                    Ok(ShareOutcome::Copied) => println!(
                        "Prescription details copied to {}",
                        clipboard_file.display()
                    ),
                    Ok(ShareOutcome::Shared) => println!("Prescription shared"),
                    Ok(ShareOutcome::Failed(reason)) => eprintln!("Error sharing: {}", reason),
                    Err(e) => eprintln!("Error copying prescription: {}", e),
                }
            }
            Err(e) => eprintln!("Error loading record: {}", e),
        },
        Some(Commands::Appointments { fixture, today }) => {
            let book = match fixture {
                Some(path) => AppointmentBook::load(&path)?,
                None => AppointmentBook::demo(),
            };
            let today = match today {
                Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")?,
                None => chrono::Local::now().date_naive(),
            };

            println!("Upcoming appointments:");
            let upcoming = book.upcoming(today);
            if upcoming.is_empty() {
                println!("  None.");
            }
            for a in upcoming {
                println!("{}", appointment_line(a, true));
            }

            println!("Past appointments:");
            let past = book.past(today);
            if past.is_empty() {
                println!("  None.");
            }
            for a in past {
                println!("{}", appointment_line(a, false));
            }
        }
        Some(Commands::Chat { message }) => {
            let mut session = ChatSession::new();
            session.open();
            let input = message.join(" ");
            if session
                .send_and_reply(&input, cfg.chat_reply_delay())
                .await
                .is_none()
            {
                eprintln!("Message cannot be blank");
            }
            for m in session.messages() {
                let who = match m.sender {
                    Sender::Bot => "assistant",
                    Sender::User => "you",
                };
                println!("[{}] {}: {}", m.timestamp.format("%H:%M"), who, m.content);
            }
        }
        None => {
            println!("Use 'carepoint --help' for commands");
        }
    }

    Ok(())
}
