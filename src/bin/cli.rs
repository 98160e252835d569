//! Cardioscope CLI
//!
//! Command-line access to the analysis backend:
//! - Sign in, register and check the current identity
//! - Upload an ECG with the screening questionnaire
//! - Browse patients and score history (clinicians)

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use cardioscope::auth::{AuthForm, AuthMode, AuthOutcome, MemberType};
use cardioscope::client::{Backend, HttpBackend, ImageBytes};
use cardioscope::clinician::{gauge_color, history_color};
use cardioscope::config::{generate_default_config, Config};
use cardioscope::dashboard::DashboardView;
use cardioscope::gate::{AccessGate, GateDecision};
use cardioscope::model::{chronological, Session};
use cardioscope::questionnaire::{self, FIELDS};
use cardioscope::upload::{mime_for_path, Attachment, UploadForm};

#[derive(Parser)]
#[command(name = "cardioscope")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "ECG screening from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend URL (overrides config)
    #[arg(long, global = true)]
    pub backend_url: Option<String>,

    /// Config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Sign in as this user before running the command
    #[arg(short, long, env = "CARDIOSCOPE_USERNAME", global = true)]
    pub username: Option<String>,

    /// Password for --username
    #[arg(short, long, env = "CARDIOSCOPE_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: Format,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show who the backend thinks you are
    Whoami,

    /// Check credentials against the backend
    Login,

    /// Create an account
    Register {
        /// Member type
        #[arg(short, long, value_parser = ["user", "pro"])]
        member_type: String,
    },

    /// Upload an ECG image with the questionnaire
    Upload {
        /// ECG image (JPEG or PNG)
        ecg: PathBuf,
        /// Health checkup image (JPEG or PNG)
        #[arg(long)]
        checkup: Option<PathBuf>,
        /// Questionnaire answer in key=value format. Checkboxes take true/false.
        #[arg(short, long = "answer")]
        answers: Vec<String>,
    },

    /// List questionnaire fields
    Fields,

    /// List patients (clinicians)
    Patients,

    /// Show a patient's risk score breakdown (clinicians)
    Patient {
        id: u64,
    },

    /// Show a patient's score history (clinicians)
    History {
        id: u64,
    },

    /// Print a default config file
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config = cli.command {
        print!("{}", generate_default_config());
        return Ok(());
    }
    if let Commands::Fields = cli.command {
        print_fields();
        return Ok(());
    }

    let mut config = Config::resolve(cli.config.as_deref())?;
    if let Some(url) = &cli.backend_url {
        config.backend.url = url.clone();
    }
    let backend = HttpBackend::from_config(&config.backend)?;

    match &cli.command {
        Commands::Whoami => {
            let session = current_session(&cli, &backend).await?;
            match session {
                Some(session) => println!("{} ({})", session.username, session.role),
                None => println!("Not signed in"),
            }
        }

        Commands::Login => {
            let session = sign_in(&cli, &backend)
                .await?
                .ok_or_else(|| anyhow!("--username and --password are required"))?;
            println!("Signed in as {} ({})", session.username, session.role);
            backend.logout().await.ok();
        }

        Commands::Register { member_type } => {
            let (username, password) = credentials(&cli)?;
            let form = AuthForm {
                mode: AuthMode::Register,
                username,
                password,
                member_type: MemberType::from_token(member_type),
            };
            let request = form.prepare()?;
            match request.outcome(backend.authenticate(&request).await) {
                AuthOutcome::Registered(message) => println!("{}", message),
                AuthOutcome::Failed(message) => bail!(message),
                AuthOutcome::SignedIn(session) => println!("Signed in as {}", session.username),
            }
        }

        Commands::Upload {
            ecg,
            checkup,
            answers,
        } => {
            sign_in(&cli, &backend).await?;
            upload(&cli, &backend, ecg, checkup.as_deref(), answers).await?;
        }

        Commands::Patients => {
            require_professional(&cli, &backend).await?;
            let patients = backend.patients().await?;
            match cli.format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&patients)?),
                Format::Csv => {
                    let mut writer = csv::Writer::from_writer(std::io::stdout());
                    writer.write_record(["id", "name", "status"])?;
                    for p in &patients {
                        writer.write_record([p.id.to_string(), p.name.clone(), p.status.as_str().to_string()])?;
                    }
                    writer.flush()?;
                }
                Format::Table => {
                    if patients.is_empty() {
                        println!("No patients.");
                    }
                    println!("{:<8} {:<24} {}", "ID", "Name", "Status");
                    println!("{}", "-".repeat(48));
                    for p in &patients {
                        println!("{:<8} {:<24} {}", p.id, p.name, p.status.label());
                    }
                }
            }
        }

        Commands::Patient { id } => {
            require_professional(&cli, &backend).await?;
            let detail = backend.patient_info(*id).await?;
            match cli.format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&detail)?),
                Format::Csv => {
                    let mut writer = csv::Writer::from_writer(std::io::stdout());
                    writer.write_record(["factor", "points"])?;
                    for row in detail.rubric() {
                        writer.write_record([
                            row.key.to_string(),
                            row.points.map(|p| p.to_string()).unwrap_or_default(),
                        ])?;
                    }
                    writer.flush()?;
                }
                Format::Table => {
                    println!("Patient {}", detail.patient_id);
                    println!(
                        "Total score: {:.0} ({}, {})",
                        detail.total_score,
                        detail.risk_class,
                        gauge_color(detail.total_score).hex()
                    );
                    println!();
                    println!("{:<28} {}", "Risk factor", "Points");
                    println!("{}", "-".repeat(40));
                    for row in detail.rubric() {
                        let points = row
                            .points
                            .map(|p| format!("{}", p))
                            .unwrap_or_else(|| "-".to_string());
                        println!("{:<28} {}", row.label, points);
                    }
                }
            }
        }

        Commands::History { id } => {
            require_professional(&cli, &backend).await?;
            let history = chronological(backend.score_history(*id).await?);
            match cli.format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&history)?),
                Format::Csv => {
                    let mut writer = csv::Writer::from_writer(std::io::stdout());
                    writer.write_record(["timestamp", "date", "score"])?;
                    for entry in &history {
                        writer.write_record([
                            entry.timestamp.clone(),
                            entry.short_date(),
                            entry.score.to_string(),
                        ])?;
                    }
                    writer.flush()?;
                }
                Format::Table => {
                    if history.is_empty() {
                        println!("No score history.");
                    }
                    for entry in &history {
                        let bar = "#".repeat((entry.score.clamp(0.0, 100.0) / 5.0).round() as usize);
                        println!(
                            "{:<8} {:>5.0} {} {}",
                            entry.short_date(),
                            entry.score,
                            history_color(entry.score).hex(),
                            bar
                        );
                    }
                }
            }
        }

        Commands::Config | Commands::Fields => {}
    }

    Ok(())
}

fn credentials(cli: &Cli) -> anyhow::Result<(String, String)> {
    match (&cli.username, &cli.password) {
        (Some(u), Some(p)) => Ok((u.clone(), p.clone())),
        _ => bail!("--username and --password are required"),
    }
}

/// Sign in when credentials were given; the cookie lives for this process
async fn sign_in(cli: &Cli, backend: &dyn Backend) -> anyhow::Result<Option<Session>> {
    let Ok((username, password)) = credentials(cli) else {
        return Ok(None);
    };
    let form = AuthForm {
        username,
        password,
        ..Default::default()
    };
    let request = form.prepare()?;
    match request.outcome(backend.authenticate(&request).await) {
        AuthOutcome::SignedIn(session) => Ok(Some(session)),
        AuthOutcome::Failed(message) => bail!(message),
        AuthOutcome::Registered(_) => Ok(None),
    }
}

async fn current_session(cli: &Cli, backend: &dyn Backend) -> anyhow::Result<Option<Session>> {
    if let Some(session) = sign_in(cli, backend).await? {
        return Ok(Some(session));
    }
    Ok(cardioscope::session::resolve_identity(backend.me().await))
}

async fn require_professional(cli: &Cli, backend: &dyn Backend) -> anyhow::Result<Session> {
    let session = current_session(cli, backend).await?;
    match AccessGate::professional_route().check(session.as_ref()) {
        GateDecision::Allow => session.ok_or_else(|| anyhow!("not signed in")),
        GateDecision::Deny(denial) => bail!("{}: {}", denial.title, denial.body),
    }
}

fn read_image(path: &Path) -> anyhow::Result<Attachment<ImageBytes>> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "image".to_string());
    let mime = mime_for_path(&name);
    Ok(Attachment::new(bytes, name, mime)?)
}

async fn upload(
    cli: &Cli,
    backend: &dyn Backend,
    ecg: &Path,
    checkup: Option<&Path>,
    answers: &[String],
) -> anyhow::Result<()> {
    let mut form = UploadForm::new();
    form.attach_ecg(read_image(ecg)?);
    if let Some(path) = checkup {
        form.attach_checkup(read_image(path)?);
    }

    for answer in answers {
        let (key, value) = answer
            .split_once('=')
            .ok_or_else(|| anyhow!("Invalid answer (expected key=value): {}", answer))?;
        let field = questionnaire::field(key)
            .ok_or_else(|| anyhow!("Unknown questionnaire field: {} (see `cardioscope fields`)", key))?;
        if field.is_checkbox() {
            form.questionnaire
                .set_checked(key, matches!(value, "true" | "1" | "yes" | "y"));
        } else {
            form.questionnaire.set(key, value);
        }
    }

    let request = match form.begin_submit() {
        Ok(request) => request,
        Err(blocked) => {
            if let cardioscope::upload::UploadBlocked::MissingFields(missing) = &blocked {
                eprintln!("Missing: {}", missing.join(", "));
            }
            bail!(blocked);
        }
    };

    let outcome = backend.upload(&request).await;
    let status_error = outcome.as_ref().err().map(|e| e.to_string());
    let result = form.finish(outcome);
    let status = form.status().unwrap_or_default().to_string();
    let Some(result) = result else {
        bail!("{} ({})", status, status_error.unwrap_or_default());
    };

    if cli.format == Format::Json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let view = DashboardView::new(result);
    println!("{}", status);
    println!();
    println!("Result: {} ({})", view.verdict(), view.probability_text());
    println!("{}", view.narrative().message());
    println!();
    println!("Feature importance:");
    for slice in view.importance_slices() {
        println!("  {:<16} {:>5.1}%", slice.name, slice.percent);
    }
    println!();
    for (title, text) in view.waveform_sections() {
        println!("{}: {}", title, text);
    }
    println!("Recommendation: {}", view.recommendation());

    if let Some(card) = view.vascular_card() {
        println!();
        match card.high_risk_percent {
            Some(pct) => println!("Vascular risk: {:.1}% high risk", pct),
            None => println!("Vascular risk:"),
        }
        for section in &card.sections {
            println!("  {}", section);
        }
    }
    Ok(())
}

fn print_fields() {
    println!("{:<12} {:<28} {}", "Key", "Label", "Values");
    println!("{}", "-".repeat(72));
    for field in FIELDS.iter() {
        let values = match field.kind {
            questionnaire::FieldKind::Number { placeholder } => format!("number ({})", placeholder),
            questionnaire::FieldKind::Radio { options } => options
                .iter()
                .map(|(value, label)| format!("{}={}", value, label))
                .collect::<Vec<_>>()
                .join(", "),
            questionnaire::FieldKind::Checkbox { .. } => "true/false".to_string(),
        };
        println!("{:<12} {:<28} {}", field.key, field.label, values);
    }
}
