use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bloodlens::checkin::CheckinSession;
use bloodlens::config::{self, AdvisorConfig};
use bloodlens::llm::FeatherlessClient;
use bloodlens::models::biomarker::BiomarkerStatus;
use bloodlens::models::profile::UserProfile;
use bloodlens::models::report::AnalysisResult;
use bloodlens::pipeline::extraction;
use bloodlens::pipeline::orchestrator::BloodworkAdvisor;
use bloodlens::pipeline::prompt::Persona;
use bloodlens::pipeline::reference::ReferenceRanges;
use bloodlens::triage::TriageAdvisor;

#[derive(Parser)]
#[command(name = "bloodlens")]
#[command(about = "Bloodwork text → flagged biomarkers → personalized meal & exercise report")]
#[command(version)]
struct Cli {
    /// API key; falls back to the FEATHERLESS_API_KEY environment variable
    #[arg(long, global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze an extracted bloodwork text file
    Analyze {
        /// Path to the bloodwork text (already extracted from the PDF)
        input: PathBuf,
        /// Model identifier
        #[arg(long, default_value = config::DEFAULT_MODEL)]
        model: String,
        /// Max response tokens
        #[arg(long, default_value_t = config::DEFAULT_MAX_TOKENS)]
        max_tokens: u32,
        /// Upper bound on the model call, seconds
        #[arg(long, default_value_t = config::DEFAULT_TIMEOUT_SECS)]
        timeout_secs: u64,
        /// System-prompt variant: clinical_nutritionist or concise_coach
        #[arg(long, default_value = "clinical_nutritionist")]
        persona: String,
        /// Save extracted biomarkers to this JSON file
        #[arg(long)]
        output_json: Option<PathBuf>,
        /// Save the final report to this text file
        #[arg(long)]
        output_report: Option<PathBuf>,
        /// Patient age
        #[arg(long)]
        age: Option<u32>,
        /// Patient sex (male/female/other)
        #[arg(long)]
        sex: Option<String>,
        /// Patient weight in kg
        #[arg(long)]
        weight_kg: Option<f64>,
        /// Patient height in cm
        #[arg(long)]
        height_cm: Option<f64>,
        /// Activity level (sedentary/light/moderate/active/very_active)
        #[arg(long)]
        activity: Option<String>,
        /// Health goals, e.g. "lose weight, lower cholesterol"
        #[arg(long)]
        goals: Option<String>,
        /// Dietary restrictions, e.g. "vegetarian, no gluten"
        #[arg(long)]
        diet: Option<String>,
    },
    /// Get a triage recommendation for a described condition
    Triage {
        /// The disease or illness description
        condition: String,
        /// Model identifier
        #[arg(long, default_value = config::DEFAULT_TRIAGE_MODEL)]
        model: String,
        /// Upper bound on the model call, seconds
        #[arg(long, default_value_t = config::DEFAULT_TIMEOUT_SECS)]
        timeout_secs: u64,
    },
    /// Interactive health check-in conversation
    Checkin {
        /// Model identifier
        #[arg(long, default_value = config::DEFAULT_CHECKIN_MODEL)]
        model: String,
        /// Upper bound on each model call, seconds
        #[arg(long, default_value_t = config::DEFAULT_TIMEOUT_SECS)]
        timeout_secs: u64,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    let cli = Cli::parse();

    let Some(api_key) = cli.api_key.clone().or_else(config::api_key_from_env) else {
        eprintln!(
            "ERROR: API key required. Pass --api-key or set {}.",
            config::API_KEY_ENV
        );
        return ExitCode::FAILURE;
    };

    match run(cli.command, &api_key) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands, api_key: &str) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Analyze {
            input,
            model,
            max_tokens,
            timeout_secs,
            persona,
            output_json,
            output_report,
            age,
            sex,
            weight_kg,
            height_cm,
            activity,
            goals,
            diet,
        } => {
            let raw_text = std::fs::read_to_string(&input)?;
            let source = input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| input.display().to_string());

            if let Some(path) = &output_json {
                let extraction = extraction::extract(&raw_text, &source);
                std::fs::write(path, serde_json::to_string_pretty(&extraction)?)?;
                println!("Saved extracted biomarkers to: {}", path.display());
            }

            let persona: Persona = persona.parse()?;
            let advisor_config = AdvisorConfig {
                model,
                max_tokens,
                temperature: config::DEFAULT_TEMPERATURE,
                timeout_secs,
                persona,
            };
            let profile = UserProfile {
                age,
                sex,
                weight_kg,
                height_cm,
                activity_level: activity,
                goals,
                dietary_restrictions: diet,
            };
            let profile = if profile.is_empty() { None } else { Some(profile) };

            let client = FeatherlessClient::new(config::DEFAULT_API_URL, api_key, timeout_secs);
            let advisor = BloodworkAdvisor::new(
                Box::new(client),
                ReferenceRanges::standard(),
                advisor_config,
            );

            let result = advisor.analyze(&raw_text, &source, profile.as_ref())?;
            println!("{}", render_result(&result));

            if let Some(path) = &output_report {
                let stamp = chrono::Utc::now().to_rfc3339();
                std::fs::write(path, result.report_text(&stamp))?;
                println!("Report saved to: {}", path.display());
            }
        }
        Commands::Triage {
            condition,
            model,
            timeout_secs,
        } => {
            let client = FeatherlessClient::new(config::DEFAULT_API_URL, api_key, timeout_secs);
            let advisor = TriageAdvisor::new(Box::new(client), &model);
            let report = advisor.recommend(&condition)?;
            println!("{}", report.recommendation);
        }
        Commands::Checkin {
            model,
            timeout_secs,
        } => {
            let client = FeatherlessClient::new(config::DEFAULT_API_URL, api_key, timeout_secs);
            let mut session = CheckinSession::new(Box::new(client), &model);
            println!("Health check-in — type 'quit' to exit.");

            let stdin = std::io::stdin();
            let mut line = String::new();
            loop {
                print!("> ");
                std::io::stdout().flush()?;
                line.clear();
                if stdin.read_line(&mut line)? == 0 {
                    break;
                }
                let text = line.trim();
                if text.is_empty() {
                    continue;
                }
                if matches!(text.to_lowercase().as_str(), "quit" | "exit" | "q") {
                    println!("Take care!");
                    break;
                }
                match session.send(text) {
                    Ok(reply) => println!("\n{reply}\n"),
                    // A failed turn was rolled back; let the user retry.
                    Err(e) if e.is_upstream() => eprintln!("API error: {e}"),
                    Err(e) => return Err(e.into()),
                }
            }
        }
    }
    Ok(())
}

/// Render the flagged-biomarker table and recommendations for the terminal.
fn render_result(result: &AnalysisResult) -> String {
    let rule = "═".repeat(70);
    let mut out = String::new();
    out.push_str(&format!("{rule}\nFLAGGED BIOMARKERS — {}\n{rule}\n", result.filename));
    for marker in result.flagged_biomarkers.iter() {
        let tag = match marker.status {
            BiomarkerStatus::Optimal => " ",
            BiomarkerStatus::Borderline => "~",
            BiomarkerStatus::Low | BiomarkerStatus::High => "!",
            BiomarkerStatus::NoReference => "?",
        };
        out.push_str(&format!(
            "  {tag} {:<20} {} {}  [{}]\n",
            marker.name,
            marker.value,
            marker.unit,
            marker.status.to_string().to_uppercase(),
        ));
    }
    out.push_str(&format!("\n{rule}\nRECOMMENDATIONS\n{rule}\n{}\n", result.recommendations));
    out
}
