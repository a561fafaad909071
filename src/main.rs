//! CLI entry point for `outreachkit`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use humansize::{format_size, BINARY};

use outreachkit::attachment::constraints::{AttachmentChecker, Rejection};
use outreachkit::composer::premium::{FixedPremiumStatus, PremiumStatus};
use outreachkit::composer::rules::ValidationResult;
use outreachkit::composer::{Composer, EditorSession};
use outreachkit::config::Config;
use outreachkit::i18n;
use outreachkit::loader::load_template_file;
use outreachkit::model::file::RawFile;
use outreachkit::model::kind::TemplateKind;
use outreachkit::snippet::SnippetValidator;

#[derive(Parser)]
#[command(name = "outreachkit", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Language (en, es). Defaults to system locale.
    #[arg(long, global = true, value_name = "LANG")]
    lang: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a template file
    Check {
        template: PathBuf,
        /// direct-message, connection-invite or inmail (overrides the file)
        #[arg(short, long)]
        kind: Option<TemplateKind>,
        /// Treat the premium integration as active
        #[arg(long)]
        premium: bool,
        #[arg(long)]
        json: bool,
    },
    /// List placeholder variables
    Variables {
        #[arg(long)]
        json: bool,
    },
    /// Check files against the attachment constraints
    Attach {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

/// Detect language early from --lang arg or system env, before clap processes --help.
fn detect_lang_early() -> i18n::Lang {
    let args: Vec<String> = std::env::args().collect();
    for (i, arg) in args.iter().enumerate() {
        if arg == "--lang" {
            if let Some(lang) = args.get(i + 1).and_then(|c| i18n::Lang::from_code(c)) {
                return lang;
            }
        }
        if let Some(lang) = arg.strip_prefix("--lang=").and_then(i18n::Lang::from_code) {
            return lang;
        }
    }
    i18n::detect_system_lang()
}

/// Build a localized clap Command using i18n strings.
fn build_localized_command() -> clap::Command {
    let mut cmd = Cli::command()
        .about(i18n::app_about())
        .long_about(i18n::app_long_about());

    let subcommands: Vec<clap::Command> = cmd
        .get_subcommands()
        .map(|sub| {
            let s = sub.clone();
            match s.get_name() {
                "check" => s.about(i18n::help_cmd_check()),
                "variables" => s.about(i18n::help_cmd_variables()),
                "attach" => s.about(i18n::help_cmd_attach()),
                "completions" => s.about(i18n::help_cmd_completions()),
                "manpage" => s.about(i18n::help_cmd_manpage()),
                _ => s,
            }
        })
        .collect();

    for sub in subcommands {
        cmd = cmd.mut_subcommand(sub.get_name(), |_| sub.clone());
    }

    cmd
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let lang = detect_lang_early();
    i18n::set_lang(lang);

    let matches = build_localized_command().get_matches();
    let cli = Cli::from_arg_matches(&matches)?;

    let config = outreachkit::config::load_config();

    let log_level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_logging(log_level, &config);

    match cli.command {
        Commands::Check {
            template,
            kind,
            premium,
            json,
        } => cmd_check(&config, &template, kind, premium, json).await,
        Commands::Variables { json } => cmd_variables(&config, json),
        Commands::Attach { files, json } => cmd_attach(&config, &files, json),
        Commands::Completions { shell } => cmd_completions(shell),
        Commands::Manpage => cmd_manpage(),
    }
}

/// Set up tracing with stderr output and optional file logging.
fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let log_dir = outreachkit::config::cache_dir(config);
    if std::fs::create_dir_all(&log_dir).is_ok() {
        let file_appender = tracing_appender::rolling::never(&log_dir, "outreachkit.log");
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "outreachkit", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}

/// Validate a template file, attaching the files it lists.
async fn cmd_check(
    config: &Config,
    path: &Path,
    kind: Option<TemplateKind>,
    premium: bool,
    json: bool,
) -> anyhow::Result<()> {
    if !path.exists() {
        anyhow::bail!("{}: {}", i18n::err_file_not_found(), path.display());
    }

    let template = load_template_file(path)?;
    let Some(kind) = kind.or(template.kind) else {
        anyhow::bail!(
            "No template kind given. Use --kind with one of: {}",
            TemplateKind::ALL.map(|k| k.as_str()).join(", ")
        );
    };

    let catalog = Arc::new(config.catalog()?);
    let composer = Composer::new(SnippetValidator::new(catalog), config.character_limits());
    let checker = AttachmentChecker::new(config.attachment_limits());

    let mut session = EditorSession::resume(
        kind,
        template.to_saved_template(),
        Arc::new(composer),
        Arc::new(checker),
    );

    if premium {
        session
            .refresh_premium(&FixedPremiumStatus(true), config.premium_check_timeout())
            .await;
    } else {
        session.set_premium_status(PremiumStatus::Inactive);
    }

    let files = template.raw_files()?;
    let rejections = if files.is_empty() {
        Vec::new()
    } else {
        session.attach_files(files).await?.1
    };

    let result = session.revalidate()?;
    let limit = session.character_limit();
    let ok = result.is_valid && rejections.is_empty();

    if json {
        let payload = if ok { Some(session.submit()?) } else { None };
        let report = serde_json::json!({
            "template": path.to_string_lossy(),
            "kind": kind,
            "character_limit": limit,
            "valid": result.is_valid,
            "violations": result.violations,
            "rejections": rejections,
            "payload": payload,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_check_report(path, kind, limit, &result, &rejections, &session);
    }

    if !ok {
        anyhow::bail!("{}", i18n::cli_template_invalid());
    }
    Ok(())
}

/// List the variable catalog.
fn cmd_variables(config: &Config, json: bool) -> anyhow::Result<()> {
    let catalog = config.catalog()?;

    if json {
        println!("{}", serde_json::to_string_pretty(catalog.descriptors())?);
        return Ok(());
    }

    println!();
    println!("  {:<24} {}", i18n::cli_col_label(), i18n::cli_col_token());
    println!("  {}", "-".repeat(48));
    for var in catalog.descriptors() {
        println!("  {:<24} {}", var.label, var.token);
    }
    println!();
    Ok(())
}

/// Run the constraint checker over files on disk.
fn cmd_attach(config: &Config, paths: &[PathBuf], json: bool) -> anyhow::Result<()> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        if !path.exists() {
            anyhow::bail!("{}: {}", i18n::err_file_not_found(), path.display());
        }
        files.push(RawFile::from_path(path)?);
    }

    let checker = AttachmentChecker::new(config.attachment_limits());
    let outcome = checker.check_batch(&[], files);

    if json {
        let accepted: Vec<serde_json::Value> = outcome
            .accepted
            .iter()
            .map(|f| {
                serde_json::json!({
                    "file_name": f.name,
                    "mime_type": f.mime_type,
                    "size_bytes": f.size_bytes,
                })
            })
            .collect();
        let output = serde_json::json!({
            "accepted": accepted,
            "rejections": outcome.rejections,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!();
        println!("  {} ({})", i18n::cli_accepted(), outcome.accepted.len());
        for f in &outcome.accepted {
            println!(
                "    {:<40} {:<28} {:>10}",
                f.name,
                f.mime_type,
                format_size(f.size_bytes, BINARY)
            );
        }
        print_rejections(&outcome.rejections);
        println!();
    }

    if !outcome.is_clean() {
        anyhow::bail!("{} ({})", i18n::cli_rejected(), outcome.rejections.len());
    }
    Ok(())
}

/// Print a check result as a human-readable report.
fn print_check_report(
    path: &Path,
    kind: TemplateKind,
    limit: usize,
    result: &ValidationResult,
    rejections: &[Rejection],
    session: &EditorSession,
) {
    println!();
    println!("  {:<20} {}", i18n::cli_template(), path.display());
    println!("  {:<20} {}", i18n::cli_kind(), kind);
    println!("  {:<20} {}", i18n::cli_char_limit(), limit);

    let attachments = session.draft().attachments();
    if !attachments.is_empty() {
        println!(
            "  {:<20} {} ({})",
            i18n::field_attachments(),
            attachments.len(),
            format_size(session.draft().attachment_bytes(), BINARY)
        );
    }

    println!();
    if result.is_valid && rejections.is_empty() {
        println!("  {}", i18n::cli_template_ok());
    } else {
        println!("  {}:", i18n::cli_template_invalid());
        for v in &result.violations {
            println!("    - {v}");
        }
    }
    print_rejections(rejections);
    println!();
}

fn print_rejections(rejections: &[Rejection]) {
    if rejections.is_empty() {
        return;
    }
    println!("  {} ({})", i18n::cli_rejected(), rejections.len());
    for r in rejections {
        let name = r.file_name.as_deref().unwrap_or(i18n::cli_all_files());
        println!("    {:<40} {}", name, r.reason);
    }
}
