use anyhow::Result;
use clap::{Parser, Subcommand};
use green_matchers::core::ConfigManager;
use green_matchers::i18n::{language_name, language_native_name, normalize_language_code, Params};
use green_matchers::web::start_web_server;
use green_matchers::{build_preferences, LocaleChange};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

#[derive(Parser)]
#[command(name = "green-matchers")]
#[command(about = "Translations and language preference for the Green Matchers client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a translation key (e.g. jobs.showingResults)
    Resolve {
        key: String,
        /// Locale to resolve against; defaults to the active language
        #[arg(long)]
        locale: Option<String>,
        /// Placeholder values as name=value, repeatable
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// Check whether a locale has its own string for a key
    Exists {
        key: String,
        #[arg(long)]
        locale: Option<String>,
    },
    /// List loaded languages
    Languages {
        /// Also report keys missing from each language
        #[arg(long)]
        coverage: bool,
    },
    /// Print the active language
    ShowLanguage,
    /// Change the active language (synced to the profile when signed in)
    SetLanguage { language: String },
    /// Refresh the signed-in profile and adopt its language
    Sync,
    /// Show sign-in state and manage the email remembered for the login form
    Session {
        #[arg(long, value_name = "EMAIL", conflicts_with = "forget_email")]
        remember: Option<String>,
        #[arg(long)]
        forget_email: bool,
    },
    /// Clear the stored token and profile
    Logout,
    /// Serve the language API over HTTP
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
}

fn parse_param(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected name=value, got '{}'", raw)),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("green_matchers=info,rocket::server=off"));

    if std::env::var("GREEN_MATCHERS_LOG_JSON").as_deref() == Ok("1") {
        Registry::default()
            .with(fmt::layer().json().with_current_span(false).with_span_list(false))
            .with(filter)
            .init();
    } else {
        Registry::default()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = ConfigManager::load()?;
    info!("Environment: {}", config.environment);
    info!("Backend: {}", config.app.api_url);

    let prefs = build_preferences(&config.app).await?;
    let context = prefs.context();

    match cli.command {
        Command::Resolve {
            key,
            locale,
            params,
        } => {
            let locale = locale.unwrap_or_else(|| context.language());
            let params: Params = params.into_iter().collect();
            println!("{}", context.translator().resolve(&key, &params, &locale));
        }

        Command::Exists { key, locale } => {
            let locale = locale.unwrap_or_else(|| context.language());
            let exists = context.translator().exists(&key, &locale);
            println!("{}", exists);
            if !exists {
                std::process::exit(1);
            }
        }

        Command::Languages { coverage } => {
            let active = context.language();
            let table = context.translator().table();
            for code in table.locales() {
                if !context.is_supported(code) {
                    continue;
                }
                let marker = if code == active { "*" } else { " " };
                println!(
                    "{} {:<4} {:<10} {}",
                    marker,
                    code,
                    language_name(code),
                    language_native_name(code)
                );
                if coverage {
                    let missing = table.missing_keys(code);
                    println!("       {} keys missing", missing.len());
                    for key in missing {
                        println!("         - {}", key);
                    }
                }
            }
        }

        Command::ShowLanguage => {
            let active = context.language();
            println!("{} ({})", active, language_native_name(&active));
        }

        Command::SetLanguage { language } => {
            let code = normalize_language_code(&language)
                .ok_or_else(|| anyhow::anyhow!("Language must not be empty"))?;
            let result = prefs.change_language(&code).await;
            match result.change {
                LocaleChange::Unsupported => {
                    anyhow::bail!("Language \"{}\" is not supported", language)
                }
                LocaleChange::Unchanged => println!("Language already set to {}", code),
                LocaleChange::Changed => {
                    println!("Language changed to {} (profile sync: {:?})", code, result.sync)
                }
            }
        }

        Command::Sync => {
            let outcome = prefs.sync_from_profile().await;
            println!("{:?}, active language: {}", outcome, context.language());
        }

        Command::Session {
            remember,
            forget_email,
        } => {
            let session = prefs.session();
            if let Some(email) = remember.as_deref() {
                let email = email.trim();
                if email.is_empty() {
                    anyhow::bail!("Email must not be empty");
                }
                session.remember_email(Some(email)).await?;
            } else if forget_email {
                session.remember_email(None).await?;
            }

            let user = session.stored_user().await;
            println!(
                "Signed in: {}",
                if session.is_authenticated().await { "yes" } else { "no" }
            );
            println!(
                "User: {}",
                user.as_ref().map(|u| u.email.as_str()).unwrap_or("-")
            );
            println!(
                "Remembered email: {}",
                session.remembered_email().await.as_deref().unwrap_or("-")
            );
        }

        Command::Logout => {
            prefs.session().logout().await?;
            println!("Logged out");
        }

        Command::Serve { port } => {
            let port = port.unwrap_or(config.app.port);
            start_web_server(prefs, port).await?;
        }
    }

    Ok(())
}
