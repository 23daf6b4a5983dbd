//! authgate - command-line front end for the session gate.
//!
//! Stands in for the application's pages: sign in, sign out and navigate,
//! printing where the navigation guard lets you land.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::json;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use authgate_core::{
    Config, ConnectionStatus, Navigation, RouteName, Router, RouteTable, SessionStore,
    SupabaseAuthClient,
};

// ============================================================================
// Constants
// ============================================================================

/// Environment variable holding the password for non-interactive logins
const PASSWORD_VAR: &str = "AUTHGATE_PASSWORD";

const USAGE: &str = "\
Usage: authgate [COMMAND]

Commands:
  shell                  Interactive session (default)
  status                 Check the connection and the current session
  visit <route>          Navigate to a route by name or path
  login <email> [route]  Sign in, then navigate (default: Dashboard)
  help                   Show this message

Routes: Home (/), Login (/login), Register (/register), Dashboard (/dashboard)";

const SHELL_HELP: &str = "\
  login <email> [route]  Sign in, then navigate (default: Dashboard)
  logout                 Sign out and go to Login
  visit <route>          Navigate to a route by name or path
  status                 Show the current session
  routes                 List routes and their access policy
  quit                   Exit";

/// Initialize the tracing subscriber for logging.
///
/// The returned guard flushes buffered log lines when dropped; keep it alive
/// for the life of the program.
fn init_tracing() -> tracing_appender::non_blocking::WorkerGuard {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let (writer, guard) = tracing_appender::non_blocking(io::stderr());

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer))
        .with(filter)
        .init();

    guard
}

/// Shared services for one run
struct Gate {
    client: Arc<SupabaseAuthClient>,
    router: Router,
}

impl Gate {
    fn new(config: &Config) -> Result<Self> {
        let client = Arc::new(SupabaseAuthClient::new(config)?);
        let store = Arc::new(SessionStore::new(client.clone()));
        let router = Router::new(RouteTable::default(), store);
        Ok(Self { client, router })
    }

    fn store(&self) -> &Arc<SessionStore> {
        self.router.store()
    }
}

/// A command line invocation
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Shell,
    Status,
    Visit(String),
    Login { email: String, target: String },
    Help,
}

/// Parse arguments (without the program name) into a command.
fn parse_command(args: &[String]) -> Result<Command> {
    let command = args.first().map(String::as_str).unwrap_or("shell");

    Ok(match command {
        "shell" => Command::Shell,
        "status" => Command::Status,
        "help" | "--help" | "-h" => Command::Help,
        "visit" => {
            let target = args.get(1).context("visit needs a route name or path")?;
            Command::Visit(target.clone())
        }
        "login" => {
            let email = args.get(1).context("login needs an email address")?;
            let target = args.get(2).map(String::as_str).unwrap_or("Dashboard");
            Command::Login {
                email: email.clone(),
                target: target.to_string(),
            }
        }
        other => anyhow::bail!("Unknown command: {}\n\n{}", other, USAGE),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let _log_guard = init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_command(&args)?;

    if command == Command::Help {
        println!("{}", USAGE);
        return Ok(());
    }

    let config = Config::from_env()
        .context("Set SUPABASE_URL and SUPABASE_ANON_KEY (or the VITE_ variants)")?;
    let gate = Gate::new(&config)?;

    report_connection(gate.client.check_connection().await);

    match command {
        Command::Shell => run_shell(&gate).await,
        Command::Status => print_status(&gate).await,
        Command::Visit(target) => {
            let nav = gate.router.push(&target).await?;
            print_navigation(&nav);
            Ok(())
        }
        Command::Login { email, target } => {
            let password = read_password()?;
            login(&gate, &email, &password, &target).await
        }
        Command::Help => Ok(()),
    }
}

/// Log the outcome of the startup connection check
fn report_connection(status: ConnectionStatus) {
    match status {
        ConnectionStatus::Connected => info!("Connected to Supabase"),
        ConnectionStatus::Rejected(msg) => warn!(error = %msg, "Supabase rejected the connection"),
        ConnectionStatus::Unreachable(msg) => {
            error!(error = %msg, "Cannot reach the Supabase server")
        }
        ConnectionStatus::Failed(msg) => error!(error = %msg, "Supabase connection check failed"),
    }
}

fn read_password() -> Result<String> {
    if let Ok(password) = std::env::var(PASSWORD_VAR) {
        return Ok(password);
    }
    rpassword::prompt_password("Password: ").context("Failed to read password")
}

async fn login(gate: &Gate, email: &str, password: &str, target: &str) -> Result<()> {
    let reply = gate.client.sign_in_with_password(email, password).await?;

    if let Some(e) = reply.error {
        println!("Login failed: {}", e.message);
        return Ok(());
    }

    gate.store().set_session(reply.session);
    let nav = gate.router.push(target).await?;
    print_navigation(&nav);
    Ok(())
}

async fn print_status(gate: &Gate) -> Result<()> {
    let landing = gate.router.landing_route().await;
    let state = gate.store().state();

    let status = json!({
        "authenticated": state.is_authenticated(),
        "has_token": state.has_token(),
        "user": state.user(),
        "expires_in_minutes": state.session().and_then(|s| s.minutes_until_expiry()),
        "current_route": gate.router.current().map(|r| r.to_string()),
        "landing_route": landing.to_string(),
    });
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}

fn print_navigation(nav: &Navigation) {
    if nav.was_redirected() {
        println!("{} -> redirected to {}", nav.requested, nav.resolved);
    } else {
        println!("{}", nav.resolved);
    }
}

fn print_routes(router: &Router) {
    for route in router.table().routes() {
        println!("  {:<10} {:<12} {:?}", route.name, route.path, route.policy);
    }
}

async fn run_shell(gate: &Gate) -> Result<()> {
    let landing = gate.router.landing_route().await;
    let nav = gate.router.push_name(landing).await?;
    println!("authgate - type 'help' for commands");
    print_navigation(&nav);

    let stdin = io::stdin();
    loop {
        print!("{}> ", gate.router.current().unwrap_or(RouteName::Home));
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }

        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&cmd, rest)) = words.split_first() else {
            continue;
        };

        let result: Result<()> = match (cmd, rest) {
            ("quit" | "exit", _) => return Ok(()),
            ("help", _) => {
                println!("{}", SHELL_HELP);
                Ok(())
            }
            ("routes", _) => {
                print_routes(&gate.router);
                Ok(())
            }
            ("status", _) => print_status(gate).await,
            ("visit", [target]) => gate
                .router
                .push(target)
                .await
                .map(|nav| print_navigation(&nav))
                .map_err(Into::into),
            ("login", [email, target @ ..]) => match read_password() {
                Ok(password) => {
                    let target = target.first().copied().unwrap_or("Dashboard");
                    login(gate, email, &password, target).await
                }
                Err(e) => Err(e),
            },
            ("logout", _) => gate
                .router
                .logout()
                .await
                .map(|nav| print_navigation(&nav))
                .map_err(Into::into),
            _ => {
                println!("Unknown command. Type 'help' for commands.");
                Ok(())
            }
        };

        if let Err(e) = result {
            println!("Error: {:#}", e);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
