//! Console presenter.
//!
//! Plays the part of the login modal: reads commands from stdin, calls the
//! coordinator's entry points, and prints the resulting state. It can also
//! make the simulated SDK raise its login and renewal requests.

use std::io::Write;
use std::sync::Arc;

use parley_application::AuthCoordinator;
use parley_domain::{AuthState, SsoProvider, SsoUser};
use parley_infrastructure::SimulatedIdentitySdk;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
commands:
  status                    show the current state
  login [n]                 SSO handshake as test user n (default user if omitted)
  provider <name> <token>   SSO with a third-party provider token
  logout                    end the session
  refresh                   re-read the user status from the SDK
  prompt                    make the SDK request the login UI
  renew                     make the SDK request a silent renewal
  dismiss                   close the login UI
  users                     list test users and providers
  help                      show this help
  quit                      exit";

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Status,
    Login(Option<usize>),
    Provider { provider: SsoProvider, token: String },
    Logout,
    Refresh,
    Prompt,
    Renew,
    Dismiss,
    Users,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
enum CommandError {
    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("{0}")]
    Provider(#[from] parley_domain::DomainError),
}

impl Command {
    fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err(CommandError::Usage("help"));
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "status" | "s" => Self::Status,
            "login" => {
                let index = words
                    .next()
                    .map(|n| {
                        n.parse::<usize>()
                            .ok()
                            .filter(|&n| n > 0)
                            .ok_or(CommandError::Usage("login [n], n starting at 1"))
                    })
                    .transpose()?;
                Self::Login(index)
            }
            "provider" => {
                let provider = words
                    .next()
                    .ok_or(CommandError::Usage("provider <name> <token>"))?
                    .parse::<SsoProvider>()?;
                // Blank tokens never reach the coordinator.
                let token = words.collect::<Vec<_>>().join(" ");
                if token.trim().is_empty() {
                    return Err(CommandError::Usage("provider <name> <token>"));
                }
                Self::Provider { provider, token }
            }
            "logout" => Self::Logout,
            "refresh" => Self::Refresh,
            "prompt" => Self::Prompt,
            "renew" => Self::Renew,
            "dismiss" | "close" => Self::Dismiss,
            "users" => Self::Users,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

/// Line-oriented stand-in for the login modal.
pub struct Presenter {
    coordinator: Arc<AuthCoordinator>,
    sdk: Arc<SimulatedIdentitySdk>,
}

impl Presenter {
    /// Create a presenter driving `coordinator`.
    pub const fn new(coordinator: Arc<AuthCoordinator>, sdk: Arc<SimulatedIdentitySdk>) -> Self {
        Self { coordinator, sdk }
    }

    /// Read and execute commands until `quit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if stdin cannot be read.
    pub async fn run(&self) -> std::io::Result<()> {
        println!("{HELP}");
        println!("{}", render(&self.coordinator.state(), self.coordinator.show_auth_modal()));

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("> ");
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }

            match Command::parse(&line) {
                Ok(Command::Quit) => break,
                Ok(command) => self.execute(command).await,
                Err(e) => println!("{e}"),
            }
        }

        // Leave no SDK flow waiting on a UI that is going away.
        self.coordinator.set_show_auth_modal(false);
        Ok(())
    }

    async fn execute(&self, command: Command) {
        match command {
            Command::Status | Command::Quit => {}
            Command::Login(index) => {
                let users = SsoUser::test_users();
                let authenticated = match index {
                    Some(n) => match users.get(n - 1) {
                        Some(user) => self.coordinator.authenticate_as(user).await,
                        None => {
                            println!("no test user {n} (see `users`)");
                            return;
                        }
                    },
                    None => self.coordinator.authenticate().await,
                };
                if authenticated {
                    self.coordinator.set_show_auth_modal(false);
                }
            }
            Command::Provider { provider, token } => {
                if self
                    .coordinator
                    .authenticate_with_provider(provider, token.trim())
                    .await
                {
                    self.coordinator.set_show_auth_modal(false);
                }
            }
            Command::Logout => {
                self.coordinator.logout().await;
                self.coordinator.set_show_auth_modal(false);
            }
            Command::Refresh => {
                self.coordinator.refresh_status().await;
            }
            Command::Prompt => match self.sdk.request_authentication_flow() {
                Ok(done) => {
                    tokio::spawn(async move {
                        if done.await.is_ok() {
                            println!("\nSDK: authentication flow finished");
                        }
                    });
                    // The listener task flips the modal flag.
                    let mut modal = self.coordinator.subscribe_auth_modal();
                    let _ = modal.wait_for(|shown| *shown).await;
                }
                Err(e) => println!("SDK: {e}"),
            },
            Command::Renew => match self.sdk.request_renewal() {
                Ok(done) => {
                    if done.await.is_ok() {
                        println!("SDK: renewal finished");
                    }
                }
                Err(e) => println!("SDK: {e}"),
            },
            Command::Dismiss => self.coordinator.set_show_auth_modal(false),
            Command::Users => {
                for (i, user) in SsoUser::test_users().iter().enumerate() {
                    println!("  {}. {user}", i + 1);
                }
                let providers: Vec<_> = SsoProvider::ALL.iter().map(|p| p.tag()).collect();
                println!("  providers: {}", providers.join(", "));
                return;
            }
            Command::Help => {
                println!("{HELP}");
                return;
            }
        }

        println!("{}", render(&self.coordinator.state(), self.coordinator.show_auth_modal()));
    }
}

fn render(state: &AuthState, modal_shown: bool) -> String {
    let json = serde_json::to_string(state).unwrap_or_else(|e| format!("<unrenderable: {e}>"));
    let modal = if modal_shown { "shown" } else { "hidden" };
    format!("[{}] {json} login UI: {modal}", state.status().label())
}
