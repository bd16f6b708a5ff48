//! `mise` command-line front end.
//!
//! ```text
//! mise [status]
//! mise login <email> <password>
//! mise signup <email> <password>
//! mise logout
//! mise shop <recipe-index>
//! ```
//!
//! Every run restores the persisted session first, applies the command and
//! prints the resulting state as JSON. Configuration comes from the
//! environment (`MISE_API_KEY`, `MISE_IDENTITY_URL`, `MISE_SESSION_FILE`).

use anyhow::{Context, bail};
use mise_app::{AppAction, AppState, LiveEnvironment, LiveReducer};
use mise_core::environment::SystemClock;
use mise_runtime::{Store, StoreConfig};
use mise_session::{Credentials, RouteChannel, SessionAction, SessionConfig};
use mise_shopping::{EditCoordinator, RecipeAction};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const AUTH_TIMEOUT: Duration = Duration::from_secs(30);
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

// Room for every action a login round trip broadcasts
const BROADCAST_CAPACITY: usize = 64;

type AppStore = Store<AppState, AppAction, LiveEnvironment, LiveReducer>;

enum Command {
    Status,
    Login(Credentials),
    SignUp(Credentials),
    Logout,
    Shop(usize),
}

fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<Command> {
    let command = match args.next().as_deref() {
        None | Some("status") => Command::Status,
        Some(mode @ ("login" | "signup")) => {
            let (Some(email), Some(password)) = (args.next(), args.next()) else {
                bail!("usage: mise {mode} <email> <password>");
            };
            let credentials = Credentials::new(email, password);
            if mode == "login" {
                Command::Login(credentials)
            } else {
                Command::SignUp(credentials)
            }
        },
        Some("logout") => Command::Logout,
        Some("shop") => {
            let index = args
                .next()
                .context("usage: mise shop <recipe-index>")?
                .parse::<usize>()
                .context("recipe index must be a number")?;
            Command::Shop(index)
        },
        Some(other) => bail!("unknown command `{other}`"),
    };
    Ok(command)
}

fn is_auth_outcome(action: &AppAction) -> bool {
    matches!(
        action,
        AppAction::Session(
            SessionAction::AuthenticateSuccess { .. } | SessionAction::AuthenticateFail { .. }
        )
    )
}

async fn authenticate(store: &AppStore, action: SessionAction) -> anyhow::Result<()> {
    let outcome = store
        .send_and_wait_for(AppAction::Session(action), is_auth_outcome, AUTH_TIMEOUT)
        .await
        .context("identity service did not answer")?;

    if let AppAction::Session(SessionAction::AuthenticateFail { message }) = outcome {
        bail!(message);
    }
    Ok(())
}

async fn print_status(store: &AppStore, routes: &RouteChannel) -> anyhow::Result<()> {
    let mut status = store
        .state(|s| {
            json!({
                "user": s.session.user.as_ref().map(|user| user.email.clone()),
                "shoppingList": s.shopping_list.ingredients,
                "recipes": s.recipes.recipes.iter().map(|r| r.name.clone()).collect::<Vec<_>>(),
            })
        })
        .await;
    status["route"] = json!(routes.current().to_string());

    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mise=info,mise_session=debug,mise_runtime=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let command = parse_args(std::env::args().skip(1))?;
    let config = SessionConfig::from_env().context("invalid configuration")?;

    let routes = RouteChannel::default();
    let env = LiveEnvironment::live(
        &config,
        routes.clone(),
        EditCoordinator::new(),
        Arc::new(SystemClock),
    );
    let config = StoreConfig::default()
        .with_broadcast_capacity(BROADCAST_CAPACITY)
        .with_shutdown_timeout(SHUTDOWN_TIMEOUT);
    let store: AppStore = Store::with_config(AppState::sample(), LiveReducer::new(), env, config);

    store
        .send_and_wait_for(
            AppAction::Session(SessionAction::AutoLogin),
            |action| {
                matches!(
                    action,
                    AppAction::Session(
                        SessionAction::AuthenticateSuccess { .. } | SessionAction::AutoLoginSkipped
                    )
                )
            },
            AUTH_TIMEOUT,
        )
        .await
        .context("could not restore session")?;

    match command {
        Command::Status => {},
        Command::Login(credentials) => {
            authenticate(&store, SessionAction::LoginStart { credentials }).await?;
        },
        Command::SignUp(credentials) => {
            authenticate(&store, SessionAction::SignUpStart { credentials }).await?;
        },
        Command::Logout => {
            let mut handle = store.send(AppAction::Session(SessionAction::Logout)).await?;
            handle.wait_with_timeout(SHUTDOWN_TIMEOUT).await?;
        },
        Command::Shop(index) => {
            let mut handle = store
                .send(AppAction::Recipes(RecipeAction::AddToShoppingList { index }))
                .await?;
            handle.wait_with_timeout(SHUTDOWN_TIMEOUT).await?;
        },
    }

    print_status(&store, &routes).await?;

    // Aborts the armed logout timer; the persisted session outlives the run
    store.shutdown_gracefully().await?;
    Ok(())
}
