use std::{error::Error, io::Write};

use clap::{Args, Parser, Subcommand, ValueEnum};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal::{self, ClearType},
};
use engine::{Engine, ManagementLevel, NewUser};
use migration::MigratorTrait;
use sea_orm::Database;

const PASSWORD_ATTEMPTS: usize = 3;

#[derive(Parser, Debug)]
#[command(name = "money_tracker_admin")]
#[command(about = "Admin utilities for the money tracker (bootstrap accounts)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./money_tracker.db?mode=rwc"
    )]
    database_url: String,

    /// Token signing secret, same value the server runs with.
    #[arg(long, env = "MONEY_TRACKER_AUTH__JWT_SECRET", hide_env_values = true)]
    jwt_secret: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Create an account, prompting for its password.
    Create(UserCreateArgs),
    /// Deactivate an account by id.
    Remove(UserRemoveArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Level {
    Admin,
    User,
}

impl From<Level> for ManagementLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Admin => ManagementLevel::Admin,
            Level::User => ManagementLevel::User,
        }
    }
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
    #[arg(long, value_enum, default_value_t = Level::Admin)]
    level: Level,
}

#[derive(Args, Debug)]
struct UserRemoveArgs {
    #[arg(long)]
    id: i32,
}

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self, Box<dyn Error + Send + Sync>> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn notice(out: &mut impl Write, text: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(text),
        Print("\r\n")
    )?;
    Ok(())
}

/// Read a line from the terminal without echoing it.
fn read_hidden(prompt: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
    let _raw = RawModeGuard::enter()?;
    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(prompt)
    )?;

    let mut buf = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };
        let ctrl = modifiers.contains(KeyModifiers::CONTROL);

        match code {
            KeyCode::Enter => break,
            KeyCode::Char('c') if ctrl => {
                execute!(out, Print("\r\n"))?;
                return Err("interrupted".into());
            }
            KeyCode::Backspace if buf.pop().is_some() => {
                execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
            }
            KeyCode::Char(ch) if !ctrl => {
                buf.push(ch);
                execute!(out, Print("*"))?;
            }
            _ => {}
        }
        out.flush()?;
    }

    execute!(out, Print("\r\n"))?;
    Ok(buf)
}

fn prompt_new_password() -> Result<String, Box<dyn Error + Send + Sync>> {
    let mut out = std::io::stderr();
    for _ in 0..PASSWORD_ATTEMPTS {
        let password = read_hidden("Password: ")?;
        if password.is_empty() {
            notice(&mut out, "Password must not be empty.")?;
            continue;
        }
        if password == read_hidden("Confirm password: ")? {
            return Ok(password);
        }
        notice(&mut out, "Passwords do not match. Try again.")?;
    }

    Err("too many attempts".into())
}

async fn build_engine(cli: &Cli) -> Result<Engine, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(cli.database_url.as_str()).await?;
    migration::Migrator::up(&db, None).await?;
    let engine = Engine::builder()
        .database(db)
        .token_secret(&cli.jwt_secret)
        .build()
        .await?;
    Ok(engine)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();
    let engine = build_engine(&cli).await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let password = prompt_new_password()?;
            let level = ManagementLevel::from(args.level);
            let user = engine
                .add_user(NewUser {
                    username: args.username,
                    password,
                    level: Some(level.as_i32()),
                    status: None,
                })
                .await?;
            println!("created user: {} (id {}, {level:?})", user.username, user.id);
        }
        Command::User(User {
            command: UserCommand::Remove(args),
        }) => {
            engine.remove_user(args.id).await?;
            println!("deactivated user: {}", args.id);
        }
    }

    Ok(())
}
