use sea_orm::Database;
use sea_orm_migration::prelude::*;

const DEFAULT_DATABASE_URL: &str = "sqlite:./money_tracker.db?mode=rwc";

const USAGE: &str = "Usage: migration [up [N]|down [N]|fresh|refresh|reset|status]";

fn steps(arg: Option<String>) -> Result<Option<u32>, Box<dyn std::error::Error + Send + Sync>> {
    match arg {
        Some(raw) => Ok(Some(raw.parse().map_err(|_| format!("invalid step count: {raw}"))?)),
        None => Ok(None),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut args = std::env::args().skip(1);
    let cmd = args.next().unwrap_or_else(|| "up".to_string());

    let db_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
    let db = Database::connect(db_url.as_str()).await?;

    match cmd.as_str() {
        "up" => migration::Migrator::up(&db, steps(args.next())?).await?,
        "down" => migration::Migrator::down(&db, steps(args.next())?.or(Some(1))).await?,
        "fresh" => migration::Migrator::fresh(&db).await?,
        "refresh" => migration::Migrator::refresh(&db).await?,
        "reset" => migration::Migrator::reset(&db).await?,
        "status" => migration::Migrator::status(&db).await?,
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    }

    Ok(())
}
