use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde_json::Value;
use watchtime_client::{
    format_duration, ClientConfig, MatchPolicy, Notification, NotificationKind, Notifier, Primitive,
    Record, WorkerClient,
};

mod banner;

use banner::TerminalBanner;

#[derive(Parser, Debug)]
#[command(name = "watchtime", version)]
struct Args {
    /// Worker base URL, e.g. http://127.0.0.1:17600
    #[arg(long, default_value = "http://127.0.0.1:17600", global = true)]
    worker_url: String,

    /// Give up on the worker after this many milliseconds. 0 waits forever.
    #[arg(long, default_value_t = 10_000, global = true)]
    timeout_ms: u64,

    /// Fail instead of picking the first record when a lookup expected to be
    /// unique (today's watch time, active watch mode) matches several.
    #[arg(long, default_value_t = false, global = true)]
    strict: bool,

    /// How long result banners stay on screen (milliseconds).
    #[arg(long, default_value_t = 1500, global = true)]
    banner_ms: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch one record by id.
    Get { table: String, id: i64 },
    /// Fetch every record of a table.
    All { table: String },
    /// Fetch records whose PROPERTY equals VALUE.
    Filter {
        table: String,
        property: String,
        value: String,
    },
    /// Insert records given as JSON (an object or an array of objects).
    Insert { table: String, records: String },
    /// Replace records whose PROPERTY equals VALUE with the given JSON object.
    Update {
        table: String,
        property: String,
        value: String,
        record: String,
    },
    /// Delete one record by id.
    Delete { table: String, id: i64 },
    /// Remove every record of a table.
    Reset { table: String },
    /// Today's watch time.
    Today {
        /// Abbreviate units (Min/Sec).
        #[arg(long, default_value_t = false)]
        short: bool,
    },
    /// Watch time summed over all days.
    Total {
        #[arg(long, default_value_t = false)]
        short: bool,
    },
    /// The active watch mode.
    Mode,
    /// Format a number of seconds for display (no worker involved).
    Format {
        #[arg(allow_negative_numbers = true)]
        seconds: i64,
        #[arg(long, default_value_t = false)]
        short: bool,
    },
    /// Ask the worker to open another page.
    Redirect { page: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "watchtime_cli=info,watchtime_client=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = ClientConfig::default()
        .with_worker_url(args.worker_url.as_str())
        .with_timeout((args.timeout_ms > 0).then(|| Duration::from_millis(args.timeout_ms)))
        .with_match_policy(if args.strict {
            MatchPolicy::Strict
        } else {
            MatchPolicy::First
        });
    let client = WorkerClient::new(config);
    let notifier = Notifier::new(TerminalBanner::stderr());
    let banner_delay = Duration::from_millis(args.banner_ms);

    let outcome = run(&client, &notifier, banner_delay, args.command).await;
    let code = match failure_banner(&outcome) {
        Some(banner) => {
            notifier.show(&banner).await;
            ExitCode::FAILURE
        }
        None => ExitCode::SUCCESS,
    };
    notifier.settle().await;
    code
}

/// Persistent error banner for a failed command, if any.
fn failure_banner(outcome: &anyhow::Result<()>) -> Option<Notification> {
    let e = outcome.as_ref().err()?;
    Some(Notification::new(NotificationKind::Error, format!("{e:#}")).persistent())
}

async fn run(
    client: &WorkerClient,
    notifier: &Notifier<TerminalBanner>,
    banner_delay: Duration,
    command: Command,
) -> anyhow::Result<()> {
    let note = |kind, msg: String| Notification::new(kind, msg).with_delay(banner_delay);

    match command {
        Command::Get { table, id } => print_json(&client.select_by_id(&table, id).await?),
        Command::All { table } => print_json(&client.select_all(&table).await?),
        Command::Filter {
            table,
            property,
            value,
        } => print_json(&client.filter(&table, &property, parse_value(&value)?).await?),
        Command::Insert { table, records } => {
            let records = parse_records(&records)?;
            let n = records.len();
            print_json(&client.insert(&table, records).await?)?;
            notifier
                .show(&note(
                    NotificationKind::Success,
                    format!("{n} record(s) inserted into {table}"),
                ))
                .await;
            Ok(())
        }
        Command::Update {
            table,
            property,
            value,
            record,
        } => {
            let record = parse_object(&record)?;
            print_json(
                &client
                    .update_by_property(&table, &property, parse_value(&value)?, record)
                    .await?,
            )?;
            notifier
                .show(&note(NotificationKind::Success, format!("{table} updated")))
                .await;
            Ok(())
        }
        Command::Delete { table, id } => {
            print_json(&client.delete_by_id(&table, id).await?)?;
            notifier
                .show(&note(NotificationKind::Success, format!("{table} #{id} deleted")))
                .await;
            Ok(())
        }
        Command::Reset { table } => {
            print_json(&client.reset_table(&table).await?)?;
            notifier
                .show(&note(NotificationKind::Warning, format!("{table} cleared")))
                .await;
            Ok(())
        }
        Command::Today { short } => {
            let rec = client.current_watch_time().await?;
            let text = format_duration(seconds_i64(rec.seconds)?, short)?;
            println!("{text}");
            notifier
                .show(&note(
                    NotificationKind::Info,
                    format!("Watched today ({}): {text}", rec.date),
                ))
                .await;
            Ok(())
        }
        Command::Total { short } => {
            let total = client.total_watch_time().await?;
            let text = format_duration(seconds_i64(total)?, short)?;
            println!("{text}");
            notifier
                .show(&note(NotificationKind::Info, format!("Watched in total: {text}")))
                .await;
            Ok(())
        }
        Command::Mode => {
            let mode = client.current_watch_mode().await?;
            print_json(&Value::Object(mode.fields))
        }
        Command::Format { seconds, short } => {
            println!("{}", format_duration(seconds, short)?);
            Ok(())
        }
        Command::Redirect { page } => {
            client.spawn_redirect(&page).await?;
            Ok(())
        }
    }
}

fn print_json(v: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(v)?);
    Ok(())
}

fn seconds_i64(seconds: u64) -> anyhow::Result<i64> {
    i64::try_from(seconds).map_err(|_| anyhow::anyhow!("duration out of range: {seconds}"))
}

/// `true`, `3`, `"x"` are read as JSON; anything else is a plain string.
fn parse_value(raw: &str) -> anyhow::Result<Primitive> {
    match serde_json::from_str::<Value>(raw) {
        Ok(v @ (Value::Bool(_) | Value::Number(_) | Value::String(_))) => {
            Ok(Primitive::try_from(v)?)
        }
        Ok(other) => anyhow::bail!("expected a bool, number or string, got {other}"),
        Err(_) => Ok(Primitive::Text(raw.to_string())),
    }
}

fn parse_object(raw: &str) -> anyhow::Result<Record> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Object(map) => Ok(map),
        other => anyhow::bail!("expected a JSON object, got {other}"),
    }
}

fn parse_records(raw: &str) -> anyhow::Result<Vec<Record>> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Object(map) => Ok(vec![map]),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(map) => Ok(map),
                other => Err(anyhow::anyhow!("expected a JSON object, got {other}")),
            })
            .collect(),
        other => anyhow::bail!("expected a JSON object or array, got {other}"),
    }
}
