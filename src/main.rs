use std::{env, process};

use aws_sdk_sts::error::DisplayErrorContext;
use tokio::io::AsyncReadExt;
use tracing::{error, info};

use default_backup_tagger::{Config, Invocation};

const USAGE: &str = r#"Usage: default-backup-tagger ['{"AccountId": "...", "Region": "...", "AccessRoleName": "..."}']

The invocation payload is read from stdin when no argument is given."#;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(error) = try_main().await {
        error!(error = %DisplayErrorContext(&*error), "Run failed");
        process::exit(1);
    }
}

async fn try_main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let payload = match (args.next(), args.next()) {
        (Some(flag), None) if flag == "-h" || flag == "--help" => {
            eprintln!("{USAGE}");
            return Ok(());
        }
        (Some(payload), None) => payload,
        (None, _) => {
            let mut payload = String::new();
            tokio::io::stdin().read_to_string(&mut payload).await?;
            payload
        }
        (Some(_), Some(_)) => return Err(USAGE.into()),
    };

    let invocation: Invocation = serde_json::from_str(&payload)?;
    let config = Config::from_env()?;

    let report = default_backup_tagger::run(&invocation, &config).await?;
    info!(
        failed_kinds = %serde_json::to_string(&report.region_report.failed_kinds)?,
        "Run complete"
    );
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
