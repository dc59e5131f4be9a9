use anyhow::Context;
use clap::Parser;
use coordinator_client::utils::logger;
use coordinator_client::{CliArgs, Endpoint, ServiceClient, ServiceResult};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    let config = args
        .resolve_config()
        .context("Failed to load configuration")?;
    if args.verbose {
        tracing::debug!("Service config: {:?}", config);
    }

    let client = match ServiceClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let endpoints = args.command.endpoints();
    let total = endpoints.len();

    // 全部同時送出，依完成順序輸出
    let (tx, mut rx) = mpsc::unbounded_channel::<(Endpoint, ServiceResult)>();
    for endpoint in endpoints {
        let tx = tx.clone();
        let submitted = endpoint.clone();
        client.call(endpoint, move |result| {
            let _ = tx.send((submitted, result));
        });
    }
    drop(tx);

    let mut failures = 0;
    while let Some((endpoint, result)) = rx.recv().await {
        if !print_result(&endpoint, result, total > 1)? {
            failures += 1;
        }
    }

    if failures > 0 {
        tracing::error!("❌ {} of {} requests failed", failures, total);
        std::process::exit(1);
    }

    Ok(())
}

fn print_result(
    endpoint: &Endpoint,
    result: ServiceResult,
    labelled: bool,
) -> anyhow::Result<bool> {
    match result {
        Ok(payload) => {
            let json = serde_json::to_string_pretty(&payload)?;
            if labelled {
                println!("## {}", endpoint.kind());
            }
            println!("{}", json);
            Ok(true)
        }
        Err(e) => {
            tracing::error!(endpoint = %endpoint.kind(), "❌ Request failed: {:?}", e);
            eprintln!("❌ {}: {}", endpoint.kind(), e.user_friendly_message());
            Ok(false)
        }
    }
}
