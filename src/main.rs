mod upload;

use crate::upload::cli::{Cli, Command};
use crate::upload::client::{execute, UploadOptions, UploadRequest};
use crate::upload::report::BatchReport;
use crate::upload::transport::HttpTransport;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // 解析命令行参数
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), anyhow::Error> {
    match cli.command {
        Command::Upload {
            file_path,
            upload_url,
            environment,
            key,
            token_url,
            output,
            max_size,
            insecure,
            quiet,
        } => {
            let request = UploadRequest::new(UploadOptions {
                path: file_path,
                upload_url,
                environment,
                key,
                token_url,
                output,
                max_size: (max_size > 0).then_some(max_size),
                show_progress: !quiet,
            })?;

            let transport = HttpTransport::new(insecure)?;
            let report = execute(&request, &transport).await?;
            print_report(&report);
        }
    }
    Ok(())
}

fn print_report(report: &BatchReport) {
    if report.result.is_empty() {
        println!("No images were uploaded.");
    } else {
        eprintln!("========= Addresses =========");
        println!("{}", report.result_json());
    }

    for error in &report.errors {
        eprintln!("⚠️  {}", error);
    }
}
