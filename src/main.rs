use clap::Parser;
use slack_collector::utils::logger;
use slack_collector::{CliArgs, RunOptions, RunOutcome};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = CliArgs::parse();

    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting slack-collector");

    let options = RunOptions {
        app_root: args.app_root.clone(),
        config_path: args.config.clone(),
        dry_run: args.dry_run,
    };

    match slack_collector::run(&options).await {
        Ok(RunOutcome::Written(location)) => {
            println!("✅ Snapshot saved to: {}", location);
        }
        Ok(RunOutcome::DryRun {
            destination,
            member_count,
        }) => {
            println!(
                "🔍 Dry run: {} anonymized members would be written to {}",
                member_count,
                destination.display()
            );
        }
        Err(e) => {
            tracing::error!(
                error_class = e.class(),
                exit_code = e.exit_code(),
                "FATAL: {}",
                e
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            std::process::exit(e.exit_code());
        }
    }
}
