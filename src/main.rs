use bac_advisor::app::interactive::{run_interactive, FormState};
use bac_advisor::app::{build_session, report};
use bac_advisor::config::cli::Command;
use bac_advisor::utils::{error::AdvisorError, logger, validation::Validate};
use bac_advisor::CliConfig;
use clap::Parser;

fn fail(e: &AdvisorError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting bac-advisor");
    tracing::debug!("CLI config: {:?}", config.command);

    // 驗證輸入
    if let Err(e) = config.validate() {
        fail(&e);
    }

    let toml = config.load_toml().unwrap_or_else(|e| fail(&e));
    let mut session =
        build_session(&toml, &config.session_options()).unwrap_or_else(|e| fail(&e));
    let mut rng = rand::rng();

    match &config.command {
        Command::Estimate(args) => {
            let report = session
                .run(&args.to_request(), &mut rng)
                .await
                .unwrap_or_else(|e| fail(&e));

            if args.json {
                println!("{}", report::render_json(&report)?);
            } else {
                print!("{}", report::render_text(&report));
            }
        }
        Command::Interactive(args) => {
            let mut state = FormState {
                input: args.drink.to_input(),
                ..FormState::default()
            };
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();

            run_interactive(&mut session, &mut state, stdin, &mut stdout, &mut rng).await?;
            tracing::info!("👋 Interactive session closed");
        }
    }

    Ok(())
}
