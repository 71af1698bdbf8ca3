use clap::Parser;
use std::process;
use taskq::cli::{Cli, Commands};
use taskq::cli_handlers;
use taskq::demo::DemoParams;

fn main() {
    // Logs go to stderr so stdout stays clean for --json
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config();

    let result = match cli.command {
        Commands::Init { no_seed } => cli_handlers::handle_init(&config, no_seed),
        Commands::User(command) => cli_handlers::handle_user(&config, command),
        Commands::Status(command) => cli_handlers::handle_status(&config, command),
        Commands::Task(command) => cli_handlers::handle_task(&config, command),
        Commands::Stats => cli_handlers::handle_stats(&config),
        Commands::Query { sql, params } => cli_handlers::handle_query(&config, &sql, &params),
        Commands::Demo { user, task, email } => cli_handlers::handle_demo(
            &config,
            DemoParams {
                user_id: user,
                task_id: task,
                email_pattern: email,
                ..DemoParams::default()
            },
        ),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
