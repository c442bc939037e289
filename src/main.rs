use anyhow::{anyhow, Context};
use clap::Parser;
use recon_hunter::cli::{Cli, Commands, OutputFormatter};
use recon_hunter::core::{Config, ReconModule, ScanReport};
use recon_hunter::modules::{self, ModuleContext, MODULE_NAMES};
use tracing::info;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(false)
        .init();

    OutputFormatter::print_banner();

    if let Err(e) = execute_command(cli.command).await {
        OutputFormatter::print_error(&format!("Error: {:#}", e));
        std::process::exit(1);
    }
}

async fn execute_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Run {
            module,
            target,
            save,
        } => run_command(&module, &target, save).await,
        Commands::All { target, save } => all_command(&target, save).await,
        Commands::List => {
            list_command();
            Ok(())
        }
    }
}

fn build_context() -> ModuleContext {
    let config = Config::load();
    let ctx = ModuleContext::new(config);
    ctx.config.validate(ctx.logger.as_ref());
    ctx
}

async fn run_command(name: &str, target: &str, save: bool) -> anyhow::Result<()> {
    let ctx = build_context();
    let module = modules::get_module(name, &ctx).ok_or_else(|| {
        anyhow!(
            "Unknown module: {} (available: {})",
            name,
            MODULE_NAMES.join(", ")
        )
    })?;

    OutputFormatter::print_ethical_warning();
    OutputFormatter::print_module_start(module.name(), target);

    let outcome = modules::run_module(module.as_ref(), target).await;
    finish(&ctx, ScanReport::new(target, vec![outcome]), name, save)
}

async fn all_command(target: &str, save: bool) -> anyhow::Result<()> {
    let ctx = build_context();
    let selected: Vec<Box<dyn ReconModule>> = modules::all_modules(&ctx)
        .into_iter()
        .map(|(_, module)| module)
        .collect();

    OutputFormatter::print_ethical_warning();
    for module in &selected {
        OutputFormatter::print_module_start(module.name(), target);
    }

    let outcomes = modules::run_all(&selected, target).await;
    finish(&ctx, ScanReport::new(target, outcomes), "all", save)
}

fn finish(ctx: &ModuleContext, report: ScanReport, label: &str, save: bool) -> anyhow::Result<()> {
    OutputFormatter::print_summary(&report);

    if save {
        let path = report
            .save(&ctx.config.output_dir, label)
            .with_context(|| format!("failed to save report to {}", ctx.config.output_dir.display()))?;
        info!("Report written to {}", path.display());
        OutputFormatter::print_success(&format!("Results saved to {}", path.display()));
    }

    Ok(())
}

fn list_command() {
    OutputFormatter::print_info("Available Modules:");
    let ctx = ModuleContext::new(Config::default());
    for (key, module) in modules::all_modules(&ctx) {
        OutputFormatter::print_module(key, module.name(), module.description());
    }
    println!();
}
