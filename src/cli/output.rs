use crate::core::results::{ModuleOutcome, ScanReport};
use colored::Colorize;

pub struct OutputFormatter;

impl OutputFormatter {
    /// Print the startup banner
    pub fn print_banner() {
        println!("{}", "=".repeat(70).bright_cyan());
        println!("{}", "  Recon Hunter - Modular Reconnaissance Aggregator".bright_cyan().bold());
        println!("{}", "=".repeat(70).bright_cyan());
        println!();
    }

    /// Print an ethical use warning
    pub fn print_ethical_warning() {
        println!("{}", "⚠️  AUTHORIZED USE ONLY ⚠️".yellow().bold());
        println!("Only investigate identifiers and files you are permitted to assess.");
        println!();
    }

    /// Print one registry entry
    pub fn print_module(key: &str, name: &str, description: &str) {
        println!(
            "  {} {:<10} {} - {}",
            "•".bright_yellow(),
            key.bright_white(),
            name.bright_cyan(),
            description
        );
    }

    /// Print a module run header
    pub fn print_module_start(name: &str, target: &str) {
        println!(
            "\n{} {} -> {}",
            "🔍".bright_yellow(),
            name.bright_cyan().bold(),
            target.bright_white()
        );
    }

    /// Print the end-of-run summary
    pub fn print_summary(report: &ScanReport) {
        println!();
        println!("{}", "=".repeat(70).bright_cyan());
        println!("{}", "  Results Summary".bright_cyan().bold());
        println!("{}", "=".repeat(70).bright_cyan());
        println!();

        println!("  Target: {}", report.target.bright_white());
        for outcome in &report.outcomes {
            println!("  {}", Self::format_outcome(outcome));
        }
        println!();
        println!(
            "  Modules with findings: {}/{}",
            report.modules_with_findings().to_string().bright_green(),
            report.outcomes.len().to_string().bright_white()
        );
        println!();
        println!("{}", "=".repeat(70).bright_cyan());
    }

    fn format_outcome(outcome: &ModuleOutcome) -> String {
        let status = match &outcome.findings {
            Some(findings) if !findings.is_empty() => {
                format!("{} entries", findings.len()).bright_green()
            }
            _ => "no findings".bright_black(),
        };

        format!(
            "{} {} ({:.2?})",
            format!("{}:", outcome.module).bright_cyan(),
            status,
            outcome.elapsed
        )
    }

    /// Print error message
    pub fn print_error(message: &str) {
        eprintln!("{} {}", "❌".bright_red(), message.red());
    }

    /// Print success message
    pub fn print_success(message: &str) {
        println!("{} {}", "✓".bright_green(), message.green());
    }

    /// Print info message
    pub fn print_info(message: &str) {
        println!("{} {}", "ℹ️".bright_blue(), message);
    }
}
