use colored::Colorize;
use miette::Result;
use std::collections::BTreeSet;

/// Terminal reporter with colored output
pub struct TerminalReporter;

impl TerminalReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn report(&self, unused: &BTreeSet<String>) -> Result<()> {
        if unused.is_empty() {
            println!("{}", "No unused classes found!".green().bold());
            return Ok(());
        }

        println!();
        println!(
            "{}",
            format!("Found {} unused classes:", unused.len())
                .yellow()
                .bold()
        );
        println!();

        // Group by package for readability
        let mut last_package = None;
        for name in unused {
            let package = name.rsplit_once('.').map(|(pkg, _)| pkg).unwrap_or("");
            if last_package != Some(package) {
                if last_package.is_some() {
                    println!();
                }
                println!("{}", package.cyan().bold());
                last_package = Some(package);
            }
            println!("  {} {}", "○".dimmed(), name);
        }

        println!();
        println!(
            "{}",
            format!("Total: {} classes would be removed by shrinking", unused.len()).dimmed()
        );

        Ok(())
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}
