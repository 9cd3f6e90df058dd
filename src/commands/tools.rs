//! Handler for the `tools` command.

use colored::*;

use taidy_lib::category::Category;
use taidy_lib::tools::{Operation, PathOracle, ToolDescriptor, ToolOracle, chain_for};

/// Print every category's tool chains, marking the tool that would run here.
pub fn handle_tools() {
    let oracle = PathOracle::new();

    for category in Category::ALL {
        println!("{} {}", category.key().bold(), format!("({})", category.display_name()).dimmed());
        for operation in Operation::ALL {
            let line = match chain_for(category, operation) {
                Some(chain) => describe_chain(chain, &oracle),
                None => "-".dimmed().to_string(),
            };
            println!("  {:<8}{line}", operation.to_string());
        }
    }
}

fn describe_chain(chain: &[ToolDescriptor], oracle: &dyn ToolOracle) -> String {
    // Same first-match rule the planner applies
    let selected = chain.iter().position(|tool| tool.is_available(oracle));

    let mut parts: Vec<String> = chain
        .iter()
        .enumerate()
        .map(|(i, tool)| {
            let text = std::iter::once(tool.program)
                .chain(tool.args.iter().copied())
                .collect::<Vec<_>>()
                .join(" ");
            if selected == Some(i) {
                format!("{} {}", text.green().bold(), "✓".green())
            } else {
                text.dimmed().to_string()
            }
        })
        .collect();

    if selected.is_none() {
        parts.push("(none installed)".red().to_string());
    }
    parts.join(" → ")
}
