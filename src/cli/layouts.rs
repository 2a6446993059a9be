//! Prints the static key tables.

use crate::cli::common::{CliError, CliResult};
use crate::models::{KeyboardLayout, ALPHA_BACKSPACE_ROW, BACKSPACE};
use clap::Args;
use serde::Serialize;

/// Show the key tables of both layouts
#[derive(Args, Debug)]
pub struct LayoutsArgs {
    /// Only show this layout (default or numeric)
    #[arg(long, value_name = "LAYOUT")]
    layout: Option<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
struct LayoutOutput {
    name: KeyboardLayout,
    rows: Vec<Vec<String>>,
}

impl LayoutsArgs {
    /// Execute layouts command
    pub fn execute(&self) -> CliResult<()> {
        let layouts = match &self.layout {
            Some(name) => vec![name.parse::<KeyboardLayout>().map_err(|_| {
                CliError::validation("Invalid layout. Must be 'default' or 'numeric'")
            })?],
            None => vec![KeyboardLayout::Default, KeyboardLayout::Numeric],
        };
        let output: Vec<LayoutOutput> = layouts.into_iter().map(layout_output).collect();

        if self.json {
            let json = serde_json::to_string_pretty(&output)
                .map_err(|e| CliError::io(format!("Failed to serialize layouts to JSON: {e}")))?;
            println!("{json}");
        } else {
            for layout in &output {
                println!("{}:", layout.name);
                for row in &layout.rows {
                    let cells: Vec<&str> = row
                        .iter()
                        .map(|key| if key.is_empty() { "·" } else { key.as_str() })
                        .collect();
                    println!("  {}", cells.join(" "));
                }
                println!();
            }
        }

        Ok(())
    }
}

/// Rows as the surface shows them, backspace included.
fn layout_output(layout: KeyboardLayout) -> LayoutOutput {
    let mut rows: Vec<Vec<String>> = layout
        .rows()
        .iter()
        .map(|row| row.iter().map(|key| (*key).to_string()).collect())
        .collect();
    if layout == KeyboardLayout::Default {
        if let Some(row) = rows.get_mut(ALPHA_BACKSPACE_ROW) {
            row.push(BACKSPACE.to_string());
        }
    }
    LayoutOutput { name: layout, rows }
}
