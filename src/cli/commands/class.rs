//! `partcost class` command - Part classification reference data

use clap::Subcommand;
use miette::Result;

use crate::cli::commands::utils::Context;
use crate::cli::output::{print_rows, print_serialized};
use crate::cli::GlobalOpts;

#[derive(Subcommand, Debug)]
pub enum ClassCommands {
    /// List part classifications and their pricing type
    List,
}

pub fn run(cmd: ClassCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ClassCommands::List => run_list(global),
    }
}

fn run_list(global: &GlobalOpts) -> Result<()> {
    let context = Context::load(global)?;
    let classes: Vec<_> = context.catalog.classifications().collect();
    if print_serialized(&classes, global.format)? {
        return Ok(());
    }
    if classes.is_empty() {
        println!("No classifications found.");
        return Ok(());
    }

    let rows = classes
        .iter()
        .map(|c| {
            vec![
                c.id.clone(),
                c.name.clone(),
                c.pricing_type.to_string(),
                c.description.clone().unwrap_or_default(),
            ]
        })
        .collect();
    print_rows(&["ID", "NAME", "PRICING", "DESCRIPTION"], rows, global.format);
    Ok(())
}
