//! `partcost material` command - Material reference data

use clap::Subcommand;
use miette::Result;

use crate::cli::commands::utils::Context;
use crate::cli::output::{format_number, format_quantity, print_rows, print_serialized};
use crate::cli::GlobalOpts;
use crate::entities::Price;

#[derive(Subcommand, Debug)]
pub enum MaterialCommands {
    /// List materials with density and stock prices
    List,
}

pub fn run(cmd: MaterialCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        MaterialCommands::List => run_list(global),
    }
}

fn run_list(global: &GlobalOpts) -> Result<()> {
    let context = Context::load(global)?;
    let materials: Vec<_> = context.catalog.materials().collect();
    if print_serialized(&materials, global.format)? {
        return Ok(());
    }
    if materials.is_empty() {
        println!("No materials found.");
        return Ok(());
    }

    let rows = materials
        .iter()
        .map(|m| {
            vec![
                m.name().to_string(),
                format_quantity(&m.density()),
                format_price(&m.block_price()),
                format_price(&m.sheet_price()),
            ]
        })
        .collect();
    print_rows(&["NAME", "DENSITY", "BLOCK PRICE", "SHEET PRICE"], rows, global.format);
    Ok(())
}

fn format_price(price: &Price) -> String {
    format!("{}/{}", format_number(price.value()), price.unit())
}
