//! `partcost units` command - Display unit preferences

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::commands::utils::{find_project, Context};
use crate::cli::output::{print_rows, print_serialized};
use crate::cli::GlobalOpts;
use crate::core::preferences::UnitRegistry;
use crate::core::units::{Dimension, Unit};

#[derive(Subcommand, Debug)]
pub enum UnitsCommands {
    /// Show the default unit and allowed options per category
    List,

    /// Set the default display unit for a category
    Set(SetArgs),

    /// Replace the allowed units for a category
    Options(OptionsArgs),
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Category (length, area, volume, mass, density, time)
    pub category: Dimension,

    /// Unit symbol, one of the category's options
    pub unit: Unit,
}

#[derive(clap::Args, Debug)]
pub struct OptionsArgs {
    /// Category (length, area, volume, mass, density, time)
    pub category: Dimension,

    /// Allowed units, in display order
    #[arg(required = true)]
    pub units: Vec<Unit>,

    /// Default unit (default: the first option)
    #[arg(long)]
    pub default: Option<Unit>,
}

pub fn run(cmd: UnitsCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        UnitsCommands::List => run_list(global),
        UnitsCommands::Set(args) => run_set(args, global),
        UnitsCommands::Options(args) => run_options(args, global),
    }
}

fn run_list(global: &GlobalOpts) -> Result<()> {
    let context = Context::load(global)?;
    let snapshot = context.registry.snapshot();
    if print_serialized(&*snapshot, global.format)? {
        return Ok(());
    }

    let rows = snapshot
        .categories()
        .map(|(category, preference)| {
            vec![
                category.to_string(),
                preference.default_unit().to_string(),
                preference
                    .options()
                    .iter()
                    .map(|u| u.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            ]
        })
        .collect();
    print_rows(&["CATEGORY", "DEFAULT", "OPTIONS"], rows, global.format);
    Ok(())
}

// Updates go through the registry so validation matches library callers
fn update_project<F>(global: &GlobalOpts, apply: F) -> Result<()>
where
    F: FnOnce(&UnitRegistry) -> Result<()>,
{
    let project = find_project(global)?;
    let context = Context::load(global)?;
    apply(&context.registry)?;
    context.registry.snapshot().save(&project.units_path())?;
    Ok(())
}

fn run_set(args: SetArgs, global: &GlobalOpts) -> Result<()> {
    update_project(global, |registry| {
        Ok(registry.set_default(args.category, args.unit)?)
    })?;
    if !global.quiet {
        println!(
            "{} Default {} unit set to {}",
            style("✓").green(),
            args.category,
            style(args.unit).cyan()
        );
    }
    Ok(())
}

fn run_options(args: OptionsArgs, global: &GlobalOpts) -> Result<()> {
    let default = args.default.unwrap_or(args.units[0]);
    let count = args.units.len();
    update_project(global, |registry| {
        Ok(registry.set_options(args.category, args.units, default)?)
    })?;
    if !global.quiet {
        println!(
            "{} {} now allows {} unit(s), default {}",
            style("✓").green(),
            args.category,
            count,
            style(default).cyan()
        );
    }
    Ok(())
}
