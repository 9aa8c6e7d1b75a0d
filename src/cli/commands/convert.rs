//! `partcost convert` command - Unit conversion

use miette::Result;
use serde::Serialize;

use crate::cli::output::{format_number, print_serialized};
use crate::cli::GlobalOpts;
use crate::core::quantity::Quantity;
use crate::core::units::Unit;

#[derive(clap::Args, Debug)]
pub struct ConvertArgs {
    /// Value to convert
    #[arg(allow_negative_numbers = true)]
    pub value: f64,

    /// Unit the value is in (e.g. in, cm³, g/cm³)
    pub from: String,

    /// Unit to convert to
    pub to: String,
}

#[derive(Serialize)]
struct Conversion {
    from: Quantity,
    to: Quantity,
}

pub fn run(args: ConvertArgs, global: &GlobalOpts) -> Result<()> {
    let from: Unit = args.from.parse()?;
    let to: Unit = args.to.parse()?;
    let source = Quantity::new(args.value, from);
    let converted = source.to(to)?;

    let conversion = Conversion {
        from: source,
        to: converted,
    };
    if print_serialized(&conversion, global.format)? {
        return Ok(());
    }
    if global.quiet {
        println!("{}", format_number(converted.value()));
    } else {
        println!("{} {}", format_number(converted.value()), converted.unit());
    }
    Ok(())
}
