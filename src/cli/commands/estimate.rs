//! `partcost estimate` command - Raw material cost for a model

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::commands::analyze::descriptor_fields;
use crate::cli::commands::utils::{cancel_token, parse_length_unit, Context};
use crate::cli::output::{print_report, print_serialized, print_tsv, Field};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::units::LengthUnit;
use crate::costing::{CostEstimate, PartEstimate, DEFAULT_MARGIN};
use crate::geometry::load_model;

#[derive(clap::Args, Debug)]
pub struct EstimateArgs {
    /// Model file: .stl mesh or .yaml/.yml/.json kernel properties
    pub model: PathBuf,

    /// Material name (see `partcost material list`)
    #[arg(long, short = 'm')]
    pub material: String,

    /// Part classification id or name (see `partcost class list`)
    #[arg(long = "class", short = 'c')]
    pub classification: String,

    /// Stock margin per axis, in the default length unit
    #[arg(long)]
    pub margin: Option<f64>,

    /// X margin, overriding --margin on that axis
    #[arg(long)]
    pub margin_x: Option<f64>,

    /// Y margin, overriding --margin on that axis
    #[arg(long)]
    pub margin_y: Option<f64>,

    /// Z margin, overriding --margin on that axis
    #[arg(long)]
    pub margin_z: Option<f64>,

    /// Length unit of STL coordinates
    #[arg(long, short = 'u', default_value = "mm", value_parser = parse_length_unit)]
    pub unit: LengthUnit,

    /// Give up after this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

pub fn run(args: EstimateArgs, global: &GlobalOpts) -> Result<()> {
    let context = Context::load(global)?;
    let cancel = cancel_token(args.timeout);

    let model = load_model(&args.model, args.unit, &cancel)?;
    let margin = args
        .margin
        .or(context.config.stock_margin)
        .unwrap_or(DEFAULT_MARGIN);
    let pipeline = context.pipeline().with_axis_margins([
        args.margin_x.unwrap_or(margin),
        args.margin_y.unwrap_or(margin),
        args.margin_z.unwrap_or(margin),
    ]);
    let estimate = pipeline.estimate(
        model.as_ref(),
        &args.material,
        &args.classification,
        &cancel,
    )?;

    if print_serialized(&estimate, global.format)? {
        return Ok(());
    }
    match global.format {
        OutputFormat::Tsv => {
            let mut fields = descriptor_fields(&estimate.geometry);
            fields.extend(cost_fields(&estimate.cost));
            print_tsv(&fields);
        }
        _ => print_estimate(&estimate, global.quiet),
    }
    Ok(())
}

fn cost_fields(cost: &CostEstimate) -> Vec<Field> {
    vec![
        Field::Text("material", cost.material.clone()),
        Field::Text("pricing_type", cost.pricing_type.to_string()),
        Field::Quantity("raw_x", cost.raw_stock.x),
        Field::Quantity("raw_y", cost.raw_stock.y),
        Field::Quantity("raw_z", cost.raw_stock.z),
        Field::Quantity("raw_volume", cost.raw_volume),
        Field::Quantity("raw_weight", cost.raw_weight),
        Field::Number("total_cost", cost.total_cost),
    ]
}

fn print_estimate(estimate: &PartEstimate, quiet: bool) {
    if !quiet {
        print_report("Geometry", &descriptor_fields(&estimate.geometry));
        println!();
    }
    print_report("Cost", &cost_fields(&estimate.cost));
    if !quiet {
        println!();
        println!(
            "{}",
            style(format!(
                "computed {}",
                estimate.computed_at.format("%Y-%m-%d %H:%M:%S UTC")
            ))
            .dim()
        );
    }
}
