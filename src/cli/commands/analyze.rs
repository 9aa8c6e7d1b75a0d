//! `partcost analyze` command - Geometry and machining time for a model

use miette::Result;
use std::path::PathBuf;

use crate::cli::commands::utils::{cancel_token, parse_length_unit, Context};
use crate::cli::output::{print_report, print_serialized, print_tsv, Field};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::units::LengthUnit;
use crate::geometry::{load_model, GeometricDescriptor};

#[derive(clap::Args, Debug)]
pub struct AnalyzeArgs {
    /// Model file: .stl mesh or .yaml/.yml/.json kernel properties
    pub model: PathBuf,

    /// Length unit of STL coordinates
    #[arg(long, short = 'u', default_value = "mm", value_parser = parse_length_unit)]
    pub unit: LengthUnit,

    /// Give up after this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

pub fn run(args: AnalyzeArgs, global: &GlobalOpts) -> Result<()> {
    let context = Context::load(global)?;
    let cancel = cancel_token(args.timeout);

    let model = load_model(&args.model, args.unit, &cancel)?;
    let descriptor = context.pipeline().analyze(model.as_ref(), &cancel)?;

    if print_serialized(&descriptor, global.format)? {
        return Ok(());
    }
    let fields = descriptor_fields(&descriptor);
    match global.format {
        OutputFormat::Tsv => print_tsv(&fields),
        _ => print_report("Geometry", &fields),
    }
    Ok(())
}

pub(crate) fn descriptor_fields(descriptor: &GeometricDescriptor) -> Vec<Field> {
    let bbox = descriptor.bounding_box();
    let com = descriptor.center_of_mass();
    vec![
        Field::Quantity("width", bbox.width),
        Field::Quantity("depth", bbox.depth),
        Field::Quantity("height", bbox.height),
        Field::Quantity("volume", descriptor.volume()),
        Field::Quantity("surface_area", descriptor.surface_area()),
        Field::Quantity("center_x", com.x),
        Field::Quantity("center_y", com.y),
        Field::Quantity("center_z", com.z),
        Field::Count("faces", descriptor.face_count()),
        Field::Count("edges", descriptor.edge_count()),
        Field::Count("components", descriptor.component_count()),
        Field::Quantity("machining_time", descriptor.machining_time()),
    ]
}
