//! `partcost init` command - Initialize a new partcost project

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::Path;

use crate::cli::GlobalOpts;
use crate::core::project::{Project, ProjectError, PROJECT_DIR};

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: std::path::PathBuf,

    /// Overwrite config, units, and reference data if .partcost/ already exists
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, global: &GlobalOpts) -> Result<()> {
    let path = if args.path.as_os_str() == "." {
        std::env::current_dir().into_diagnostic()?
    } else {
        args.path.clone()
    };

    if !path.exists() {
        std::fs::create_dir_all(&path).into_diagnostic()?;
        if !global.quiet {
            println!(
                "{} Created directory {}",
                style("✓").green(),
                style(path.display()).cyan()
            );
        }
    }

    let project = if args.force {
        Project::init_force(&path)
    } else {
        Project::init(&path)
    };

    match project {
        Ok(project) => {
            if global.quiet {
                return Ok(());
            }
            println!(
                "{} Initialized partcost project at {}",
                style("✓").green(),
                style(project.root().display()).cyan()
            );
            println!();
            println!("Created project files:");
            print_structure(project.root());
            println!();
            println!("Next steps:");
            println!(
                "  {} Estimate a part",
                style("partcost estimate part.stl --material \"Aluminum 6061\" --class machined-block").yellow()
            );
            println!(
                "  {} Change display units",
                style("partcost units set length in").yellow()
            );
            Ok(())
        }
        Err(ProjectError::AlreadyExists(path)) => {
            println!(
                "{} partcost project already exists at {}",
                style("!").yellow(),
                style(path.display()).cyan()
            );
            println!();
            println!(
                "Use {} to reinitialize",
                style("partcost init --force").yellow()
            );
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn print_structure(root: &Path) {
    let files = [
        "config.yaml",
        "units.yaml",
        "materials.yaml",
        "classifications.yaml",
    ];

    println!("  📁 {}", style(format!("{}/", PROJECT_DIR)).dim());
    for file in files {
        if root.join(PROJECT_DIR).join(file).exists() {
            println!("    📄 {}", style(file).dim());
        }
    }
}
