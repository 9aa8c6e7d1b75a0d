use clap::Parser;
use miette::Result;
use partcost::cli::commands::utils::find_project;
use partcost::cli::{Cli, Commands};
use partcost::core::Config;

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) so piping to
    // `head` or `grep -q` does not panic on a closed stdout.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    let config = Config::load_for(find_project(&global).ok().as_ref());
    partcost::logging::init(global.verbose, config.log_level.as_deref());

    match cli.command {
        Commands::Init(args) => partcost::cli::commands::init::run(args, &global),
        Commands::Analyze(args) => partcost::cli::commands::analyze::run(args, &global),
        Commands::Estimate(args) => partcost::cli::commands::estimate::run(args, &global),
        Commands::Convert(args) => partcost::cli::commands::convert::run(args, &global),
        Commands::Units(cmd) => partcost::cli::commands::units::run(cmd, &global),
        Commands::Material(cmd) => partcost::cli::commands::material::run(cmd, &global),
        Commands::Class(cmd) => partcost::cli::commands::class::run(cmd, &global),
        Commands::Completions(args) => partcost::cli::commands::completions::run(args),
    }
}
