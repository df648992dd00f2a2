use clap::Parser;
use miette::Result;
use opmatrix::cli::{commands, Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) so piping into
    // `head` and friends does not panic on a closed stdout.
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
    opmatrix::logging::init(global.verbose, global.quiet);

    match cli.command {
        Commands::Import(args) => commands::import::run(args, &global),
        Commands::Colors(args) => commands::colors::run(args, &global),
        Commands::Matrix(args) => commands::matrix::run(args, &global),
        Commands::Export(args) => commands::export::run(args, &global),
        Commands::Report(args) => commands::report::run(args, &global),
        Commands::Config(cmd) => commands::config::run(cmd, &global),
        Commands::Completions(args) => commands::completions::run(args),
    }
}
