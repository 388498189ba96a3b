use clap::Parser;
use miette::Result;
use portal::cli::commands::entity;
use portal::cli::{Cli, Commands};
use portal::core::logging;
use portal::entities::{BudgetCategory, Employee, Grade, Journey, Role, Technology};

#[tokio::main]
async fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
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
    logging::init(global.verbose);

    match cli.command {
        Commands::Employee(cmd) => entity::run::<Employee>(cmd, &global).await,
        Commands::Budget(cmd) => entity::run::<BudgetCategory>(cmd, &global).await,
        Commands::Journey(cmd) => entity::run::<Journey>(cmd, &global).await,
        Commands::Grade(cmd) => entity::run::<Grade>(cmd, &global).await,
        Commands::Role(cmd) => entity::run::<Role>(cmd, &global).await,
        Commands::Tech(cmd) => entity::run::<Technology>(cmd, &global).await,
        Commands::Config(cmd) => portal::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => portal::cli::commands::completions::run(args),
    }
}
