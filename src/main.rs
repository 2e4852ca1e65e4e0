use clap::Parser;
use ajax_forms::cli::commands::{cmd_scan, cmd_submit, cmd_validate};
use ajax_forms::cli::config::{Cli, Commands, load_config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Scan { page } => {
            cmd_scan(&page, &config, cli.verbose)?;
        }
        Commands::Validate { page, form } => {
            if !cmd_validate(&page, &form, &config)? {
                std::process::exit(1);
            }
        }
        Commands::Submit {
            page,
            form,
            fields,
            files,
            base_url,
        } => {
            let succeeded = cmd_submit(
                &page,
                &form,
                &fields,
                &files,
                base_url.as_deref(),
                &config,
                cli.verbose,
            )?;
            if !succeeded {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
