use std::io;
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;

use dirclip::cli::{Cli, StartupError};
use dirclip::ui::app::UiApp;

fn main() -> ExitCode {
    match dirclip::infra::clipboard::run_daemon_if_requested() {
        Ok(true) => return ExitCode::SUCCESS,
        Ok(false) => {}
        Err(_) => return ExitCode::FAILURE,
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            let _ = err.print();
            return ExitCode::FAILURE;
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<StartupError>() {
                Some(startup) => eprintln!("Error: {startup}"),
                None => eprintln!("Error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let launch = cli.resolve()?;

    if cli.list {
        return dirclip::cli::print_listing(&mut io::stdout().lock(), &launch.root, &launch.prefix);
    }

    if let Err(err) = dirclip::init(&launch.config) {
        eprintln!("warning: logging disabled: {err:#}");
    }
    tracing::info!(root = %launch.root.display(), prefix = %launch.prefix, "starting");

    let mut app = UiApp::new(launch.config, launch.root, launch.prefix);
    app.run()
}
