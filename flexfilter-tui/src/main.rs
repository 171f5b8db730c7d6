mod app;
mod error;
mod logging;
mod render;
mod terminal;
mod theme;

use std::path::PathBuf;
use std::process::ExitCode;

use flexfilter::{Catalog, SessionConfig, ValueMap};

use crate::app::App;
use crate::error::AppError;
use crate::logging::LogFiles;
use crate::terminal::Terminal;

/// Command line: `<catalog.json> [config.json] [--log-dir <dir>]`.
#[derive(Debug, PartialEq, Eq)]
struct Args {
    catalog: PathBuf,
    config: Option<PathBuf>,
    log_dir: Option<PathBuf>,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, AppError> {
        let mut catalog: Option<PathBuf> = None;
        let mut config: Option<PathBuf> = None;
        let mut log_dir: Option<PathBuf> = None;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--log-dir" => log_dir = Some(args.next().ok_or(AppError::Usage)?.into()),
                _ if arg.starts_with("--") => return Err(AppError::Usage),
                _ if catalog.is_none() => catalog = Some(arg.into()),
                _ if config.is_none() => config = Some(arg.into()),
                _ => return Err(AppError::Usage),
            }
        }

        Ok(Self {
            catalog: catalog.ok_or(AppError::Usage)?,
            config,
            log_dir,
        })
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(output) => {
            println!("{}", output.to_json());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ValueMap, AppError> {
    let args = Args::parse(std::env::args().skip(1))?;
    let config = match &args.config {
        Some(path) => SessionConfig::from_path(path)?,
        None => SessionConfig::default(),
    };
    let catalog = Catalog::from_path(&args.catalog)?;

    if let Some(files) = LogFiles::for_catalog(&args.catalog, args.log_dir) {
        files.init()?;
    }
    log::info!(
        "starting with {} filters from {}",
        catalog.len(),
        args.catalog.display()
    );

    let mut app = App::new(catalog, config)?;
    {
        // Restore the terminal before printing the result.
        let mut terminal = Terminal::new()?;
        app.run(&mut terminal)?;
    }
    Ok(app.output())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, AppError> {
        Args::parse(args.iter().map(|a| a.to_string()))
    }

    #[test]
    fn test_args_positional_and_log_dir() {
        let args = parse(&["issues.json", "--log-dir", "/tmp/ff", "config.json"]).unwrap();
        assert_eq!(
            args,
            Args {
                catalog: "issues.json".into(),
                config: Some("config.json".into()),
                log_dir: Some("/tmp/ff".into()),
            }
        );
    }

    #[test]
    fn test_args_rejects_bad_usage() {
        assert!(matches!(parse(&[]), Err(AppError::Usage)));
        assert!(matches!(parse(&["issues.json", "--log-dir"]), Err(AppError::Usage)));
        assert!(matches!(parse(&["issues.json", "--verbose"]), Err(AppError::Usage)));
        assert!(matches!(parse(&["a.json", "b.json", "c.json"]), Err(AppError::Usage)));
    }
}
