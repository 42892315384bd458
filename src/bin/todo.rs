use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use log::error;
use taskboard::todo::{cli, storage::DEFAULT_STORAGE_FILE, TodoManager};

const USAGE: &str = "usage: todo [--memory | --file <path>]

  --memory        keep tasks in memory only; nothing is written to disk
  --file <path>   JSON file to load and save (default: todos.json)
  -h, --help      show this message";

enum Backend {
    Memory,
    File(PathBuf),
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Option<Backend>, String> {
    let mut backend = Backend::File(PathBuf::from(DEFAULT_STORAGE_FILE));
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--memory" => backend = Backend::Memory,
            "--file" => {
                let path = args.next().ok_or("--file needs a path")?;
                backend = Backend::File(PathBuf::from(path));
            }
            "-h" | "--help" => return Ok(None),
            other => return Err(format!("unknown argument: {}", other)),
        }
    }
    Ok(Some(backend))
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let backend = match parse_args(std::env::args().skip(1)) {
        Ok(Some(backend)) => backend,
        Ok(None) => {
            println!("{}", USAGE);
            return ExitCode::SUCCESS;
        }
        Err(message) => {
            eprintln!("{}\n\n{}", message, USAGE);
            return ExitCode::from(2);
        }
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let result = match backend {
        Backend::Memory => cli::run(&mut TodoManager::in_memory(), stdin.lock(), stdout.lock()),
        Backend::File(path) => cli::run(&mut TodoManager::open_file(path), stdin.lock(), stdout.lock()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Terminal I/O failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
