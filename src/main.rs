use log::debug;
use mactool::cli::Cli;
use mactool::commands;

fn main() {
    let cli = Cli::init();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error reading config: {}", e);
            std::process::exit(exitcode::CONFIG);
        }
    };

    let _log_handle = match config.log.setup(config.debug) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Error setting up logging: {}", e);
            std::process::exit(exitcode::CONFIG);
        }
    };

    debug!("Config: {:?}", config);

    if let Err(e) = commands::run(&cli, &config) {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}
