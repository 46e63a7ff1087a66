use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::info;
use simplelog::{
    format_description, ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger,
    TermLogger, TerminalMode, WriteLogger,
};
use std::fs::File;
use std::process::exit;

use run_motion_hub::application::{self, RunOptions};

fn main() {
    // Parse the command line arguments
    let matches = get_command().get_matches();

    // Check the log filter
    let log_filter = get_log_filter(matches.get_one::<u32>("level"));

    // Initiate the logger
    initiate_logger(log_filter, "application.log");
    info!("Log level: {log_filter}.");

    // Run the application
    exit(application::run(&get_run_options(&matches)));
}

/// Get the command line interface.
///
/// # Returns
/// Command.
fn get_command() -> Command {
    Command::new("motion hub")
        .about("Stream the simulator telemetry to the actuators of a motion rig.")
        .arg(
            Arg::new("game")
                .short('g')
                .long("game")
                .help("Simulator: ac, acc, rf2, st or their full names. Default is in the configuration file."),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Serial port of the rig such as /dev/ttyUSB0."),
        )
        .arg(
            Arg::new("baud")
                .short('b')
                .long("baud")
                .help("Baud rate: 9600, 19200, 38400, 57600, 115200. Others fall back to 115200.")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            Arg::new("profile")
                .short('f')
                .long("profile")
                .help("Rig profile file."),
        )
        .arg(
            Arg::new("home")
                .long("home")
                .action(ArgAction::SetTrue)
                .help("Send the HOME command before the streaming"),
        )
        .arg(
            Arg::new("selftest")
                .long("selftest")
                .action(ArgAction::SetTrue)
                .help("Send the SELFTEST command before the streaming"),
        )
        .arg(
            Arg::new("simulate")
                .short('s')
                .long("simulate")
                .action(ArgAction::SetTrue)
                .help("Run the simulation mode"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Application configuration file.")
                .default_value("config/parameters_app.yaml"),
        )
        .arg(
            Arg::new("level")
                .short('l')
                .long("log-level")
                .help("Log level: 0 (Off), 1 (Error), 2 (Warn), 3 (Info), 4 (Debug), 5 (Trace)")
                .default_value("3")
                .value_parser(value_parser!(u32)),
        )
}

/// Get the run options.
///
/// # Arguments
/// * `matches` - Matches of the command line arguments.
///
/// # Returns
/// Run options.
fn get_run_options(matches: &ArgMatches) -> RunOptions {
    RunOptions {
        game: matches.get_one::<String>("game").cloned(),
        serial_port: matches.get_one::<String>("port").cloned(),
        baud_rate: matches.get_one::<u32>("baud").copied(),
        profile: matches.get_one::<String>("profile").cloned(),
        is_home: matches.get_flag("home"),
        is_self_test: matches.get_flag("selftest"),
        is_simulation_mode: matches.get_flag("simulate"),
        config_file: matches
            .get_one::<String>("config")
            .cloned()
            .unwrap_or_default(),
    }
}

/// Get the log filter.
///
/// # Arguments
/// * `log_level` - Log level.
///
/// # Returns
/// Log filter.
fn get_log_filter(log_level: Option<&u32>) -> LevelFilter {
    match log_level {
        Some(level) => match level {
            0 => LevelFilter::Off,
            1 => LevelFilter::Error,
            2 => LevelFilter::Warn,
            3 => LevelFilter::Info,
            4 => LevelFilter::Debug,
            5 => LevelFilter::Trace,
            _ => LevelFilter::Info,
        },
        None => LevelFilter::Info,
    }
}

/// Initiate the logger.
///
/// # Arguments
/// * `level` - Log level.
/// * `filepath` - Log file path.
fn initiate_logger(level: LevelFilter, filepath: &str) {
    let config = ConfigBuilder::new()
        .set_time_format_custom(format_description!(
            "[year]/[month]/[day] [hour]:[minute]:[second].[subsecond]"
        ))
        .build();

    // Log to the terminal
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];

    // Log to the file
    match File::create(filepath) {
        Ok(file) => loggers.push(WriteLogger::new(level, config, file)),
        Err(error) => eprintln!("Failed to create the log file: {error}."),
    }

    let _ = CombinedLogger::init(loggers);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_matches(args: &[&str]) -> ArgMatches {
        get_command().get_matches_from(args)
    }

    #[test]
    fn test_get_log_filter() {
        assert_eq!(get_log_filter(Some(&0)), LevelFilter::Off);
        assert_eq!(get_log_filter(Some(&1)), LevelFilter::Error);
        assert_eq!(get_log_filter(Some(&2)), LevelFilter::Warn);
        assert_eq!(get_log_filter(Some(&3)), LevelFilter::Info);
        assert_eq!(get_log_filter(Some(&4)), LevelFilter::Debug);
        assert_eq!(get_log_filter(Some(&5)), LevelFilter::Trace);

        assert_eq!(get_log_filter(Some(&6)), LevelFilter::Info);

        assert_eq!(get_log_filter(None), LevelFilter::Info);
    }

    #[test]
    fn test_get_run_options_default() {
        let options = get_run_options(&create_matches(&["motion_hub"]));

        assert_eq!(options.game, None);
        assert_eq!(options.serial_port, None);
        assert_eq!(options.baud_rate, None);
        assert_eq!(options.profile, None);
        assert!(!options.is_home);
        assert!(!options.is_self_test);
        assert!(!options.is_simulation_mode);
        assert_eq!(options.config_file, "config/parameters_app.yaml");
    }

    #[test]
    fn test_get_run_options() {
        let options = get_run_options(&create_matches(&[
            "motion_hub",
            "-g",
            "rf2",
            "-p",
            "/dev/ttyACM0",
            "-b",
            "57600",
            "-f",
            "rig.ini",
            "--home",
            "--selftest",
            "-s",
            "-c",
            "app.yaml",
            "-l",
            "4",
        ]));

        assert_eq!(options.game.as_deref(), Some("rf2"));
        assert_eq!(options.serial_port.as_deref(), Some("/dev/ttyACM0"));
        assert_eq!(options.baud_rate, Some(57600));
        assert_eq!(options.profile.as_deref(), Some("rig.ini"));
        assert!(options.is_home);
        assert!(options.is_self_test);
        assert!(options.is_simulation_mode);
        assert_eq!(options.config_file, "app.yaml");
    }

    #[test]
    fn test_get_command_invalid_baud() {
        assert!(get_command()
            .try_get_matches_from(["motion_hub", "-b", "fast"])
            .is_err());
    }
}
