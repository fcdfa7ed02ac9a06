use ac_domain::config::Config;

/// Parse and validate the config, printing any issues. Returns `true` when valid.
pub fn validate(config_path: &str) -> bool {
    match Config::validate_file(config_path) {
        Ok(_) => {
            println!("Config OK ({config_path})");
            true
        }
        Err(e) => {
            println!("{e}");
            false
        }
    }
}

/// Dump the resolved config (with all defaults filled in) as TOML.
pub fn show(config: &Config) {
    match toml::to_string_pretty(config) {
        Ok(output) => print!("{output}"),
        Err(e) => {
            eprintln!("failed to serialize config: {e}");
            std::process::exit(2);
        }
    }
}
