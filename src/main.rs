//! ArenaDuel - two-fighter arena combat simulation
//!
//! Runs headless matches from a JSON config, or a Master-tier exhibition
//! match (Ranger vs Vanguard) when no config is given.

use arenaduel::cli;
use arenaduel::headless::{run_headless_match, HeadlessMatchConfig};
use arenaduel::play_match::match_config::CharacterKey;

fn main() {
    let args = cli::parse_args();

    let mut config = match &args.headless {
        Some(path) => match HeadlessMatchConfig::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        },
        None => HeadlessMatchConfig::new(CharacterKey::Ranger, CharacterKey::Vanguard),
    };
    args.apply_overrides(&mut config);

    if let Err(e) = run_headless_match(config) {
        eprintln!("Error running headless match: {}", e);
        std::process::exit(1);
    }
}
