//! Command-line interface for ArenaDuel
//!
//! Runs a headless match from a JSON config, or an exhibition match when no
//! config is given.

use clap::Parser;
use std::path::PathBuf;

/// Two-fighter arena combat simulator
#[derive(Parser, Debug)]
#[command(name = "arenaduel")]
#[command(about = "Two-fighter arena combat simulator")]
#[command(version)]
pub struct Args {
    /// Run in headless mode with the specified JSON config file
    #[arg(long, value_name = "CONFIG_FILE")]
    pub headless: Option<PathBuf>,

    /// Output path for match log
    #[arg(long, value_name = "OUTPUT_PATH")]
    pub output: Option<PathBuf>,

    /// Maximum match duration in seconds (overrides the config file)
    #[arg(long)]
    pub max_duration: Option<f32>,

    /// Random seed for a reproducible match (overrides the config file)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Character kit file to use instead of the built-in roster
    #[arg(long, value_name = "KITS_RON")]
    pub kits: Option<PathBuf>,
}

impl Args {
    /// Apply command-line overrides on top of a loaded config.
    pub fn apply_overrides(&self, config: &mut crate::headless::HeadlessMatchConfig) {
        if let Some(output) = &self.output {
            config.output_path = Some(output.to_string_lossy().into_owned());
        }
        if let Some(max_duration) = self.max_duration {
            config.max_duration_secs = max_duration;
        }
        if let Some(seed) = self.seed {
            config.random_seed = Some(seed);
        }
        if let Some(kits) = &self.kits {
            config.kits_path = Some(kits.to_string_lossy().into_owned());
        }
    }
}

pub fn parse_args() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessMatchConfig;
    use crate::play_match::match_config::CharacterKey;

    #[test]
    fn test_flags_override_config() {
        let args = Args::parse_from([
            "arenaduel",
            "--max-duration",
            "30",
            "--seed",
            "9",
            "--output",
            "out/log.json",
        ]);
        let mut config = HeadlessMatchConfig::new(CharacterKey::Duelist, CharacterKey::Engineer);
        config.random_seed = Some(1);
        args.apply_overrides(&mut config);
        assert_eq!(config.max_duration_secs, 30.0);
        assert_eq!(config.random_seed, Some(9));
        assert_eq!(config.output_path.as_deref(), Some("out/log.json"));
        assert_eq!(config.kits_path, None);
    }
}
