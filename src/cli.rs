//! Command-line arguments for the headless driver

use std::path::PathBuf;

use clap::Parser;

use crate::params::ParamField;

/// Asteroid ring driver arguments.
///
/// `--set` changes are applied as one batch halfway through the run, the way
/// a control panel would push them.
#[derive(Parser, Debug)]
#[command(name = "asteroid-ring", about = "Asteroid ring simulation driver")]
pub struct CliArgs {
    /// JSON parameter preset
    #[arg(long)]
    pub preset: Option<PathBuf>,

    /// Number of frames to simulate
    #[arg(long, default_value_t = 600)]
    pub ticks: u64,

    /// RNG seed for the particle layout
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Core radius
    #[arg(long, default_value_t = crate::consts::CORE_RADIUS)]
    pub radius: f32,

    /// Take the core color out of the palette instead of the fixed orange
    #[arg(long)]
    pub palette_core: bool,

    /// Live change, `field=value` (repeatable)
    #[arg(long = "set", value_parser = parse_assignment)]
    pub changes: Vec<(ParamField, f64)>,

    /// Print the effective parameters as JSON and exit
    #[arg(long)]
    pub dump_preset: bool,
}

/// Parse `field=value`
pub fn parse_assignment(s: &str) -> Result<(ParamField, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected field=value, got '{s}'"))?;
    let field = ParamField::from_str(name.trim())
        .ok_or_else(|| format!("unknown parameter '{}'", name.trim()))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid value for {}: {e}", field.as_str()))?;
    Ok((field, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("nParticles=50"),
            Ok((ParamField::NParticles, 50.0))
        );
        assert_eq!(
            parse_assignment(" min_size = 2 "),
            Ok((ParamField::MinSize, 2.0))
        );
        assert!(parse_assignment("nParticles").is_err());
        assert!(parse_assignment("warp=1").is_err());
        assert!(parse_assignment("maxSize=big").is_err());
    }

    #[test]
    fn test_cli_defaults() {
        let args = CliArgs::parse_from(["asteroid-ring"]);
        assert_eq!(args.ticks, 600);
        assert!(args.preset.is_none());
        assert!(args.changes.is_empty());
    }

    #[test]
    fn test_cli_changes() {
        let args = CliArgs::parse_from([
            "asteroid-ring",
            "--ticks",
            "10",
            "--set",
            "nParticles=50",
            "--set",
            "minSize=2",
        ]);
        assert_eq!(args.ticks, 10);
        assert_eq!(
            args.changes,
            vec![(ParamField::NParticles, 50.0), (ParamField::MinSize, 2.0)]
        );
    }
}
