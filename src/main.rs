//! Plinko Drop - native driver
//!
//! Simulates one drop and prints it as JSON. The browser build uses the
//! wasm-bindgen entry points in the library instead.
//!
//! Run with `--help` for the options.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use clap::{Parser, ValueEnum};
    use plinko_drop::sim::{BoardConfig, BoardGeometry, DropPosition, DropRequest, DropZone, simulate_drop};
    use plinko_drop::{SimError, SimSettings, TuningPreset};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
    enum ZoneArg {
        Left,
        Center,
        Right,
    }

    impl From<ZoneArg> for DropZone {
        fn from(zone: ZoneArg) -> Self {
            match zone {
                ZoneArg::Left => DropZone::Left,
                ZoneArg::Center => DropZone::Center,
                ZoneArg::Right => DropZone::Right,
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
    enum PresetArg {
        Gentle,
        Standard,
        Lively,
    }

    impl From<PresetArg> for TuningPreset {
        fn from(preset: PresetArg) -> Self {
            match preset {
                PresetArg::Gentle => TuningPreset::Gentle,
                PresetArg::Standard => TuningPreset::Standard,
                PresetArg::Lively => TuningPreset::Lively,
            }
        }
    }

    #[derive(Debug, Parser)]
    #[command(
        name = "plinko-drop",
        version,
        about = "Simulate one Plinko drop and print it as JSON"
    )]
    struct Cli {
        #[arg(long, default_value_t = 1, help = "Seed for the bounce perturbations")]
        seed: u64,
        #[arg(long, default_value_t = 6, help = "Bucket the ball must finish in")]
        slot: usize,
        #[arg(long, value_enum, default_value = "center", conflicts_with = "x")]
        zone: ZoneArg,
        #[arg(long, help = "Explicit drop x in board pixels")]
        x: Option<f32>,
        #[arg(long, value_enum, default_value = "standard")]
        preset: PresetArg,
        #[arg(long, default_value_t = BoardConfig::default().peg_rows)]
        rows: u16,
        #[arg(long, help = "Print a one-line summary instead of the full drop")]
        summary: bool,
    }

    impl Cli {
        fn position(&self) -> DropPosition {
            match self.x {
                Some(x) => DropPosition::X(x),
                None => DropPosition::Zone(self.zone.into()),
            }
        }
    }

    fn run(cli: &Cli) -> Result<String, SimError> {
        let geometry = BoardGeometry::new(BoardConfig {
            peg_rows: cli.rows,
            ..BoardConfig::default()
        })?;
        let settings = SimSettings::from_preset(cli.preset.into());
        let request = DropRequest::new(cli.seed, cli.slot, cli.position());
        let drop = simulate_drop(&geometry, &settings, &request)?;

        if cli.summary {
            return Ok(format!(
                "slot {} after {} frames ({:.2}s), {} peg hits, {} attempt(s), effective seed {:#018x}",
                drop.final_slot(),
                drop.frame_count(),
                drop.duration_secs(),
                drop.peg_hit_count(),
                drop.attempts(),
                drop.effective_seed()
            ));
        }
        serde_json::to_string_pretty(&drop).map_err(|e| SimError::Settings(e.into()))
    }

    pub fn main() {
        env_logger::init();

        let cli = Cli::parse();
        log::info!(
            "Plinko drop (native) seed={} slot={} preset={}",
            cli.seed,
            cli.slot,
            TuningPreset::from(cli.preset).as_str()
        );

        match run(&cli) {
            Ok(out) => println!("{out}"),
            Err(err) => {
                log::error!("Drop failed: {err}");
                std::process::exit(1);
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use clap::CommandFactory;

        #[test]
        fn test_cli_definition() {
            Cli::command().debug_assert();
        }

        #[test]
        fn test_parse_defaults() {
            let cli = Cli::try_parse_from(["plinko-drop"]).unwrap();
            assert_eq!(cli.seed, 1);
            assert_eq!(cli.position(), DropPosition::Zone(DropZone::Center));
            assert_eq!(TuningPreset::from(cli.preset), TuningPreset::Standard);
        }

        #[test]
        fn test_parse_flags() {
            let cli = Cli::try_parse_from([
                "plinko-drop", "--seed", "42", "--slot", "3", "--x", "120.5", "--preset", "lively",
            ])
            .unwrap();
            assert_eq!(cli.seed, 42);
            assert_eq!(cli.slot, 3);
            assert_eq!(cli.position(), DropPosition::X(120.5));
            assert_eq!(TuningPreset::from(cli.preset), TuningPreset::Lively);

            let cli = Cli::try_parse_from(["plinko-drop", "--zone", "right"]).unwrap();
            assert_eq!(cli.position(), DropPosition::Zone(DropZone::Right));
        }

        #[test]
        fn test_parse_errors() {
            assert!(Cli::try_parse_from(["plinko-drop", "--seed"]).is_err());
            assert!(Cli::try_parse_from(["plinko-drop", "--seed", "abc"]).is_err());
            assert!(Cli::try_parse_from(["plinko-drop", "--zone", "middle"]).is_err());
            assert!(Cli::try_parse_from(["plinko-drop", "--zone", "left", "--x", "50"]).is_err());
            assert!(Cli::try_parse_from(["plinko-drop", "--bogus", "1"]).is_err());
        }

        #[test]
        fn test_summary_run() {
            let cli = Cli::try_parse_from(["plinko-drop", "--summary", "--slot", "2"]).unwrap();
            let out = run(&cli).unwrap();
            assert!(out.starts_with("slot 2 "));
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::main();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `plinko_drop::web::start`, this is just to satisfy the compiler
}
