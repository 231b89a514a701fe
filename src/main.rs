use clap::{ArgAction, Parser};
use log::{error, info, warn};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

pub mod config;
pub mod error;
pub mod io;
pub mod model;
pub mod modeling;
pub mod molecule;
pub mod physics;
pub mod presets;
pub mod session;
pub mod utils;

use config::Config;
use error::{AppError, InputError};
use model::params::BuildParams;
use session::Session;
use utils::report;

#[derive(Parser, Debug)]
#[command(
    name = "molforge",
    about = "Builds a solid model (atom spheres and half-bond tubes) from a molecular structure file.",
    version
)]
struct Cli {
    /// Structure file (.xyz, .cif, .gen, .pdb, .mol, .gjf).
    #[arg(value_name = "FILE")]
    structure: Option<PathBuf>,

    /// Name of the component holding the generated bodies.
    #[arg(short, long)]
    name: Option<String>,

    /// Radius preset.
    #[arg(long)]
    radii: Option<String>,

    /// Color preset.
    #[arg(long)]
    colors: Option<String>,

    /// Generate half-bond tubes between bonded atoms.
    #[arg(long, default_value_t = false, overrides_with = "no_bonds")]
    bonds: bool,

    /// Skip bond tubes even when the configured default enables them.
    #[arg(long, default_value_t = false, overrides_with = "bonds")]
    no_bonds: bool,

    /// Tube radius in model units; 0 disables bonds.
    #[arg(long)]
    bond_radius: Option<f64>,

    /// Directory with *.radii and *.colors presets.
    #[arg(long, value_name = "DIR")]
    resources: Option<PathBuf>,

    /// Write the built document as JSON.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print the available presets and exit.
    #[arg(long, default_value_t = false)]
    list_presets: bool,

    /// Store the effective build parameters as the new defaults.
    #[arg(long, default_value_t = false)]
    save_config: bool,

    /// More output (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Command-line values over configured defaults.
    fn build_params(&self, defaults: &BuildParams) -> BuildParams {
        BuildParams {
            name: self.name.clone().unwrap_or_else(|| defaults.name.clone()),
            radii_set: self.radii.clone().unwrap_or_else(|| defaults.radii_set.clone()),
            colors_set: self.colors.clone().unwrap_or_else(|| defaults.colors_set.clone()),
            bond_enabled: !self.no_bonds && (self.bonds || defaults.bond_enabled),
            bond_radius: self.bond_radius.unwrap_or(defaults.bond_radius),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let (mut cfg, cfg_status) = Config::load();

    let level = match cli.verbose {
        0 => cfg.log_level.filter(),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    if let Err(e) = utils::logger::init(level) {
        eprintln!("Logger init failed: {}", e);
    }
    info!("{}", cfg_status);

    let params = cli.build_params(&cfg.defaults);
    if cli.save_config {
        cfg.defaults = params.clone();
        info!("{}", cfg.save());
    }

    match run(&cli, cfg, params) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            let mut source = e.source();
            while let Some(cause) = source {
                error!("  caused by: {}", cause);
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, cfg: Config, params: BuildParams) -> Result<(), AppError> {
    let mut session = Session::open(cfg, cli.resources.as_deref())?;

    if cli.list_presets {
        print!("{}", report::preset_listing(&session.presets));
        return Ok(());
    }

    // Input and parameter errors stop here, before the document is touched.
    let path = cli.structure.as_deref().ok_or(InputError::NoFile)?;
    params.validate()?;
    let structure = io::load_structure(path)?;
    print!("{}", report::structure_summary(&structure, &path.display().to_string()));

    let (build_report, result) = session.build(&structure, params);
    if let Err(e) = result {
        if !build_report.atom_bodies.is_empty() {
            warn!(
                "{} atom and {} bond bodies were created before the failure and remain in the document",
                build_report.atom_bodies.len(),
                build_report.bond_bodies.len()
            );
        }
        return Err(e.into());
    }
    print!("{}", report::build_summary(&build_report, &session.document));

    if let Some(out) = &cli.output {
        modeling::export::export_document(&session.document, out).map_err(|source| AppError::Export {
            path: out.clone(),
            source,
        })?;
        info!("Document written to {:?}", out);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_defaults() {
        let cli = Cli::parse_from(["molforge", "h2.xyz", "--bonds", "--radii", "VDW", "--bond-radius", "0.2"]);
        let p = cli.build_params(&BuildParams::default());
        assert!(p.bond_enabled);
        assert_eq!(p.radii_set, "VDW");
        assert_eq!(p.colors_set, "Default");
        assert_eq!(p.bond_radius, 0.2);
        assert_eq!(p.name, "Molecule");
        assert_eq!(cli.structure, Some(PathBuf::from("h2.xyz")));
    }

    #[test]
    fn test_no_bonds_overrides_saved_default() {
        let defaults = BuildParams {
            bond_enabled: true,
            ..BuildParams::default()
        };
        let cli = Cli::parse_from(["molforge", "h2.xyz", "--no-bonds"]);
        assert!(!cli.build_params(&defaults).bond_enabled);

        let cli = Cli::parse_from(["molforge", "h2.xyz"]);
        assert!(cli.build_params(&defaults).bond_enabled);

        // The last of the two flags wins.
        let cli = Cli::parse_from(["molforge", "h2.xyz", "--no-bonds", "--bonds"]);
        assert!(cli.build_params(&BuildParams::default()).bond_enabled);
        let cli = Cli::parse_from(["molforge", "h2.xyz", "--bonds", "--no-bonds"]);
        assert!(!cli.build_params(&BuildParams::default()).bond_enabled);
    }

    #[test]
    fn test_verbosity_counts() {
        let cli = Cli::parse_from(["molforge", "-vv", "--list-presets"]);
        assert_eq!(cli.verbose, 2);
        assert!(cli.list_presets);
        assert!(cli.structure.is_none());
    }
}
