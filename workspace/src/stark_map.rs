#![allow(non_snake_case)]

//! Compute a Stark map from a TOML run file and write the result to `.npz`.
//!
//! Usage: `stark_map <run.toml>`. See `config/helium.toml` for an example.

use std::{
    fs,
    path::{ Path, PathBuf },
};
use anyhow::{ bail, Context };
use log::LevelFilter;
use log4rs::{
    append::{
        console::{ ConsoleAppender, Target },
        file::FileAppender,
    },
    config::{ Appender, Config, Root },
    encode::pattern::PatternEncoder,
};
use ndarray as nd;
use ndarray_npy::NpzWriter;
use serde::{ Deserialize, Serialize };
use starkmap::{
    basis::get_nl_vals,
    config::{ MatrixConfig, SweepConfig },
    defects::QuantumDefects,
    energy::{ e_zeeman, h0_matrix, w_n },
    interaction::{ diamagnetic_matrix_select_m, stark_matrix_select_m },
    sweep::{ stark_map, stark_map_vec },
    units::{ self, Atom },
};

const ENCODE_STR: &str = "{d(%Y-%m-%d %H:%M:%S)} [{h({l:>5})}] {m}{n}";

#[derive(Clone, Debug, Serialize, Deserialize)]
struct BasisConfig {
    nmin: u32,
    nmax: u32,
    #[serde(default)]
    m: i32,
    /// Total spin.
    S: u32,
    /// `J = L + diff`, except `J = S` for `L = 0`.
    #[serde(default)]
    diff: i32,
    /// Quantum defect table, relative to the run file; hydrogenic if absent.
    defects: Option<PathBuf>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct AtomConfig {
    /// Atomic mass (u).
    mass_u: f64,
    /// Nuclear charge.
    z: f64,
}

impl Default for AtomConfig {
    fn default() -> Self { Self { mass_u: units::MASS_HE4_U, z: 2.0 } }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct FieldConfig {
    /// Electric field range (V m^-1).
    min: f64,
    max: f64,
    num: usize,
    /// Magnetic field along the quantization axis (T).
    #[serde(default)]
    b_field: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct OutputConfig {
    dir: PathBuf,
    name: String,
    /// Also compute and store eigenvectors.
    #[serde(default)]
    eigvecs: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { dir: PathBuf::from("output"), name: "stark_map".into(), eigvecs: false }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct RunConfig {
    basis: BasisConfig,
    #[serde(default)]
    atom: AtomConfig,
    field: FieldConfig,
    #[serde(default)]
    matrix: MatrixConfig,
    #[serde(default)]
    sweep: SweepConfig,
    #[serde(default)]
    output: OutputConfig,
}

impl RunConfig {
    fn from_file(path: &Path) -> anyhow::Result<Self> {
        let s = fs::read_to_string(path)
            .with_context(|| format!("failed to read run file {path:?}"))?;
        let config: Self = toml::from_str(&s)
            .with_context(|| format!("failed to parse run file {path:?}"))?;
        config.matrix.validate()?;
        if config.basis.nmin == 0 || config.basis.nmin > config.basis.nmax {
            bail!(
                "invalid n range: nmin = {}, nmax = {}",
                config.basis.nmin, config.basis.nmax,
            );
        }
        if config.field.num == 0 {
            bail!("field.num must be at least 1");
        }
        Ok(config)
    }
}

fn logger_init(outdir: &Path) -> anyhow::Result<()> {
    let stderr = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(ENCODE_STR)))
        .target(Target::Stderr)
        .build();
    let logfile = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(ENCODE_STR)))
        .build(outdir.join("run.log"))?;
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .appender(Appender::builder().build("logfile", Box::new(logfile)))
        .build(
            Root::builder()
                .appender("stderr")
                .appender("logfile")
                .build(LevelFilter::Info)
        )?;
    log4rs::init_config(config)?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let Some(run_file) = std::env::args().nth(1).map(PathBuf::from) else {
        bail!("usage: stark_map <run.toml>");
    };
    let config = RunConfig::from_file(&run_file)?;
    fs::create_dir_all(&config.output.dir)?;
    logger_init(&config.output.dir)?;
    log::info!("run file: {run_file:?}");

    let atom = Atom::new(config.atom.mass_u, config.atom.z);
    let qd: QuantumDefects
        = match &config.basis.defects {
            Some(path) => {
                let path = run_file.parent()
                    .map(|dir| dir.join(path))
                    .unwrap_or_else(|| path.clone());
                log::info!("quantum defects: {path:?}");
                QuantumDefects::from_toml_file(&path)
                    .with_context(|| format!("failed to load {path:?}"))?
            },
            None => QuantumDefects::new(),
        };

    let BasisConfig { nmin, nmax, m, S, diff, .. } = config.basis;
    let basis = get_nl_vals(nmin, nmax, m)?;
    let basis_nlj = basis.to_nlj(S, diff);
    log::info!("basis: n = {nmin}..={nmax}, m = {m}, {} states", basis.len());
    let neff = basis_nlj.neff(S, &qd);
    let n_undef = neff.iter().filter(|n| n.is_nan()).count();
    if n_undef > 0 {
        log::warn!("{n_undef} states have undefined quantum defects");
    }
    let l_vals = basis.l_vals();
    let energies = w_n(&atom, S, &basis_nlj, &qd);
    let h0 = h0_matrix(&energies);
    let mat_s = stark_matrix_select_m(&neff, &l_vals, m, &config.matrix)?;

    let B: f64 = units::bfield_to_au(config.field.b_field);
    let (h_z, h_d): (Option<nd::Array2<f64>>, Option<nd::Array2<f64>>)
        = if B != 0.0 {
            let h_z = nd::Array2::from_diag(&e_zeeman(&basis.m_vals(), B));
            let mat_d
                = diamagnetic_matrix_select_m(&neff, &l_vals, m, &config.matrix)?;
            (Some(h_z), Some(mat_d * (B.powi(2) / 8.0)))
        } else {
            (None, None)
        };

    let field: nd::Array1<f64>
        = nd::Array1::linspace(config.field.min, config.field.max, config.field.num);
    let field_au: nd::Array1<f64> = atom.efield_to_au(&field);
    let map
        = if config.output.eigvecs {
            stark_map_vec(
                &h0,
                &mat_s,
                &field_au,
                h_z.as_ref().map(|h| h.view()),
                h_d.as_ref().map(|h| h.view()),
                &config.sweep,
            )?
        } else {
            stark_map(
                &h0,
                &mat_s,
                &field_au,
                h_z.as_ref().map(|h| h.view()),
                h_d.as_ref().map(|h| h.view()),
                &config.sweep,
            )?
        };
    let eig_val_cm: nd::Array2<f64> = atom.energy_to_wavenumber(&map.eig_val);

    let outfile = config.output.dir.join(format!("{}.npz", config.output.name));
    let mut npz = NpzWriter::new(fs::File::create(&outfile)?);
    npz.add_array("n", &basis.n_vals())?;
    npz.add_array("l", &l_vals)?;
    npz.add_array("m", &basis.m_vals())?;
    npz.add_array("j", &basis_nlj.j_vals())?;
    npz.add_array("neff", &neff)?;
    npz.add_array("field", &field)?;
    npz.add_array("field_au", &field_au)?;
    npz.add_array("eig_val", &map.eig_val)?;
    npz.add_array("eig_val_cm", &eig_val_cm)?;
    if let Some(eig_vec) = &map.eig_vec {
        npz.add_array("eig_vec", eig_vec)?;
    }
    npz.finish()?;
    log::info!("wrote {outfile:?}");
    Ok(())
}
