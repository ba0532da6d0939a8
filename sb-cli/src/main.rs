use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use log::{info, warn};
use thousands::Separable;

use sb_cli::config::SBConfig;
use sb_cli::io::cli::{Cli, ProblemVariant};
use sb_cli::io::layer_to_svg::{hsol_item_to_svg, layer_to_svg};
use sb_cli::io::output::{HeteroOutput, HomoOutput};
use sb_cli::{EPOCH, io};
use stackbuilder::entities::Packable;
use stackbuilder::io::Importer;
use stackbuilder::io::export::{export_hsolution, export_solution};
use stackbuilder::io::ext_repr::{ExtHeteroAnalysis, ExtHomoAnalysis};
use stackbuilder::patterns::PatternRegistry;
use stackbuilder::solvers::{HSolver, LayerSolver, StackComposer};

fn main() -> Result<()> {
    let args = Cli::parse();

    if !args.solution_folder.exists() {
        fs::create_dir_all(&args.solution_folder)
            .with_context(|| format!("could not create solution folder: {}", args.solution_folder.display()))?;
    }
    io::init_logger(args.log_level, Some(&args.solution_folder.join("sb-cli.log")))?;

    let config = match args.config_file {
        None => {
            warn!("[MAIN] No config file provided, use --config-file to provide a custom config");
            SBConfig::default()
        }
        Some(config_file) => io::read_json(&config_file).context("incorrect config file format")?,
    };
    info!("[MAIN] Successfully parsed SBConfig: {config:?}");

    let input_file_stem = args
        .input_file
        .file_stem()
        .and_then(|s| s.to_str())
        .with_context(|| format!("invalid input file name: {}", args.input_file.display()))?
        .to_string();

    match args.prob_var {
        ProblemVariant::Homogeneous => {
            let ext_analysis = io::read_json(&args.input_file)?;
            main_homogeneous(ext_analysis, config, &input_file_stem, args.solution_folder)
        }
        ProblemVariant::Heterogeneous => {
            let ext_analysis = io::read_json(&args.input_file)?;
            main_heterogeneous(ext_analysis, config, &input_file_stem, args.solution_folder)
        }
    }
}

fn main_homogeneous(
    ext_analysis: ExtHomoAnalysis,
    config: SBConfig,
    input_stem: &str,
    output_folder: PathBuf,
) -> Result<()> {
    let importer = Importer::new(config.solver.unit_system);
    let analysis = importer.import_homo_analysis(&ext_analysis)?;
    let solver = LayerSolver::new(PatternRegistry::default(), config.solver.clone());
    let composer = StackComposer::new(&solver);

    let solutions = composer.solve(&analysis, config.keep_only_best)?;
    let best_combination = match (config.best_combination, &analysis.packable) {
        (true, Packable::Box(_)) if analysis.max_height().is_some() => composer.solve_best_combination(&analysis)?,
        _ => None,
    };

    match solutions.first() {
        None => warn!("[MAIN] {:?} does not fit on {:?}", ext_analysis.item, ext_analysis.container.name),
        Some(best) => info!(
            "[MAIN] best solution: {} ({:.1}% volume, {} {})",
            best.pallet_map_phrase(),
            best.volume_efficiency(),
            (best.total_weight().round() as u64).separate_with_commas(),
            config.solver.unit_system.mass_unit()
        ),
    }
    if let Some(sol) = &best_combination {
        info!("[MAIN] best combination: {}", sol.pallet_map_phrase());
    }

    {
        let output = HomoOutput {
            analysis: ext_analysis,
            solutions: solutions.iter().map(export_solution).collect::<Result<_>>()?,
            best_combination: best_combination.as_ref().map(export_solution).transpose()?,
            config: config.clone(),
            run_time_ms: EPOCH.elapsed().as_millis() as u64,
        };
        let solution_path = output_folder.join(format!("sol_{input_stem}.json"));
        io::write_json(&output, Path::new(&solution_path))?;
    }

    if let Some(best) = solutions.first() {
        for (i, layer) in best.layer_types.iter().enumerate() {
            let svg_path = output_folder.join(format!("sol_{input_stem}_{i}.svg"));
            let svg = layer_to_svg(layer, &analysis, config.svg_draw_options, input_stem);
            io::write_svg(&svg, Path::new(&svg_path))?;
        }
    }

    Ok(())
}

fn main_heterogeneous(
    ext_analysis: ExtHeteroAnalysis,
    config: SBConfig,
    input_stem: &str,
    output_folder: PathBuf,
) -> Result<()> {
    let importer = Importer::new(config.solver.unit_system);
    let analysis = importer.import_hetero_analysis(&ext_analysis)?;
    let solutions = HSolver::new(&config.solver).build_solutions(&analysis)?;

    for sol in &solutions {
        info!(
            "[MAIN] {}: {} item(s) in {} container(s), {} {}^3 loaded",
            sol.algorithm,
            sol.item_count(),
            sol.container_count(),
            (sol.load_volume(&analysis).round() as u64).separate_with_commas(),
            config.solver.unit_system.length_unit()
        );
    }

    {
        let output = HeteroOutput {
            analysis: ext_analysis,
            solutions: solutions.iter().map(|s| export_hsolution(s, &analysis)).collect(),
            config: config.clone(),
            run_time_ms: EPOCH.elapsed().as_millis() as u64,
        };
        let solution_path = output_folder.join(format!("sol_{input_stem}.json"));
        io::write_json(&output, Path::new(&solution_path))?;
    }

    // most items, then fewest containers
    let best = solutions
        .iter()
        .min_by_key(|s| (std::cmp::Reverse(s.item_count()), s.container_count()));
    if let Some(best) = best {
        info!("[MAIN] drawing {}", best.algorithm);
        for (i, item) in best.sol_items.iter().enumerate() {
            let svg_path = output_folder.join(format!("sol_{input_stem}_{i}.svg"));
            let svg = hsol_item_to_svg(item, &analysis, config.svg_draw_options, &best.algorithm);
            io::write_svg(&svg, Path::new(&svg_path))?;
        }
    }

    Ok(())
}
