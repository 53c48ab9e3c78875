// [apps/veredicto/src/main.rs]
/**
 * =================================================================
 * APARATO: VEREDICTO SHELL (V3.0 - SOBERANO)
 * CLASIFICACIÓN: APPLICATION LAYER (ENTRY POINT)
 * RESPONSABILIDAD: ORQUESTACIÓN DE ARGUMENTOS Y DISPARO DEL MOTOR L3
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. LIBRARY SYNERGY: el binario consume la lógica desde
 *    'centinela_veredicto_lib'; es un orquestador puro y ligero.
 * 2. EXIT SEMANTICS: el código de salida comunica el veredicto
 *    (0 limpio, 2 troyano detectado) para integración en pipelines.
 * 3. TRACING INITIALIZATION: telemetría vía la Atalaya compartida.
 * =================================================================
 */

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use centinela_veredicto_lib::{
    create_baseline, inspect_bitstream, quick_compare, run_detection,
};

/// Código de salida cuando el veredicto declara troyano.
const EXIT_TROJAN_DETECTED: u8 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "veredicto",
    version = "3.0",
    about = "Centinela: detección de troyanos hardware por ingeniería inversa de bitstreams Virtex-5 VLX50T."
)]
struct CommandArguments {
    #[command(subcommand)]
    command: WorkflowCommand,
}

#[derive(Subcommand, Debug)]
enum WorkflowCommand {
    /// Construye y cristaliza una línea base dorada desde un .bit confiable.
    CreateBaseline {
        /// Ruta del bitstream dorado (.bit).
        golden: PathBuf,
        /// Directorio raíz para los artefactos de línea base.
        #[arg(short, long, default_value = "baselines")]
        output: PathBuf,
    },
    /// Corre la detección diferencial completa y archiva el reporte.
    Detect {
        /// Dorado: un .bit confiable o un snapshot .baseline sellado.
        golden: PathBuf,
        /// Bitstream sospechoso (.bit).
        suspect: PathBuf,
        /// Directorio con el bundle JSON del dispositivo (seis archivos).
        #[arg(long)]
        device_data: Option<PathBuf>,
        /// Habilita las pasadas semánticas de ruteo y lógica.
        #[arg(long)]
        enhanced: bool,
        /// Directorio raíz para los reportes.
        #[arg(short, long, default_value = "detection_reports")]
        output: PathBuf,
    },
    /// Comparación estructural rápida, sin detector.
    Quick {
        /// Bitstream dorado (.bit).
        golden: PathBuf,
        /// Bitstream sospechoso (.bit).
        suspect: PathBuf,
    },
    /// Inspecciona cabecera y censo de un contenedor .bit.
    Inspect {
        /// Contenedor a inspeccionar.
        bitstream: PathBuf,
    },
}

fn main() -> ExitCode {
    centinela_shared_atalaya::init_tracing("veredicto");

    let arguments = CommandArguments::parse();
    match dispatch(arguments) {
        Ok(exit_code) => exit_code,
        Err(fault) => {
            eprintln!("veredicto: {fault:#}");
            ExitCode::FAILURE
        }
    }
}

fn dispatch(arguments: CommandArguments) -> Result<ExitCode> {
    match arguments.command {
        WorkflowCommand::CreateBaseline { golden, output } => {
            let outcome = create_baseline(&golden, &output)?;
            println!("Baseline created:");
            println!("  Directory : {}", outcome.output_directory.display());
            println!("  Snapshot  : {}", outcome.snapshot_path.display());
            println!("  Metadata  : {}", outcome.metadata_path.display());
            println!("  Frames    : {}", outcome.baseline.len());
            println!("  Used tiles: {}", outcome.baseline.used_tiles().len());
            Ok(ExitCode::SUCCESS)
        }

        WorkflowCommand::Detect { golden, suspect, device_data, enhanced, output } => {
            let outcome =
                run_detection(&golden, &suspect, device_data.as_deref(), enhanced, &output)?;
            println!("{}", outcome.report.summary);
            println!();
            println!("Output directory: {}", outcome.output_directory.display());
            for (format, path) in &outcome.saved_files {
                println!("  {format:5} -> {}", path.display());
            }
            if outcome.report.trojan_detected {
                info!("🚨 [VERDICT]: trojan evidence confirmed; signaling via exit code");
                Ok(ExitCode::from(EXIT_TROJAN_DETECTED))
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }

        WorkflowCommand::Quick { golden, suspect } => {
            let comparison = quick_compare(&golden, &suspect)?;
            println!("Quick comparison: {} vs {}", comparison.golden_id, comparison.suspect_id);
            println!("  Frames (golden/suspect): {}/{}", comparison.frames_in_golden, comparison.frames_in_suspect);
            println!("  Common: {}", comparison.common_frames);
            println!("  Only in golden: {}", comparison.only_in_golden);
            println!("  Only in suspect: {}", comparison.only_in_suspect);
            println!("  Data differences: {}", comparison.data_differences);
            for far_hex in &comparison.changed_fars {
                println!("    changed @ {far_hex}");
            }
            Ok(ExitCode::SUCCESS)
        }

        WorkflowCommand::Inspect { bitstream } => {
            let info = inspect_bitstream(&bitstream)?;
            println!("Bitstream: {}", info.filename);
            println!("  Design : {}", info.design_name);
            println!("  Device : {}", info.device_name);
            println!("  Built  : {} {}", info.build_date, info.build_time);
            if let Some(metadata) = &info.metadata {
                println!("  Meta   : {metadata}");
            }
            println!("  Size   : {} bytes", info.file_size);
            if let Some(digest) = &info.sha256 {
                println!("  SHA-256: {digest}");
            }
            println!("  Writes : {} over {} unique FARs", info.frame_write_count, info.unique_far_count);
            println!(
                "  Multi-write FARs: {} (transient ratio {:.2}%)",
                info.multi_write_far_count,
                info.transient_ratio() * 100.0
            );
            println!("  Columns covered: {}", info.column_coverage.len());
            for (block_name, count) in &info.block_type_distribution {
                println!("    {block_name:12} {count} writes");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
