// [libs/domain/detector/src/builder.rs]
/*!
 * =================================================================
 * APARATO: GOLDEN BASELINE BUILDER (V3.2)
 * CLASIFICACIÓN: DOMAIN DETECTOR (ESTRATO L3)
 * RESPONSABILIDAD: CONSTRUCCIÓN Y GESTIÓN DE REFERENCIAS CONFIABLES
 *
 * Construye líneas base desde bitstreams dorados: snapshot por FAR,
 * historia de escrituras, procedencia SHA-256 y el conjunto de tiles
 * ocupados (provisto por el operador o auto-inferido por densidad de
 * bits). Incluye utilidades de comparación y fusión de referencias.
 * =================================================================
 */

use std::collections::BTreeSet;
use std::path::Path;

use centinela_core_bitstream::{BitstreamLoader, LoadedBitstream};
use centinela_core_fabric::{count_set_bits, FRAME_BIT_COUNT, FRAME_BYTE_COUNT};
use centinela_domain_mapping::FrameMapper;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::baseline::GoldenBaseline;
use crate::errors::DetectorError;

/// Umbral de densidad de bits para considerar una trama "ocupada".
const USED_FRAME_DENSITY_THRESHOLD: f64 = 0.01;

/// Constructor de líneas base doradas.
#[derive(Debug, Default)]
pub struct GoldenBaselineBuilder {
    loader: BitstreamLoader,
    frame_mapper: FrameMapper,
}

impl GoldenBaselineBuilder {
    /// Constructor con cargador y mapper propios.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /**
     * Construye una línea base desde un archivo `.bit` dorado.
     *
     * # Errors:
     * Fallos fatales del léxico o de validación del snapshot.
     */
    #[instrument(skip(self, golden_path))]
    pub fn build_from_path<P: AsRef<Path>>(
        &self,
        golden_path: P,
        baseline_id: Option<&str>,
        auto_detect_usage: bool,
    ) -> Result<GoldenBaseline, DetectorError> {
        let loaded = self.loader.load(golden_path)?;
        self.build_from_loaded(&loaded, baseline_id, auto_detect_usage)
    }

    /// Construye una línea base desde un bitstream ya cargado.
    pub fn build_from_loaded(
        &self,
        loaded: &LoadedBitstream,
        baseline_id: Option<&str>,
        auto_detect_usage: bool,
    ) -> Result<GoldenBaseline, DetectorError> {
        let identifier = baseline_id
            .map(str::to_string)
            .unwrap_or_else(|| format!("golden_{}", loaded.info.filename));

        let mut baseline = GoldenBaseline::new(&identifier);
        baseline.set_source_metadata(
            &loaded.info.design_name,
            &loaded.info.device_name,
            &loaded.info.build_date,
            &loaded.info.build_time,
            loaded.info.sha256.clone(),
        );

        for (far_value, payload) in loaded.effective_payloads() {
            baseline.add_frame(far_value, payload.to_vec());
        }
        for far_value in loaded.all_fars() {
            let history: Vec<Vec<u8>> = loaded
                .write_history_payloads(far_value)
                .into_iter()
                .map(<[u8]>::to_vec)
                .collect();
            baseline.set_write_history(far_value, history);
        }

        if auto_detect_usage {
            baseline.set_used_tiles(self.auto_detect_used_tiles(loaded));
        }

        baseline.validate()?;
        info!(
            "🏛️ [BASELINE_BUILT]: {} -> {} frames, {} used tiles, {} multi-write FARs",
            baseline.baseline_id,
            baseline.len(),
            baseline.used_tiles().len(),
            baseline.multi_write_far_count()
        );
        Ok(baseline)
    }

    /**
     * Heurística de ocupación: una trama con más del 1% de sus 1312
     * bits encendidos marca todos sus tiles como usados.
     */
    #[must_use]
    pub fn auto_detect_used_tiles(&self, loaded: &LoadedBitstream) -> BTreeSet<String> {
        let mut used_tiles = BTreeSet::new();
        for (far_value, payload) in loaded.effective_payloads() {
            let density = f64::from(count_set_bits(payload)) / FRAME_BIT_COUNT as f64;
            if density > USED_FRAME_DENSITY_THRESHOLD {
                let coverage = self.frame_mapper.coverage(far_value);
                used_tiles.extend(coverage.tiles_affected.iter().cloned());
            }
        }
        used_tiles
    }

    /**
     * Lee un conjunto de tiles ocupados desde un archivo de texto,
     * un nombre de tile por línea.
     */
    pub fn used_tiles_from_file<P: AsRef<Path>>(
        &self,
        tile_list_path: P,
    ) -> Result<BTreeSet<String>, DetectorError> {
        let path = tile_list_path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| DetectorError::BaselineIo {
            path: path.display().to_string(),
            source,
        })?;
        Ok(raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Compara dos líneas base (deriva de herramientas o iteraciones
    /// de diseño).
    #[must_use]
    pub fn compare_baselines(
        &self,
        first: &GoldenBaseline,
        second: &GoldenBaseline,
    ) -> BaselineComparison {
        let first_fars = first.expected_fars();
        let second_fars = second.expected_fars();
        let common: Vec<u32> = first_fars.intersection(&second_fars).copied().collect();
        let data_differences = common
            .iter()
            .filter(|&&far| first.payload(far) != second.payload(far))
            .count();

        BaselineComparison {
            first_id: first.baseline_id.clone(),
            second_id: second.baseline_id.clone(),
            frames_in_first: first.len(),
            frames_in_second: second.len(),
            common_frames: common.len(),
            only_in_first: first_fars.difference(&second_fars).count(),
            only_in_second: second_fars.difference(&first_fars).count(),
            data_differences,
            difference_rate: if common.is_empty() {
                0.0
            } else {
                data_differences as f64 / common.len() as f64
            },
        }
    }

    /**
     * Fusiona varias líneas base: unión de tramas (la primera gana en
     * conflicto) y unión de tiles ocupados.
     */
    #[must_use]
    pub fn merge_baselines(
        &self,
        baselines: &[&GoldenBaseline],
        merged_id: &str,
    ) -> GoldenBaseline {
        let mut merged = GoldenBaseline::new(merged_id);
        let mut used_tiles = BTreeSet::new();

        for baseline in baselines {
            for (far_value, payload) in baseline.effective_payloads() {
                if !merged.has(far_value) {
                    merged.add_frame(far_value, payload.to_vec());
                    merged.set_write_history(far_value, baseline.history(far_value).to_vec());
                }
            }
            used_tiles.extend(baseline.used_tiles().iter().cloned());
        }
        merged.set_used_tiles(used_tiles);

        if merged.is_empty() {
            warn!("⚠️ [BASELINE_MERGE]: merged reference {} carries no frames", merged_id);
        }
        merged
    }

    /// Línea base mínima con tramas en cero para una lista de FARs
    /// (andamiaje de pruebas y regiones focalizadas).
    #[must_use]
    pub fn minimal_baseline(&self, fars: &[u32], baseline_id: &str) -> GoldenBaseline {
        let mut baseline = GoldenBaseline::new(baseline_id);
        for &far_value in fars {
            baseline.add_frame(far_value, vec![0u8; FRAME_BYTE_COUNT]);
        }
        baseline
    }
}

/// Resumen de la comparación entre dos líneas base.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineComparison {
    pub first_id: String,
    pub second_id: String,
    pub frames_in_first: usize,
    pub frames_in_second: usize,
    pub common_frames: usize,
    pub only_in_first: usize,
    pub only_in_second: usize,
    pub data_differences: usize,
    pub difference_rate: f64,
}
