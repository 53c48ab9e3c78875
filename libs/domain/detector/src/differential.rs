// [libs/domain/detector/src/differential.rs]
/*!
 * =================================================================
 * APARATO: FRAME DIFFERENTIAL DETECTOR (V3.3 - CORE ENGINE)
 * CLASIFICACIÓN: DOMAIN DETECTOR (ESTRATO L3)
 * RESPONSABILIDAD: GOLDEN VS SOSPECHOSO -> REPORTE DE ANOMALÍAS
 *
 * Cinco fases en orden estricto:
 *   1. Diff estructural (tramas agregadas / removidas).
 *   2. Diff de datos sobre los FARs comunes, con piso de ruido y
 *      auditoría de la historia de escrituras (evidencia transitoria).
 *   3. Clasificación espacial: partición usado / no usado por tile.
 *   4. Severidad por tabla de precedencia + escalada transitoria.
 *   5. Congelamiento del veredicto.
 *
 * La fase 2 corre en abanico por FAR; la recolección se ordena por
 * (FAR, id) para que dos corridas sobre los mismos bytes produzcan
 * reportes bit-idénticos.
 * =================================================================
 */

use std::collections::BTreeSet;

use centinela_core_bitstream::LoadedBitstream;
use centinela_core_fabric::{count_set_bits, diff_bit_offsets};
use centinela_domain_mapping::{FrameCoverage, FrameMapper};
use centinela_domain_models::{
    AnomalyReport, AnomalyType, FrameAnomaly, Severity, anomaly::CHANGED_BIT_SAMPLE_LIMIT,
};
use rayon::prelude::*;
use tracing::{info, instrument};

use crate::baseline::GoldenBaseline;
use crate::severity::assess_severity;

/// Piso de ruido: menos de 5 bits divergentes no constituye anomalía.
pub const SIGNIFICANCE_NOISE_FLOOR: u32 = 5;

/// Motor de detección diferencial a nivel de trama.
#[derive(Debug, Default)]
pub struct FrameDifferentialDetector {
    frame_mapper: FrameMapper,
}

impl FrameDifferentialDetector {
    /// Motor con mapper propio (el memo de coberturas es por instancia).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /**
     * Punto de entrada: compara la referencia dorada contra el
     * bitstream sospechoso y produce el reporte congelado.
     */
    #[instrument(skip(self, golden, suspect), fields(golden_id = %golden.baseline_id, suspect_id = %suspect.info.filename))]
    pub fn detect(&self, golden: &GoldenBaseline, suspect: &LoadedBitstream) -> AnomalyReport {
        let mut report = AnomalyReport::new(&golden.baseline_id, &suspect.info.filename);

        let golden_fars = golden.expected_fars();
        let suspect_fars: BTreeSet<u32> = suspect.all_fars().into_iter().collect();

        // Fase 1: diff estructural, en orden ascendente de FAR.
        let mut anomalies: Vec<FrameAnomaly> = Vec::new();
        for &far_value in suspect_fars.difference(&golden_fars) {
            if let Some(anomaly) = self.added_frame_anomaly(far_value, suspect) {
                anomalies.push(anomaly);
            }
        }
        for &far_value in golden_fars.difference(&suspect_fars) {
            if let Some(anomaly) = self.removed_frame_anomaly(far_value, golden) {
                anomalies.push(anomaly);
            }
        }
        let structural_count = anomalies.len();

        // Fase 2: diff de datos en abanico, recolección determinista.
        let common_fars: Vec<u32> = golden_fars.intersection(&suspect_fars).copied().collect();
        let mut data_anomalies: Vec<FrameAnomaly> = common_fars
            .par_iter()
            .flat_map_iter(|&far_value| self.compare_common_far(far_value, golden, suspect))
            .collect();
        data_anomalies.sort_by(|left, right| {
            (left.far_value, &left.anomaly_id).cmp(&(right.far_value, &right.anomaly_id))
        });
        anomalies.extend(data_anomalies);

        // Fase 3: partición espacial usado / no usado.
        for anomaly in &mut anomalies {
            classify_tiles(anomaly, golden);
        }

        // Fase 4: tabla de severidad por precedencia.
        for anomaly in &mut anomalies {
            assess_severity(anomaly);
        }

        // Fase 5: congelamiento.
        for anomaly in anomalies {
            report.add_anomaly(anomaly);
        }
        report.total_frames_compared = golden.len() + suspect_fars.len();
        report.finalize();

        info!(
            "🔎 [DETECTION_COMPLETE]: {} structural + {} data anomalies, verdict trojan={}",
            structural_count,
            report.len() - structural_count,
            report.trojan_detected
        );
        report
    }

    // ----------------------------------------------------------------
    // Fase 1: anomalías estructurales
    // ----------------------------------------------------------------

    fn added_frame_anomaly(
        &self,
        far_value: u32,
        suspect: &LoadedBitstream,
    ) -> Option<FrameAnomaly> {
        let write = suspect.frame(far_value)?;
        let coverage = self.frame_mapper.coverage(far_value);

        let suspicion_reason = write
            .validation_warning
            .clone()
            .or_else(|| coverage.validation_warning.clone())
            .unwrap_or_else(|| "Unexpected frame configuration".to_string());

        let mut anomaly = self.anomaly_from_coverage(
            format!("added_{far_value:08X}"),
            AnomalyType::FrameAdded,
            &coverage,
        );
        anomaly.bits_changed = count_set_bits(&write.payload);
        anomaly.suspect_payload = Some(write.payload.clone());
        anomaly.description = "Frame added in suspect (not in golden)".to_string();
        anomaly.suspicion_reason = suspicion_reason;
        Some(anomaly)
    }

    fn removed_frame_anomaly(
        &self,
        far_value: u32,
        golden: &GoldenBaseline,
    ) -> Option<FrameAnomaly> {
        let payload = golden.payload(far_value)?;
        let coverage = self.frame_mapper.coverage(far_value);

        let mut anomaly = self.anomaly_from_coverage(
            format!("removed_{far_value:08X}"),
            AnomalyType::FrameRemoved,
            &coverage,
        );
        anomaly.severity = Severity::Low;
        anomaly.bits_changed = count_set_bits(payload);
        anomaly.golden_payload = Some(payload.to_vec());
        anomaly.description = "Frame removed in suspect (present in golden)".to_string();
        anomaly.suspicion_reason = "Missing expected configuration".to_string();
        Some(anomaly)
    }

    // ----------------------------------------------------------------
    // Fase 2: diff de datos e historia
    // ----------------------------------------------------------------

    fn compare_common_far(
        &self,
        far_value: u32,
        golden: &GoldenBaseline,
        suspect: &LoadedBitstream,
    ) -> Vec<FrameAnomaly> {
        let Some(golden_payload) = golden.payload(far_value) else {
            return Vec::new();
        };
        let Some(suspect_write) = suspect.frame(far_value) else {
            return Vec::new();
        };

        if golden_payload != suspect_write.payload.as_slice() {
            return self
                .modified_frame_anomaly(
                    far_value,
                    golden_payload,
                    &suspect_write.payload,
                    None,
                    true,
                )
                .into_iter()
                .collect();
        }

        // Estado final idéntico: auditar la secuencia de escrituras en
        // busca de configuraciones transitorias ocultas.
        let golden_history = golden.history(far_value);
        let suspect_history = suspect.write_history_payloads(far_value);
        if golden_history.is_empty() || suspect_history.is_empty() {
            return Vec::new();
        }

        let mut anomalies = Vec::new();
        let zipped = golden_history.len().min(suspect_history.len());
        for write_index in 0..zipped {
            if suspect_history[write_index] != golden_history[write_index].as_slice() {
                if let Some(anomaly) = self.modified_frame_anomaly(
                    far_value,
                    &golden_history[write_index],
                    suspect_history[write_index],
                    Some((
                        write_index + 1,
                        format!(
                            "Write #{} deviates from golden configuration sequence",
                            write_index + 1
                        ),
                    )),
                    false,
                ) {
                    anomalies.push(anomaly);
                }
            }
        }
        for write_index in zipped..suspect_history.len() {
            if suspect_history[write_index] != golden_payload {
                if let Some(anomaly) = self.modified_frame_anomaly(
                    far_value,
                    golden_payload,
                    suspect_history[write_index],
                    Some((
                        write_index + 1,
                        format!(
                            "Unexpected extra write #{} not present in golden history",
                            write_index + 1
                        ),
                    )),
                    false,
                ) {
                    anomalies.push(anomaly);
                }
            }
        }
        anomalies
    }

    /// Construye la anomalía de modificación. `transient_context` porta
    /// (índice de escritura, nota); el piso de ruido solo rige el diff
    /// del estado final, nunca la evidencia transitoria.
    fn modified_frame_anomaly(
        &self,
        far_value: u32,
        reference_payload: &[u8],
        suspect_payload: &[u8],
        transient_context: Option<(usize, String)>,
        apply_noise_floor: bool,
    ) -> Option<FrameAnomaly> {
        let diff_bits = diff_bit_offsets(reference_payload, suspect_payload).ok()?;
        if diff_bits.is_empty() {
            return None;
        }
        if apply_noise_floor && (diff_bits.len() as u32) < SIGNIFICANCE_NOISE_FLOOR {
            return None;
        }

        let coverage = self.frame_mapper.coverage(far_value);
        let anomaly_type = primary_anomaly_type(&coverage);
        let is_transient = transient_context.is_some();

        let anomaly_id = match &transient_context {
            Some((write_index, _)) => format!("modified_{far_value:08X}_w{write_index:02}"),
            None => format!("modified_{far_value:08X}"),
        };

        let mut anomaly = self.anomaly_from_coverage(anomaly_id, anomaly_type, &coverage);
        anomaly.bits_changed = diff_bits.len() as u32;
        anomaly.changed_bit_positions =
            diff_bits.iter().take(CHANGED_BIT_SAMPLE_LIMIT).copied().collect();
        anomaly.golden_payload = Some(reference_payload.to_vec());
        anomaly.suspect_payload = Some(suspect_payload.to_vec());
        anomaly.transient = is_transient;

        let transient_suffix = if is_transient { " (transient write)" } else { "" };
        anomaly.description = format!(
            "{} bits modified in {} frame{}",
            diff_bits.len(),
            coverage.block_type_name,
            transient_suffix
        );
        anomaly.suspicion_reason = match transient_context {
            Some((_, note)) => note,
            None => "Final configuration differs".to_string(),
        };
        Some(anomaly)
    }

    /// Esqueleto de anomalía con la identidad de trama de la cobertura.
    fn anomaly_from_coverage(
        &self,
        anomaly_id: String,
        anomaly_type: AnomalyType,
        coverage: &FrameCoverage,
    ) -> FrameAnomaly {
        FrameAnomaly {
            anomaly_id,
            anomaly_type,
            severity: Severity::Medium,
            far_value: coverage.far_value,
            far_hex: format!("0x{:08X}", coverage.far_value),
            block_type_code: coverage.block_type.map(|b| b.code()).unwrap_or(7),
            block_type_name: coverage.block_type_name.clone(),
            column: coverage.column,
            minor: coverage.minor,
            top_bottom: coverage.top_bottom,
            tiles_affected: coverage.tiles_affected.clone(),
            tiles_used: Vec::new(),
            tiles_unused: Vec::new(),
            bits_changed: 0,
            changed_bit_positions: Vec::new(),
            is_routing_frame: coverage.is_routing_frame(),
            is_logic_frame: coverage.is_logic_frame(),
            is_clock_frame: coverage.is_clock_frame(),
            is_io_frame: coverage.is_io_frame(),
            golden_payload: None,
            suspect_payload: None,
            description: String::new(),
            suspicion_reason: String::new(),
            attack_vectors: Vec::new(),
            confidence_score: 0.0,
            transient: false,
        }
    }
}

/// Tipo de anomalía según la categoría de recurso dominante.
/// Precedencia: reloj, IO, ruteo, lógica, genérico.
fn primary_anomaly_type(coverage: &FrameCoverage) -> AnomalyType {
    if coverage.is_clock_frame() {
        AnomalyType::ClockChange
    } else if coverage.is_io_frame() {
        AnomalyType::IoChange
    } else if coverage.is_routing_frame() {
        AnomalyType::RoutingChange
    } else if coverage.is_logic_frame() {
        AnomalyType::LogicChange
    } else {
        AnomalyType::FrameModified
    }
}

/// Fase 3: partición de tiles y re-tipificación de modificaciones en
/// región no utilizada.
fn classify_tiles(anomaly: &mut FrameAnomaly, golden: &GoldenBaseline) {
    let mut tiles_used = Vec::new();
    let mut tiles_unused = Vec::new();
    for tile_name in &anomaly.tiles_affected {
        if golden.is_tile_used(tile_name) {
            tiles_used.push(tile_name.clone());
        } else {
            tiles_unused.push(tile_name.clone());
        }
    }
    anomaly.tiles_used = tiles_used;
    anomaly.tiles_unused = tiles_unused;

    if anomaly.is_in_unused_region() && anomaly.anomaly_type == AnomalyType::FrameModified {
        anomaly.anomaly_type = AnomalyType::UnusedRegionMod;
    }
}
