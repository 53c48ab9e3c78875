// [libs/domain/detector/src/enhanced.rs]
/*!
 * =================================================================
 * APARATO: ENHANCED DIFFERENTIAL DETECTOR (V3.3 - SEMANTIC GRADE)
 * CLASIFICACIÓN: DOMAIN DETECTOR (ESTRATO L3)
 * RESPONSABILIDAD: DETECCIÓN BASE + ANÁLISIS SEMÁNTICO COMPLETO
 *
 * Extiende al detector base con tres pasadas complementarias:
 *   - Enriquecimiento semántico de cada anomalía (bits de ruteo /
 *     lógica / sensibles entre los offsets divergentes).
 *   - Reconstrucción y comparación de estado de ruteo (PIPs).
 *   - Reconstrucción y comparación de estado de lógica (LUTs).
 *
 * Las anomalías semánticas se AGREGAN al reporte; nunca reemplazan a
 * las de fase 2 (ambas vistas son complementarias). Si los payloads
 * dorados no están disponibles, las pasadas degradan a una anomalía
 * informativa y el resultado base queda en pie.
 * =================================================================
 */

use centinela_core_bitstream::LoadedBitstream;
use centinela_domain_device::DeviceModel;
use centinela_domain_mapping::{FrameMapper, IndexStrategy, ReverseMapper};
use centinela_domain_models::{AnomalyReport, AnomalyType, FrameAnomaly, Severity};
use centinela_domain_semantic::{
    analyze_lut_modification, BitLayoutDatabase, LogicReconstructor, LutModification,
    RoutingReconstructor, SemanticSeverity,
};
use tracing::{info, instrument, warn};

use crate::baseline::GoldenBaseline;
use crate::differential::FrameDifferentialDetector;

/// Detector con análisis semántico de ruteo y lógica.
pub struct EnhancedDifferentialDetector {
    base_detector: FrameDifferentialDetector,
    frame_mapper: FrameMapper,
    bit_database: BitLayoutDatabase,
    routing_reconstructor: RoutingReconstructor,
    logic_reconstructor: LogicReconstructor,
}

impl EnhancedDifferentialDetector {
    /// Construye el detector; el resolutor PIP->bit se precalcula
    /// desde el modelo del dispositivo.
    #[must_use]
    pub fn new(model: &DeviceModel) -> Self {
        let reverse_mapper = ReverseMapper::new(IndexStrategy::Hybrid);
        Self {
            base_detector: FrameDifferentialDetector::new(),
            frame_mapper: FrameMapper::new(),
            bit_database: BitLayoutDatabase::new(),
            routing_reconstructor: RoutingReconstructor::new(model, &reverse_mapper),
            logic_reconstructor: LogicReconstructor::new(),
        }
    }

    /// Detección completa con ambas pasadas semánticas.
    pub fn detect_enhanced(
        &self,
        golden: &GoldenBaseline,
        suspect: &LoadedBitstream,
    ) -> AnomalyReport {
        self.detect_enhanced_with(golden, suspect, true, true)
    }

    /**
     * Detección con control fino de pasadas.
     *
     * Orden: detección base, enriquecimiento semántico, ruteo, lógica,
     * recomputación de contadores y veredicto.
     */
    #[instrument(skip(self, golden, suspect), fields(golden_id = %golden.baseline_id))]
    pub fn detect_enhanced_with(
        &self,
        golden: &GoldenBaseline,
        suspect: &LoadedBitstream,
        analyze_routing: bool,
        analyze_logic: bool,
    ) -> AnomalyReport {
        let mut report = self.base_detector.detect(golden, suspect);

        self.enrich_with_semantics(&mut report);

        if analyze_routing || analyze_logic {
            match golden.frame_view() {
                Some(_) => {
                    if analyze_routing {
                        self.append_routing_anomalies(golden, suspect, &mut report);
                    }
                    if analyze_logic {
                        self.append_logic_anomalies(golden, suspect, &mut report);
                    }
                }
                None => {
                    warn!("⚠️ [ENHANCED_DEGRADE]: golden frame data unavailable; semantic passes skipped");
                    report.add_anomaly(self.degraded_analysis_note(
                        "Routing/logic reconstruction skipped: golden frame data unavailable",
                    ));
                }
            }
        }

        report.rebuild_counters();
        report.finalize();
        info!(
            "🧪 [ENHANCED_COMPLETE]: {} anomalies after semantic passes, trojan={}",
            report.len(),
            report.trojan_detected
        );
        report
    }

    /// Enriquecimiento semántico de anomalías con ambos payloads.
    fn enrich_with_semantics(&self, report: &mut AnomalyReport) {
        for anomaly in &mut report.anomalies {
            let (Some(golden_payload), Some(suspect_payload)) =
                (&anomaly.golden_payload, &anomaly.suspect_payload)
            else {
                continue;
            };
            let Ok(semantic_diff) = self.bit_database.analyze_frame_diff(
                anomaly.far_value,
                golden_payload,
                suspect_payload,
            ) else {
                continue;
            };
            if !semantic_diff.has_changes {
                continue;
            }

            anomaly.description =
                format!("{} | {}", anomaly.description, semantic_diff.summary());

            if semantic_diff.max_severity == SemanticSeverity::Critical {
                anomaly.severity = Severity::Critical;
                anomaly.confidence_score = (anomaly.confidence_score + 0.2).min(1.0);
            }
        }
    }

    /// Pasada de ruteo: PIPs agregados en tiles previamente libres de
    /// ruteo se convierten en anomalías críticas.
    fn append_routing_anomalies(
        &self,
        golden: &GoldenBaseline,
        suspect: &LoadedBitstream,
        report: &mut AnomalyReport,
    ) {
        if self.routing_reconstructor.is_inert() {
            warn!("⚠️ [ROUTING_DEGRADE]: pip-to-bit table unavailable; routing pass skipped");
            report.add_anomaly(self.degraded_analysis_note(
                "Routing reconstruction skipped: pip-to-bit table unavailable",
            ));
            return;
        }

        let golden_routing = self
            .routing_reconstructor
            .reconstruct(&golden.baseline_id, golden.effective_payloads());
        let suspect_routing = self
            .routing_reconstructor
            .reconstruct(&suspect.info.filename, suspect.effective_payloads());
        let comparison = self.routing_reconstructor.compare(&golden_routing, &suspect_routing);

        let mut additions = comparison.suspicious_additions;
        additions.sort();
        for pip in additions {
            let coverage = self.frame_mapper.coverage(pip.far_value);
            let mut anomaly = FrameAnomaly {
                anomaly_id: format!(
                    "routing_{}_{}_{}",
                    pip.tile_name, pip.start_wire_id, pip.end_wire_id
                ),
                anomaly_type: AnomalyType::RoutingChange,
                severity: Severity::Critical,
                far_value: pip.far_value,
                far_hex: format!("0x{:08X}", pip.far_value),
                block_type_code: coverage.block_type.map(|b| b.code()).unwrap_or(7),
                block_type_name: coverage.block_type_name.clone(),
                column: coverage.column,
                minor: coverage.minor,
                top_bottom: coverage.top_bottom,
                tiles_affected: vec![pip.tile_name.clone()],
                tiles_used: Vec::new(),
                tiles_unused: vec![pip.tile_name.clone()],
                bits_changed: 1,
                changed_bit_positions: vec![pip.bit_offset],
                is_routing_frame: true,
                is_logic_frame: false,
                is_clock_frame: coverage.is_clock_frame(),
                is_io_frame: coverage.is_io_frame(),
                golden_payload: None,
                suspect_payload: None,
                description: format!("Suspicious PIP added: {pip}"),
                suspicion_reason: "New routing in previously unused area (HIGH TROJAN RISK)"
                    .to_string(),
                attack_vectors: vec![
                    "routing_detour".to_string(),
                    "minimal_modification_trojan".to_string(),
                    "unused_region_routing".to_string(),
                ],
                confidence_score: 0.95,
                transient: false,
            };
            if golden.is_tile_used(&pip.tile_name) {
                anomaly.tiles_used = vec![pip.tile_name.clone()];
                anomaly.tiles_unused.clear();
            }
            report.add_anomaly(anomaly);
        }
    }

    /// Pasada de lógica: cada LUT modificada se gradúa con el
    /// clasificador semántico y se agrega al reporte.
    fn append_logic_anomalies(
        &self,
        golden: &GoldenBaseline,
        suspect: &LoadedBitstream,
        report: &mut AnomalyReport,
    ) {
        let golden_logic = self
            .logic_reconstructor
            .reconstruct(&golden.baseline_id, golden.effective_payloads());
        let suspect_logic = self
            .logic_reconstructor
            .reconstruct(&suspect.info.filename, suspect.effective_payloads());
        let comparison = self.logic_reconstructor.compare(&golden_logic, &suspect_logic);

        let mut modifications = comparison.modified;
        modifications.sort_by(|left, right| {
            (&left.tile_name, &left.lut_id).cmp(&(&right.tile_name, &right.lut_id))
        });
        for modification in modifications {
            report.add_anomaly(self.logic_anomaly(golden, &modification));
        }
    }

    fn logic_anomaly(
        &self,
        golden: &GoldenBaseline,
        modification: &LutModification,
    ) -> FrameAnomaly {
        let analysis = analyze_lut_modification(
            modification.golden_truth_table,
            modification.suspect_truth_table,
        );
        let severity = match analysis.severity {
            SemanticSeverity::Critical => Severity::Critical,
            SemanticSeverity::High => Severity::High,
            SemanticSeverity::Medium => Severity::Medium,
            SemanticSeverity::Low => Severity::Low,
        };
        let confidence = if analysis.severity == SemanticSeverity::Critical { 0.8 } else { 0.6 };
        let coverage = self.frame_mapper.coverage(modification.far_value);

        let tile_used = golden.is_tile_used(&modification.tile_name);
        FrameAnomaly {
            anomaly_id: format!("logic_{}_{}", modification.tile_name, modification.lut_id),
            anomaly_type: AnomalyType::LogicChange,
            severity,
            far_value: modification.far_value,
            far_hex: format!("0x{:08X}", modification.far_value),
            block_type_code: coverage.block_type.map(|b| b.code()).unwrap_or(7),
            block_type_name: coverage.block_type_name.clone(),
            column: coverage.column,
            minor: coverage.minor,
            top_bottom: coverage.top_bottom,
            tiles_affected: vec![modification.tile_name.clone()],
            tiles_used: if tile_used { vec![modification.tile_name.clone()] } else { Vec::new() },
            tiles_unused: if tile_used { Vec::new() } else { vec![modification.tile_name.clone()] },
            bits_changed: analysis.bits_changed,
            changed_bit_positions: Vec::new(),
            is_routing_frame: false,
            is_logic_frame: true,
            is_clock_frame: false,
            is_io_frame: false,
            golden_payload: None,
            suspect_payload: None,
            description: format!(
                "LUT {} truth table modified: {}",
                modification.lut_id,
                analysis.semantic.as_str()
            ),
            suspicion_reason: format!(
                "Logic modification: {}",
                analysis.change_class.as_str()
            ),
            attack_vectors: vec![
                "lut_truth_table_modification".to_string(),
                "logic_trojan".to_string(),
            ],
            confidence_score: confidence,
            transient: false,
        }
    }

    /// Anomalía informativa de degradación de análisis.
    fn degraded_analysis_note(&self, description: &str) -> FrameAnomaly {
        FrameAnomaly {
            anomaly_id: "info_semantic_analysis_degraded".to_string(),
            anomaly_type: AnomalyType::FrameModified,
            severity: Severity::Info,
            far_value: 0,
            far_hex: "0x00000000".to_string(),
            block_type_code: 7,
            block_type_name: "UNKNOWN".to_string(),
            column: 0,
            minor: 0,
            top_bottom: 0,
            tiles_affected: Vec::new(),
            tiles_used: Vec::new(),
            tiles_unused: Vec::new(),
            bits_changed: 0,
            changed_bit_positions: Vec::new(),
            is_routing_frame: false,
            is_logic_frame: false,
            is_clock_frame: false,
            is_io_frame: false,
            golden_payload: None,
            suspect_payload: None,
            description: description.to_string(),
            suspicion_reason: "Analysis skipped; base-pass results stand".to_string(),
            attack_vectors: Vec::new(),
            confidence_score: 0.0,
            transient: false,
        }
    }
}
