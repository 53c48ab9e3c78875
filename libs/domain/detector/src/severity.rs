// [libs/domain/detector/src/severity.rs]
/*!
 * =================================================================
 * APARATO: SEVERITY PRECEDENCE TABLE (V3.2 - DECISION GRADE)
 * CLASIFICACIÓN: DOMAIN DETECTOR (ESTRATO L3)
 * RESPONSABILIDAD: ASIGNACIÓN DE SEVERIDAD POR LISTA ORDENADA
 *
 * Tabla de decisión explícita, no jerarquía de tipos: la primera
 * regla que aplica provee severidad, confianza, razón y vectores de
 * ataque. Tras la tabla corre la escalada transitoria: evidencia que
 * vive solo en la secuencia de escrituras nunca queda por debajo de
 * HIGH.
 * =================================================================
 */

use centinela_domain_models::{AnomalyType, FrameAnomaly, Severity};

/// Una regla de la tabla de severidad.
pub struct SeverityRule {
    pub label: &'static str,
    pub severity: Severity,
    pub confidence: f64,
    pub reason: &'static str,
    pub attack_vectors: &'static [&'static str],
    pub matches: fn(&FrameAnomaly) -> bool,
}

fn clock_frame(anomaly: &FrameAnomaly) -> bool {
    anomaly.is_clock_frame
}

fn io_in_unused_region(anomaly: &FrameAnomaly) -> bool {
    anomaly.is_io_frame && anomaly.is_in_unused_region()
}

fn small_routing_in_unused_region(anomaly: &FrameAnomaly) -> bool {
    anomaly.is_routing_frame
        && anomaly.is_in_unused_region()
        && (5..=50).contains(&anomaly.bits_changed)
}

fn routing_in_unused_region(anomaly: &FrameAnomaly) -> bool {
    anomaly.is_routing_frame && anomaly.is_in_unused_region()
}

fn routing_in_used_region(anomaly: &FrameAnomaly) -> bool {
    anomaly.is_routing_frame && !anomaly.tiles_used.is_empty()
}

fn logic_in_unused_region(anomaly: &FrameAnomaly) -> bool {
    anomaly.is_logic_frame && anomaly.is_in_unused_region()
}

fn frame_added_in_unused_region(anomaly: &FrameAnomaly) -> bool {
    anomaly.anomaly_type == AnomalyType::FrameAdded && anomaly.is_in_unused_region()
}

fn frame_added(anomaly: &FrameAnomaly) -> bool {
    anomaly.anomaly_type == AnomalyType::FrameAdded
}

fn frame_removed(anomaly: &FrameAnomaly) -> bool {
    anomaly.anomaly_type == AnomalyType::FrameRemoved
}

fn fallback(_anomaly: &FrameAnomaly) -> bool {
    true
}

/// La tabla, en orden de precedencia. La primera regla que aplica gana.
static SEVERITY_RULES: [SeverityRule; 10] = [
    SeverityRule {
        label: "clock_network_modification",
        severity: Severity::Critical,
        confidence: 0.95,
        reason: "Clock network modification detected (CRITICAL)",
        attack_vectors: &["clock_manipulation", "timing_attack"],
        matches: clock_frame,
    },
    SeverityRule {
        label: "io_in_unused_region",
        severity: Severity::Critical,
        confidence: 0.90,
        reason: "IO modification in unused region (data exfiltration risk)",
        attack_vectors: &["data_exfiltration", "covert_channel"],
        matches: io_in_unused_region,
    },
    SeverityRule {
        label: "small_targeted_routing_in_unused_region",
        severity: Severity::Critical,
        confidence: 0.90,
        reason: "Small targeted routing change in unused region (TROJAN SIGNATURE)",
        attack_vectors: &["routing_detour", "hidden_routing_trojan", "minimal_footprint_trojan"],
        matches: small_routing_in_unused_region,
    },
    SeverityRule {
        label: "routing_in_unused_region",
        severity: Severity::High,
        confidence: 0.85,
        reason: "Routing modification in unused region (prime Trojan location)",
        attack_vectors: &["routing_detour", "hidden_routing_trojan"],
        matches: routing_in_unused_region,
    },
    SeverityRule {
        label: "routing_in_used_region",
        severity: Severity::High,
        confidence: 0.70,
        reason: "Routing modification in used region (possible detour)",
        attack_vectors: &["routing_detour", "path_manipulation"],
        matches: routing_in_used_region,
    },
    SeverityRule {
        label: "logic_in_unused_region",
        severity: Severity::Medium,
        confidence: 0.75,
        reason: "Logic modification in unused region",
        attack_vectors: &["hidden_logic", "trojan_payload"],
        matches: logic_in_unused_region,
    },
    SeverityRule {
        label: "frame_added_in_unused_region",
        severity: Severity::Medium,
        confidence: 0.70,
        reason: "Unexpected frame configuration in unused region",
        attack_vectors: &["unauthorized_configuration"],
        matches: frame_added_in_unused_region,
    },
    SeverityRule {
        label: "frame_added_in_used_region",
        severity: Severity::Low,
        confidence: 0.50,
        reason: "Unexpected frame configuration in used region",
        attack_vectors: &[],
        matches: frame_added,
    },
    SeverityRule {
        label: "frame_removed",
        severity: Severity::Low,
        confidence: 0.40,
        reason: "Frame removed (likely tool version difference)",
        attack_vectors: &[],
        matches: frame_removed,
    },
    SeverityRule {
        label: "standard_modification",
        severity: Severity::Low,
        confidence: 0.50,
        reason: "Standard modification",
        attack_vectors: &[],
        matches: fallback,
    },
];

/// Tabla de reglas en orden de precedencia.
#[must_use]
pub fn severity_rules() -> &'static [SeverityRule] {
    &SEVERITY_RULES
}

/**
 * Aplica la tabla a una anomalía y luego la escalada transitoria.
 * Retorna la etiqueta de la regla que aplicó.
 */
pub fn assess_severity(anomaly: &mut FrameAnomaly) -> &'static str {
    let mut applied_label = "standard_modification";

    for rule in &SEVERITY_RULES {
        if (rule.matches)(anomaly) {
            anomaly.severity = rule.severity;
            anomaly.confidence_score = rule.confidence;
            anomaly.suspicion_reason = rule.reason.to_string();
            for vector in rule.attack_vectors {
                anomaly.push_attack_vector(vector);
            }
            applied_label = rule.label;
            break;
        }
    }

    // Escalada transitoria: la evidencia oculta en la secuencia de
    // escrituras nunca se ignora aunque el estado final coincida.
    if anomaly.transient {
        anomaly.push_attack_vector("transient_payload");
        if matches!(anomaly.severity, Severity::Low | Severity::Medium) {
            anomaly.severity = Severity::High;
            anomaly.confidence_score = anomaly.confidence_score.max(0.80);
            anomaly.suspicion_reason =
                format!("{}; transient configuration observed", anomaly.suspicion_reason);
        } else {
            anomaly.suspicion_reason =
                format!("{} (transient configuration observed)", anomaly.suspicion_reason);
        }
    }

    applied_label
}
