// [libs/domain/models/src/cluster.rs]
/*!
 * =================================================================
 * APARATO: ANOMALY CLUSTERING (V3.0)
 * CLASIFICACIÓN: DOMAIN MODELS (ESTRATO L2)
 * RESPONSABILIDAD: AGRUPACIÓN ESPACIAL DE ANOMALÍAS RELACIONADAS
 *
 * Anomalías espacialmente próximas suelen pertenecer al mismo
 * troyano. La pista de agrupación es columnar: anomalías en columnas
 * contiguas (separación <= 1) forman un clúster con centro, extensión
 * espacial, severidad máxima y confianza promedio.
 * =================================================================
 */

use serde::{Deserialize, Serialize};

use crate::anomaly::{FrameAnomaly, Severity};

/// Separación columnar máxima dentro de un clúster.
const CLUSTER_COLUMN_GAP: u8 = 1;

/// Grupo de anomalías espacialmente relacionadas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyCluster {
    pub cluster_id: String,
    /// Identificadores de las anomalías miembro.
    pub member_ids: Vec<String>,
    pub center_column: u8,
    /// Extensión espacial (col_min, y_min, col_max, y_max).
    pub spatial_extent: (u8, u32, u8, u32),
    pub max_severity: Severity,
    pub average_confidence: f64,
    /// Tipo dominante entre los miembros (pista, no veredicto).
    pub cluster_type: String,
    pub total_bits_changed: u64,
}

impl AnomalyCluster {
    /// Cantidad de anomalías del clúster.
    #[must_use]
    pub fn len(&self) -> usize {
        self.member_ids.len()
    }

    /// El clúster está vacío (no ocurre tras la agrupación).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.member_ids.is_empty()
    }
}

/**
 * Agrupa anomalías por proximidad columnar. Determinista: el orden de
 * los clústeres sigue la columna mínima de cada grupo.
 */
#[must_use]
pub fn cluster_anomalies(anomalies: &[FrameAnomaly]) -> Vec<AnomalyCluster> {
    let mut ordered: Vec<&FrameAnomaly> = anomalies.iter().collect();
    ordered.sort_by(|left, right| {
        (left.column, left.far_value, &left.anomaly_id)
            .cmp(&(right.column, right.far_value, &right.anomaly_id))
    });

    let mut clusters = Vec::new();
    let mut current: Vec<&FrameAnomaly> = Vec::new();

    for anomaly in ordered {
        let belongs = current
            .last()
            .map(|previous| anomaly.column.saturating_sub(previous.column) <= CLUSTER_COLUMN_GAP)
            .unwrap_or(true);
        if belongs {
            current.push(anomaly);
        } else {
            clusters.push(seal_cluster(clusters.len(), &current));
            current = vec![anomaly];
        }
    }
    if !current.is_empty() {
        clusters.push(seal_cluster(clusters.len(), &current));
    }
    clusters
}

fn seal_cluster(index: usize, members: &[&FrameAnomaly]) -> AnomalyCluster {
    let column_min = members.iter().map(|a| a.column).min().unwrap_or(0);
    let column_max = members.iter().map(|a| a.column).max().unwrap_or(0);
    let row_min = members.iter().map(|a| a.minor * 20).min().unwrap_or(0);
    let row_max = members.iter().map(|a| a.minor * 20 + 19).max().unwrap_or(0);

    let max_severity = members
        .iter()
        .map(|a| a.severity)
        .min()
        .unwrap_or(Severity::Info);
    let average_confidence = if members.is_empty() {
        0.0
    } else {
        members.iter().map(|a| a.confidence_score).sum::<f64>() / members.len() as f64
    };

    // Tipo dominante por frecuencia; empates resueltos por orden de tipo.
    let mut frequency: std::collections::BTreeMap<&str, usize> = std::collections::BTreeMap::new();
    for member in members {
        *frequency.entry(member.anomaly_type.as_str()).or_insert(0) += 1;
    }
    let cluster_type = frequency
        .iter()
        .max_by_key(|(_, count)| *count)
        .map(|(name, _)| (*name).to_string())
        .unwrap_or_else(|| "unknown".to_string());

    AnomalyCluster {
        cluster_id: format!("cluster_{index:02}"),
        member_ids: members.iter().map(|a| a.anomaly_id.clone()).collect(),
        center_column: ((u16::from(column_min) + u16::from(column_max)) / 2) as u8,
        spatial_extent: (column_min, row_min, column_max, row_max),
        max_severity,
        average_confidence,
        cluster_type,
        total_bits_changed: members.iter().map(|a| u64::from(a.bits_changed)).sum(),
    }
}
