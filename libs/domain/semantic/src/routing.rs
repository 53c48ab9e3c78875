// [libs/domain/semantic/src/routing.rs]
/*!
 * =================================================================
 * APARATO: ROUTING STATE RECONSTRUCTOR (V3.2)
 * CLASIFICACIÓN: DOMAIN SEMANTIC (ESTRATO L2)
 * RESPONSABILIDAD: BYTES DE TRAMA -> CONJUNTO DE PIPs ACTIVOS
 *
 * El mapa PIP -> (FAR, bit) es una distribución determinista de la
 * lista de PIPs de cada tile sobre sus tramas de ruteo, no un mapeo
 * fiel al dispositivo. El contrato del detector es que golden y
 * sospechoso usan exactamente la misma regla, de modo que las
 * comparaciones son consistentes.
 * =================================================================
 */

use std::collections::{BTreeMap, BTreeSet};
use std::cmp::Ordering;

use centinela_core_fabric::{decode_far, extract_bit, BlockType};
use centinela_domain_device::DeviceModel;
use centinela_domain_mapping::{FrameMapper, ReverseMapper};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Paso de bits entre PIPs consecutivos de un tile.
const PIP_BIT_STRIDE: u32 = 4;

/// Un punto de interconexión programable activo (encendido).
///
/// La identidad es (tile, cable_inicio, cable_fin); el FAR y el offset
/// de bit son informativos y no participan en igualdad ni orden.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivePip {
    pub tile_name: String,
    pub start_wire_id: u32,
    pub end_wire_id: u32,
    pub far_value: u32,
    pub bit_offset: u32,
}

impl ActivePip {
    fn identity(&self) -> (&str, u32, u32) {
        (&self.tile_name, self.start_wire_id, self.end_wire_id)
    }
}

impl PartialEq for ActivePip {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for ActivePip {}

impl PartialOrd for ActivePip {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ActivePip {
    fn cmp(&self, other: &Self) -> Ordering {
        self.identity().cmp(&other.identity())
    }
}

impl std::hash::Hash for ActivePip {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl std::fmt::Display for ActivePip {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "PIP({}: {} -> {})",
            self.tile_name, self.start_wire_id, self.end_wire_id
        )
    }
}

/// Estado de ruteo completo reconstruido de un bitstream.
#[derive(Debug, Clone, Default)]
pub struct RoutingConfiguration {
    pub bitstream_id: String,
    active_pips: BTreeSet<ActivePip>,
    pips_by_tile: BTreeMap<String, BTreeSet<ActivePip>>,
    pips_by_frame: BTreeMap<u32, BTreeSet<ActivePip>>,
}

impl RoutingConfiguration {
    /// Configuración vacía para un bitstream identificado.
    #[must_use]
    pub fn new(bitstream_id: &str) -> Self {
        Self { bitstream_id: bitstream_id.to_string(), ..Self::default() }
    }

    /// Registra un PIP activo en los tres índices.
    pub fn add_pip(&mut self, pip: ActivePip) {
        self.pips_by_tile.entry(pip.tile_name.clone()).or_default().insert(pip.clone());
        self.pips_by_frame.entry(pip.far_value).or_default().insert(pip.clone());
        self.active_pips.insert(pip);
    }

    /// Conjunto completo de PIPs activos.
    #[must_use]
    pub fn active_pips(&self) -> &BTreeSet<ActivePip> {
        &self.active_pips
    }

    /// PIPs activos de un tile.
    #[must_use]
    pub fn pips_in_tile(&self, tile_name: &str) -> BTreeSet<ActivePip> {
        self.pips_by_tile.get(tile_name).cloned().unwrap_or_default()
    }

    /// PIPs configurados por una trama.
    #[must_use]
    pub fn pips_in_frame(&self, far_value: u32) -> BTreeSet<ActivePip> {
        self.pips_by_frame.get(&far_value).cloned().unwrap_or_default()
    }

    /// Un PIP concreto está activo.
    #[must_use]
    pub fn is_pip_active(&self, tile_name: &str, start_wire: u32, end_wire: u32) -> bool {
        self.active_pips.contains(&ActivePip {
            tile_name: tile_name.to_string(),
            start_wire_id: start_wire,
            end_wire_id: end_wire,
            far_value: 0,
            bit_offset: 0,
        })
    }

    /// Cantidad de PIPs activos.
    #[must_use]
    pub fn len(&self) -> usize {
        self.active_pips.len()
    }

    /// No hay ruteo activo.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active_pips.is_empty()
    }
}

/// Resolutor determinista PIP -> (FAR, offset de bit).
#[derive(Debug, Default)]
pub struct PipBitResolver {
    by_identity: BTreeMap<(String, u32, u32), (u32, u32)>,
    by_frame: BTreeMap<u32, Vec<(String, u32, u32, u32)>>,
}

impl PipBitResolver {
    /**
     * Distribuye los PIPs de cada tile del modelo sobre sus tramas de
     * ruteo: el PIP i-ésimo cae en la trama `i mod n_tramas` con
     * offset `(i * 4) mod span`, donde span es la franja de ruteo del
     * bloque de esa trama.
     */
    #[instrument(skip(model, reverse_mapper))]
    #[must_use]
    pub fn build(model: &DeviceModel, reverse_mapper: &ReverseMapper) -> Self {
        let mut resolver = Self::default();
        let mut assigned = 0usize;

        for tile in model.all_tiles() {
            let pips = model.pips_of_tile(&tile.name);
            if pips.is_empty() {
                continue;
            }
            let routing_frames = reverse_mapper.routing_frames_for_tile(&tile.name);
            if routing_frames.is_empty() {
                continue;
            }

            for (pip_index, pip) in pips.iter().enumerate() {
                let frame_reference = routing_frames[pip_index % routing_frames.len()];
                let span = routing_bit_span(frame_reference.far_value);
                let bit_offset = (pip_index as u32 * PIP_BIT_STRIDE) % span;

                let identity = (tile.name.clone(), pip.start_wire_id, pip.end_wire_id);
                resolver
                    .by_identity
                    .insert(identity, (frame_reference.far_value, bit_offset));
                resolver.by_frame.entry(frame_reference.far_value).or_default().push((
                    tile.name.clone(),
                    pip.start_wire_id,
                    pip.end_wire_id,
                    bit_offset,
                ));
                assigned += 1;
            }
        }

        debug!("🧩 [PIP_RESOLVER]: {} pip-to-bit assignments resident", assigned);
        resolver
    }

    /// (FAR, bit) asignado a un PIP, si el tile participa del modelo.
    #[must_use]
    pub fn bit_location(
        &self,
        tile_name: &str,
        start_wire: u32,
        end_wire: u32,
    ) -> Option<(u32, u32)> {
        self.by_identity
            .get(&(tile_name.to_string(), start_wire, end_wire))
            .copied()
    }

    /// Candidatos (tile, inicio, fin, bit) gobernados por una trama.
    #[must_use]
    pub fn candidates_for_frame(&self, far_value: u32) -> &[(String, u32, u32, u32)] {
        self.by_frame
            .get(&far_value)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Cantidad de asignaciones residentes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_identity.len()
    }

    /// No hay asignaciones.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_identity.is_empty()
    }
}

/// Franja de bits de ruteo del bloque que gobierna la trama.
fn routing_bit_span(far_value: u32) -> u32 {
    match decode_far(far_value).block_type() {
        Some(BlockType::Clb) => 704,
        Some(BlockType::Iob) => 800,
        _ => 1312,
    }
}

/// Resultado de comparar dos configuraciones de ruteo.
#[derive(Debug, Clone)]
pub struct RoutingComparison {
    pub golden_pip_count: usize,
    pub suspect_pip_count: usize,
    pub common_count: usize,
    pub added: Vec<ActivePip>,
    pub removed: Vec<ActivePip>,
    /// PIPs nuevos en tiles que en el golden no tenían ruteo alguno.
    pub suspicious_additions: Vec<ActivePip>,
}

/// Motor de reconstrucción de estado de ruteo.
pub struct RoutingReconstructor {
    frame_mapper: FrameMapper,
    resolver: PipBitResolver,
}

impl RoutingReconstructor {
    /// Construye el motor con el resolutor PIP->bit del modelo.
    #[must_use]
    pub fn new(model: &DeviceModel, reverse_mapper: &ReverseMapper) -> Self {
        Self {
            frame_mapper: FrameMapper::new(),
            resolver: PipBitResolver::build(model, reverse_mapper),
        }
    }

    /// El resolutor no tiene asignaciones (modelo sin PIPs): la fase
    /// de ruteo debe degradar a "análisis omitido".
    #[must_use]
    pub fn is_inert(&self) -> bool {
        self.resolver.is_empty()
    }

    /**
     * Reconstruye el conjunto de PIPs activos desde los payloads
     * efectivos (pares FAR -> bytes) de un bitstream.
     */
    #[instrument(skip(self, effective_frames))]
    pub fn reconstruct<'a>(
        &self,
        bitstream_id: &str,
        effective_frames: impl Iterator<Item = (u32, &'a [u8])>,
    ) -> RoutingConfiguration {
        let mut configuration = RoutingConfiguration::new(bitstream_id);
        let mut routing_frames = 0usize;

        for (far_value, payload) in effective_frames {
            let coverage = self.frame_mapper.coverage(far_value);
            if !coverage.is_valid || !coverage.is_routing_frame() {
                continue;
            }
            routing_frames += 1;

            for (tile_name, start_wire, end_wire, bit_offset) in
                self.resolver.candidates_for_frame(far_value)
            {
                let enabled = extract_bit(payload, *bit_offset as usize).unwrap_or(false);
                if enabled {
                    configuration.add_pip(ActivePip {
                        tile_name: tile_name.clone(),
                        start_wire_id: *start_wire,
                        end_wire_id: *end_wire,
                        far_value,
                        bit_offset: *bit_offset,
                    });
                }
            }
        }

        info!(
            "🛰️ [ROUTING_RECON]: {} -> {} active PIPs over {} routing frames",
            bitstream_id,
            configuration.len(),
            routing_frames
        );
        configuration
    }

    /**
     * Diferencia dos configuraciones: agregados, removidos y los
     * agregados sospechosos (ruteo nuevo en tile previamente libre de
     * ruteo en el golden).
     */
    #[must_use]
    pub fn compare(
        &self,
        golden: &RoutingConfiguration,
        suspect: &RoutingConfiguration,
    ) -> RoutingComparison {
        let added: Vec<ActivePip> =
            suspect.active_pips().difference(golden.active_pips()).cloned().collect();
        let removed: Vec<ActivePip> =
            golden.active_pips().difference(suspect.active_pips()).cloned().collect();
        let common_count = golden.active_pips().intersection(suspect.active_pips()).count();

        let suspicious_additions = added
            .iter()
            .filter(|pip| golden.pips_in_tile(&pip.tile_name).is_empty())
            .cloned()
            .collect();

        RoutingComparison {
            golden_pip_count: golden.len(),
            suspect_pip_count: suspect.len(),
            common_count,
            added,
            removed,
            suspicious_additions,
        }
    }
}
