// [libs/domain/detector/src/baseline.rs]
/*!
 * =================================================================
 * APARATO: GOLDEN BASELINE SNAPSHOT (V3.2 - SEALED VAULT)
 * CLASIFICACIÓN: DOMAIN DETECTOR (ESTRATO L3)
 * RESPONSABILIDAD: REFERENCIA CONFIABLE INMUTABLE + PERSISTENCIA
 *
 * La línea base dorada captura payloads por FAR, la historia completa
 * de escrituras y el conjunto de tiles ocupados por el diseño
 * legítimo. Lógicamente inmutable tras la construcción.
 *
 * Persistencia: contenedor binario versionado con marca, versión y
 * sello SHA-256 del cuerpo; un esquema serde fijo bajo bincode con
 * codificación fixint y tope de tamaño. Nunca un deserializador de
 * grafos de objetos arbitrarios.
 * =================================================================
 */

use std::collections::{BTreeMap, BTreeSet};
use std::io::{Read, Write};
use std::path::Path;

use bincode::Options;
use centinela_core_fabric::{decode_far, validate_far, FRAME_BYTE_COUNT};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{info, instrument};

use crate::errors::DetectorError;

/// Marca del contenedor sellado de línea base.
const BASELINE_MAGIC: [u8; 8] = *b"CENTGOLD";
/// Versión del formato de snapshot entendida por este binario.
const BASELINE_FORMAT_VERSION: u32 = 1;
/// Tope de seguridad del cuerpo serializado (256 MB).
const BASELINE_SIZE_LIMIT_BYTES: u64 = 256 * 1024 * 1024;

/// Configuración soberana de serialización del snapshot.
/// Garantiza determinismo entre arquitecturas.
fn baseline_serialization_config() -> impl bincode::Options {
    bincode::DefaultOptions::new()
        .with_little_endian()
        .with_fixint_encoding()
        .with_limit(BASELINE_SIZE_LIMIT_BYTES)
}

/// Referencia confiable derivada de un bitstream dorado.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldenBaseline {
    pub baseline_id: String,
    pub created_at: String,

    // Metadatos del bitstream de origen.
    pub design_name: String,
    pub device_name: String,
    pub build_date: String,
    pub build_time: String,
    /// Sello de procedencia del archivo dorado.
    pub source_sha256: Option<String>,

    frames: BTreeMap<u32, Vec<u8>>,
    write_history: BTreeMap<u32, Vec<Vec<u8>>>,
    configured_columns: BTreeSet<u8>,
    block_type_counts: BTreeMap<u8, usize>,
    used_tiles: BTreeSet<String>,
}

impl GoldenBaseline {
    /// Snapshot vacío; lo puebla el constructor de líneas base.
    #[must_use]
    pub fn new(baseline_id: &str) -> Self {
        Self {
            baseline_id: baseline_id.to_string(),
            created_at: Utc::now().to_rfc3339(),
            design_name: "Unknown".to_string(),
            device_name: "Unknown".to_string(),
            build_date: "Unknown".to_string(),
            build_time: "Unknown".to_string(),
            source_sha256: None,
            frames: BTreeMap::new(),
            write_history: BTreeMap::new(),
            configured_columns: BTreeSet::new(),
            block_type_counts: BTreeMap::new(),
            used_tiles: BTreeSet::new(),
        }
    }

    // ----------------------------------------------------------------
    // Mutadores de fase de construcción
    // ----------------------------------------------------------------

    /// Incorpora el payload efectivo de una trama. Fase de construcción.
    pub fn add_frame(&mut self, far_value: u32, payload: Vec<u8>) {
        let fields = decode_far(far_value);
        self.configured_columns.insert(fields.major);
        *self.block_type_counts.entry(fields.block_code).or_insert(0) += 1;
        self.frames.insert(far_value, payload);
    }

    /// Fija la historia de escrituras de un FAR. Fase de construcción.
    pub fn set_write_history(&mut self, far_value: u32, history: Vec<Vec<u8>>) {
        if !history.is_empty() {
            self.write_history.insert(far_value, history);
        }
    }

    /// Fija el conjunto de tiles ocupados. Fase de construcción.
    pub fn set_used_tiles(&mut self, used_tiles: BTreeSet<String>) {
        self.used_tiles = used_tiles;
    }

    /// Fija los metadatos de cabecera del bitstream de origen.
    pub fn set_source_metadata(
        &mut self,
        design_name: &str,
        device_name: &str,
        build_date: &str,
        build_time: &str,
        source_sha256: Option<String>,
    ) {
        self.design_name = design_name.to_string();
        self.device_name = device_name.to_string();
        self.build_date = build_date.to_string();
        self.build_time = build_time.to_string();
        self.source_sha256 = source_sha256;
    }

    // ----------------------------------------------------------------
    // Superficie de consulta inmutable
    // ----------------------------------------------------------------

    /// La línea base conoce el FAR.
    #[must_use]
    pub fn has(&self, far_value: u32) -> bool {
        self.frames.contains_key(&far_value)
    }

    /// Payload efectivo del FAR.
    #[must_use]
    pub fn payload(&self, far_value: u32) -> Option<&[u8]> {
        self.frames.get(&far_value).map(Vec::as_slice)
    }

    /// Historia de escrituras registrada para el FAR.
    #[must_use]
    pub fn history(&self, far_value: u32) -> &[Vec<u8>] {
        self.write_history
            .get(&far_value)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Conjunto de FARs esperados por la referencia.
    #[must_use]
    pub fn expected_fars(&self) -> BTreeSet<u32> {
        self.frames.keys().copied().collect()
    }

    /// El tile está ocupado por el diseño legítimo.
    #[must_use]
    pub fn is_tile_used(&self, tile_name: &str) -> bool {
        self.used_tiles.contains(tile_name)
    }

    /// Conjunto de tiles ocupados.
    #[must_use]
    pub fn used_tiles(&self) -> &BTreeSet<String> {
        &self.used_tiles
    }

    /// Columnas con configuración capturada.
    #[must_use]
    pub fn configured_columns(&self) -> &BTreeSet<u8> {
        &self.configured_columns
    }

    /// Payloads efectivos como pares (FAR, bytes), en orden de FAR.
    pub fn effective_payloads(&self) -> impl Iterator<Item = (u32, &[u8])> {
        self.frames.iter().map(|(&far, payload)| (far, payload.as_slice()))
    }

    /// Vista de tramas para reconstrucción, si los payloads viajaron
    /// con el snapshot. None cuando solo se persistieron metadatos.
    #[must_use]
    pub fn frame_view(&self) -> Option<impl Iterator<Item = (u32, &[u8])>> {
        if self.frames.is_empty() {
            None
        } else {
            Some(self.effective_payloads())
        }
    }

    /// Copia sin payloads ni historia (persistencia de solo metadatos).
    #[must_use]
    pub fn without_frame_data(&self) -> Self {
        let mut stripped = self.clone();
        stripped.frames.clear();
        stripped.write_history.clear();
        stripped
    }

    /// Cantidad de tramas capturadas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// La línea base no capturó tramas.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// FARs con historia de más de una escritura.
    #[must_use]
    pub fn multi_write_far_count(&self) -> usize {
        self.write_history.values().filter(|history| history.len() > 1).count()
    }

    /**
     * Valida la integridad del snapshot: no vacío, payloads de 164
     * bytes, FARs decodificables contra la tabla de columnas.
     *
     * # Errors:
     * `EmptyBaseline` o `BaselineIntegrity` con las violaciones.
     */
    pub fn validate(&self) -> Result<(), DetectorError> {
        if self.frames.is_empty() {
            return Err(DetectorError::EmptyBaseline);
        }

        let mut violations = Vec::new();
        for (far_value, payload) in &self.frames {
            if payload.len() != FRAME_BYTE_COUNT {
                violations.push(format!(
                    "frame 0x{far_value:08X} carries {} bytes instead of {FRAME_BYTE_COUNT}",
                    payload.len()
                ));
            }
            if let Err(fault) = validate_far(&decode_far(*far_value)) {
                violations.push(format!("frame 0x{far_value:08X}: {fault}"));
            }
        }
        for (far_value, history) in &self.write_history {
            for (write_index, payload) in history.iter().enumerate() {
                if payload.len() != FRAME_BYTE_COUNT {
                    violations.push(format!(
                        "history 0x{far_value:08X} write #{write_index} carries {} bytes",
                        payload.len()
                    ));
                }
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(DetectorError::BaselineIntegrity { violations })
        }
    }

    // ----------------------------------------------------------------
    // Persistencia sellada
    // ----------------------------------------------------------------

    /**
     * Cristaliza el snapshot en disco: marca, versión, sello SHA-256
     * del cuerpo y cuerpo bincode.
     */
    #[instrument(skip(self, storage_path))]
    pub fn save<P: AsRef<Path>>(&self, storage_path: P) -> Result<(), DetectorError> {
        let path = storage_path.as_ref();
        let body = baseline_serialization_config().serialize(self)?;
        let seal: [u8; 32] = Sha256::digest(&body).into();

        let mut file = std::fs::File::create(path).map_err(|source| DetectorError::BaselineIo {
            path: path.display().to_string(),
            source,
        })?;
        let io_fault = |source: std::io::Error| DetectorError::BaselineIo {
            path: path.display().to_string(),
            source,
        };
        file.write_all(&BASELINE_MAGIC).map_err(io_fault)?;
        file.write_all(&BASELINE_FORMAT_VERSION.to_le_bytes()).map_err(io_fault)?;
        file.write_all(&seal).map_err(io_fault)?;
        file.write_all(&body).map_err(io_fault)?;

        info!(
            "💾 [BASELINE_SYNC]: {} crystallized with {} frames ({} bytes sealed)",
            self.baseline_id,
            self.frames.len(),
            body.len()
        );
        Ok(())
    }

    /**
     * Rehidrata un snapshot desde disco verificando marca, versión y
     * sello de integridad antes de decodificar el cuerpo.
     */
    #[instrument(skip(storage_path))]
    pub fn load<P: AsRef<Path>>(storage_path: P) -> Result<Self, DetectorError> {
        let path = storage_path.as_ref();
        let mut file = std::fs::File::open(path).map_err(|source| DetectorError::BaselineIo {
            path: path.display().to_string(),
            source,
        })?;
        let io_fault = |source: std::io::Error| DetectorError::BaselineIo {
            path: path.display().to_string(),
            source,
        };

        let mut magic = [0u8; 8];
        file.read_exact(&mut magic).map_err(io_fault)?;
        if magic != BASELINE_MAGIC {
            return Err(DetectorError::BaselineMagicMismatch);
        }

        let mut version_bytes = [0u8; 4];
        file.read_exact(&mut version_bytes).map_err(io_fault)?;
        let version = u32::from_le_bytes(version_bytes);
        if version != BASELINE_FORMAT_VERSION {
            return Err(DetectorError::BaselineVersionMismatch {
                found: version,
                expected: BASELINE_FORMAT_VERSION,
            });
        }

        let mut seal = [0u8; 32];
        file.read_exact(&mut seal).map_err(io_fault)?;

        let mut body = Vec::new();
        file.read_to_end(&mut body).map_err(io_fault)?;
        let digest: [u8; 32] = Sha256::digest(&body).into();
        if digest != seal {
            return Err(DetectorError::BaselineSealBroken);
        }

        let baseline: Self = baseline_serialization_config().deserialize(&body)?;
        info!(
            "📂 [BASELINE_HYDRATED]: {} with {} frames, seal verified",
            baseline.baseline_id,
            baseline.frames.len()
        );
        Ok(baseline)
    }

    /// Documento de metadatos para el sidecar JSON del operador.
    /// No porta payloads.
    #[must_use]
    pub fn metadata_document(&self) -> BaselineMetadata {
        BaselineMetadata {
            baseline_id: self.baseline_id.clone(),
            created_at: self.created_at.clone(),
            design_name: self.design_name.clone(),
            device_name: self.device_name.clone(),
            build_date: self.build_date.clone(),
            build_time: self.build_time.clone(),
            source_sha256: self.source_sha256.clone(),
            frame_count: self.frames.len(),
            configured_columns: self.configured_columns.iter().copied().collect(),
            block_type_counts: self
                .block_type_counts
                .iter()
                .map(|(code, count)| (code.to_string(), *count))
                .collect(),
            used_tile_count: self.used_tiles.len(),
            multi_write_far_count: self.multi_write_far_count(),
        }
    }
}

/// Sidecar de metadatos de una línea base (inspección del operador).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineMetadata {
    pub baseline_id: String,
    pub created_at: String,
    pub design_name: String,
    pub device_name: String,
    pub build_date: String,
    pub build_time: String,
    pub source_sha256: Option<String>,
    pub frame_count: usize,
    pub configured_columns: Vec<u8>,
    pub block_type_counts: BTreeMap<String, usize>,
    pub used_tile_count: usize,
    pub multi_write_far_count: usize,
}
