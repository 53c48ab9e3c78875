// [libs/core/bitstream/src/loader.rs]
/*!
 * =================================================================
 * APARATO: BITSTREAM FILE LOADER (V3.1 - CHAIN OF CUSTODY)
 * CLASIFICACIÓN: CORE BITSTREAM (ESTRATO L1)
 * RESPONSABILIDAD: ARCHIVO .BIT -> BITSTREAM CARGADO + PROCEDENCIA
 * =================================================================
 */

use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{info, instrument};

use crate::errors::BitstreamError;
use crate::lexer::BitstreamLexer;
use crate::loaded::{BitstreamInfo, LoadedBitstream};

/// Cargador de contenedores con sello de procedencia SHA-256.
#[derive(Debug, Default)]
pub struct BitstreamLoader;

impl BitstreamLoader {
    /**
     * Carga y lexa un contenedor desde disco.
     *
     * # Errors:
     * Fallos de I/O o cualquier fallo fatal del léxico.
     */
    #[instrument(skip(self, container_path))]
    pub fn load<P: AsRef<Path>>(&self, container_path: P) -> Result<LoadedBitstream, BitstreamError> {
        let path = container_path.as_ref();
        let container = std::fs::read(path)?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        let digest = hex::encode(Sha256::digest(&container));

        let loaded = self.load_bytes(&filename, &container, Some(digest))?;
        info!(
            "📦 [BITSTREAM_LOADED]: {} -> {} writes, {} unique FARs",
            filename,
            loaded.info.frame_write_count,
            loaded.info.unique_far_count
        );
        Ok(loaded)
    }

    /// Lexa un contenedor ya residente en memoria.
    pub fn load_bytes(
        &self,
        identifier: &str,
        container: &[u8],
        sha256: Option<String>,
    ) -> Result<LoadedBitstream, BitstreamError> {
        let (header, writes) = BitstreamLexer::lex(container)?;
        let info =
            BitstreamInfo::from_header(identifier, &header, container.len() as u64, sha256);
        LoadedBitstream::assemble(info, writes)
    }

    /**
     * Comparación estructural rápida de dos contenedores, sin
     * detector: conjuntos de FARs y tramas con datos divergentes.
     */
    #[instrument(skip(self, golden_path, suspect_path))]
    pub fn compare_quick<P: AsRef<Path>>(
        &self,
        golden_path: P,
        suspect_path: P,
    ) -> Result<QuickComparison, BitstreamError> {
        let golden = self.load(golden_path)?;
        let suspect = self.load(suspect_path)?;
        Ok(QuickComparison::between(&golden, &suspect))
    }
}

/// Tope de FARs divergentes muestreados en la comparación rápida.
const CHANGED_FAR_SAMPLE_LIMIT: usize = 20;

/// Resumen de una comparación estructural rápida.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickComparison {
    pub golden_id: String,
    pub suspect_id: String,
    pub frames_in_golden: usize,
    pub frames_in_suspect: usize,
    pub common_frames: usize,
    pub only_in_golden: usize,
    pub only_in_suspect: usize,
    pub data_differences: usize,
    /// Primeros FARs divergentes, en notación hexadecimal.
    pub changed_fars: Vec<String>,
}

impl QuickComparison {
    /// Calcula el resumen entre dos bitstreams ya cargados.
    #[must_use]
    pub fn between(golden: &LoadedBitstream, suspect: &LoadedBitstream) -> Self {
        let golden_fars: std::collections::BTreeSet<u32> = golden.all_fars().into_iter().collect();
        let suspect_fars: std::collections::BTreeSet<u32> =
            suspect.all_fars().into_iter().collect();

        let mut changed: Vec<u32> = golden_fars
            .intersection(&suspect_fars)
            .filter(|&&far| golden.payload(far) != suspect.payload(far))
            .copied()
            .collect();
        changed.sort_unstable();

        Self {
            golden_id: golden.info.filename.clone(),
            suspect_id: suspect.info.filename.clone(),
            frames_in_golden: golden_fars.len(),
            frames_in_suspect: suspect_fars.len(),
            common_frames: golden_fars.intersection(&suspect_fars).count(),
            only_in_golden: golden_fars.difference(&suspect_fars).count(),
            only_in_suspect: suspect_fars.difference(&golden_fars).count(),
            data_differences: changed.len(),
            changed_fars: changed
                .iter()
                .take(CHANGED_FAR_SAMPLE_LIMIT)
                .map(|far| format!("0x{far:08X}"))
                .collect(),
        }
    }
}
