// [libs/core/bitstream/src/walker.rs]
/*!
 * =================================================================
 * APARATO: FAR COLUMN WALKER (V3.1 - FUSE SHIELDED)
 * CLASIFICACIÓN: CORE BITSTREAM (ESTRATO L1)
 * RESPONSABILIDAD: AVANCE DEL FAR DURANTE RÁFAGAS FDRI
 *
 * Tras cada bloque de 41 palabras el FAR avanza: minor, luego la
 * siguiente columna del mismo bloque en el orden fijo del dispositivo,
 * luego el siguiente bloque poblado, y como último recurso alterna la
 * mitad del dado y reinicia. Un fusible de 4N + 1000 iteraciones
 * acota la marcha; agotarlo es un bitstream malformado.
 * =================================================================
 */

use centinela_core_fabric::{
    columns_for_block, encode_far, next_populated_block, walker_minor_range, BlockType, FarFields,
};
use tracing::warn;

use crate::errors::BitstreamError;

/// Margen fijo del fusible de iteraciones sobre el 4N proporcional.
const WALKER_FUSE_MARGIN: usize = 1000;

/// Estado de marcha del FAR a lo largo de una ráfaga FDRI.
pub struct FarWalker {
    block: BlockType,
    top_bottom: u8,
    column_order: &'static [u8],
    column_index: usize,
    column: u8,
    minor: u32,
    fuse: usize,
}

impl FarWalker {
    /**
     * Arranca la marcha desde los campos establecidos por la última
     * escritura al registro FAR.
     *
     * Una columna fuera del orden de su bloque se reubica a la primera
     * columna del bloque (con advertencia); un bloque sin columnas en
     * este dispositivo es fatal.
     */
    pub fn start(fields: &FarFields, expected_frames: usize) -> Result<Self, BitstreamError> {
        let block = fields
            .block_type()
            .filter(|block| !columns_for_block(*block).is_empty())
            .ok_or(BitstreamError::WalkerStart { block_code: fields.block_code })?;

        let column_order = columns_for_block(block);
        let column_index = match column_order.iter().position(|&column| column == fields.major) {
            Some(index) => index,
            None => {
                warn!(
                    "⚠️ [WALKER_RELOCATE]: column {} is not in the {} walk order; restarting at column {}",
                    fields.major,
                    block.name(),
                    column_order[0]
                );
                0
            }
        };

        Ok(Self {
            block,
            top_bottom: fields.top_bottom & 0b1,
            column_order,
            column_index,
            column: column_order[column_index],
            minor: fields.minor,
            fuse: expected_frames * 4 + WALKER_FUSE_MARGIN,
        })
    }

    /// FAR de la posición actual de la marcha.
    #[must_use]
    pub fn current_far(&self) -> u32 {
        encode_far(self.block.code(), self.top_bottom, self.column, self.minor)
    }

    /**
     * Avanza una posición. Consume una unidad del fusible.
     *
     * # Errors:
     * `WalkerOverflow` cuando el fusible se agota antes de completar
     * la ráfaga (`created` / `expected` describen el progreso).
     */
    pub fn advance(&mut self, created: usize, expected: usize) -> Result<(), BitstreamError> {
        if self.fuse == 0 {
            return Err(BitstreamError::WalkerOverflow { created, expected });
        }
        self.fuse -= 1;

        let range = walker_minor_range(self.block, self.column)
            .unwrap_or(0..0);

        let next_minor = self.minor + 1;
        if next_minor < range.end {
            self.minor = next_minor;
            return Ok(());
        }

        // Siguiente columna del mismo bloque.
        self.column_index += 1;
        if self.column_index < self.column_order.len() {
            self.column = self.column_order[self.column_index];
            self.minor = self.start_minor();
            return Ok(());
        }

        // Siguiente bloque poblado.
        if let Some(next_block) = next_populated_block(self.block) {
            self.enter_block(next_block);
            return Ok(());
        }

        // Mitad opuesta del dado, reinicio en el bloque más bajo.
        self.top_bottom ^= 1;
        self.enter_block(BlockType::Clb);
        Ok(())
    }

    fn enter_block(&mut self, block: BlockType) {
        self.block = block;
        self.column_order = columns_for_block(block);
        self.column_index = 0;
        self.column = self.column_order[0];
        self.minor = self.start_minor();
    }

    fn start_minor(&self) -> u32 {
        walker_minor_range(self.block, self.column)
            .map(|range| range.start)
            .unwrap_or(0)
    }
}
