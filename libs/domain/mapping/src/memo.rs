// [libs/domain/mapping/src/memo.rs]
/*!
 * =================================================================
 * APARATO: BOUNDED MEMO CACHE (V3.0)
 * CLASIFICACIÓN: DOMAIN MAPPING (ESTRATO L2)
 * RESPONSABILIDAD: MEMOIZACIÓN ACOTADA POR INSTANCIA
 *
 * Mapa acotado propiedad del mapper, nunca global: al alcanzar la
 * capacidad expulsa la entrada más antigua. Suficiente para los FARs
 * calientes de una corrida de detección.
 * =================================================================
 */

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// Memo FIFO acotado.
#[derive(Debug)]
pub struct BoundedMemo<K, V> {
    capacity: usize,
    entries: HashMap<K, V>,
    insertion_order: VecDeque<K>,
}

impl<K: Eq + Hash + Clone, V: Clone> BoundedMemo<K, V> {
    /// Crea un memo con la capacidad dada (mínimo 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            insertion_order: VecDeque::new(),
        }
    }

    /// Valor memoizado para la clave, si existe.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<V> {
        self.entries.get(key).cloned()
    }

    /// Inserta expulsando la entrada más antigua si el memo está lleno.
    pub fn insert(&mut self, key: K, value: V) {
        if self.entries.contains_key(&key) {
            self.entries.insert(key, value);
            return;
        }
        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.insertion_order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        self.insertion_order.push_back(key.clone());
        self.entries.insert(key, value);
    }

    /// Entradas residentes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// El memo está vacío.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
