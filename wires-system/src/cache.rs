//! Cache de layouts de fios
//!
//! Mapeia identificador de layout → [`WireLayout`] já gerado. Entradas vivem
//! até o fim da rodada (`clear`). Não há despejo.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use wires_core::WireLayout;

/// Cache de layouts compartilhados (flyweight)
#[derive(Debug, Default)]
pub struct LayoutCache {
    layouts: HashMap<String, Arc<WireLayout>>,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layout em cache para `id`
    pub fn get(&self, id: &str) -> Option<Arc<WireLayout>> {
        self.layouts.get(id).cloned()
    }

    /// Guarda layout. Retorna `true` se substituiu um existente.
    pub fn put(&mut self, id: impl Into<String>, layout: WireLayout) -> bool {
        let id = id.into();
        debug!(layout_id = %id, wires = layout.len(), "caching wire layout");
        self.layouts.insert(id, Arc::new(layout)).is_some()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.layouts.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    /// Limpa todos os layouts (reinício de rodada)
    pub fn clear(&mut self) {
        self.layouts.clear();
    }
}
