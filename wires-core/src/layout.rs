//! Layout de fios (flyweight)
//!
//! Um layout fixa, para cada entrada da lista de fios (índice original),
//! a letra, a cor e a posição no painel. Objetos que compartilham o mesmo
//! identificador de layout exibem o mesmo padrão, mas a ligação
//! fio → comportamento continua sendo calculada por instância.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use crate::types::{WireColor, WireLetter};

/// Especificação de um fio no layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireData {
    pub letter: WireLetter,
    pub color: WireColor,
    pub position: usize,
}

impl WireData {
    pub fn new(letter: WireLetter, color: WireColor, position: usize) -> Self {
        Self { letter, color, position }
    }
}

/// Layout imutável: índice original → (letra, cor, posição)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WireLayout {
    entries: BTreeMap<usize, WireData>,
}

impl WireLayout {
    pub fn new(entries: BTreeMap<usize, WireData>) -> Self {
        Self { entries }
    }

    /// Especificação da entrada `index`
    pub fn get(&self, index: usize) -> Option<&WireData> {
        self.entries.get(&index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(usize, WireData)> for WireLayout {
    fn from_iter<I: IntoIterator<Item = (usize, WireData)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
