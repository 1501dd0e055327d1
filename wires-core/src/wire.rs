//! Fio individual do painel

use serde::{Deserialize, Serialize};
use crate::types::{EntityId, WireColor, WireId, WireLetter};

/// Índice de um comportamento dentro do conjunto do painel
pub type BehaviorIndex = usize;

/// Comportamento ligado a um fio.
///
/// `Dummy` é o comportamento embutido, inerte; `Action` aponta para a única
/// instância viva daquele tipo de comportamento no painel (compartilhada por
/// todos os fios do mesmo tipo).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BehaviorSlot {
    #[default]
    Dummy,
    Action(BehaviorIndex),
}

impl BehaviorSlot {
    pub fn is_dummy(self) -> bool {
        matches!(self, BehaviorSlot::Dummy)
    }
}

/// Um slot do painel: cor, letra, estado de corte e comportamento
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wire {
    /// Entidade dona do painel
    pub owner: EntityId,
    /// Fio cortado?
    pub is_cut: bool,
    /// Identificador opaco exposto ao cliente
    pub id: WireId,
    /// Cor do fio
    pub color: WireColor,
    /// Letra grega sob o fio
    pub letter: WireLetter,
    /// Comportamento ligado
    pub behavior: BehaviorSlot,
}

impl Wire {
    /// Cria fio intacto
    pub fn new(owner: EntityId, id: WireId, color: WireColor, letter: WireLetter, behavior: BehaviorSlot) -> Self {
        Self {
            owner,
            is_cut: false,
            id,
            color,
            letter,
            behavior,
        }
    }

    /// Visão do cliente: apenas id, corte, cor e letra
    pub fn to_client(&self) -> ClientWire {
        ClientWire {
            id: self.id,
            cut: self.is_cut,
            color: self.color,
            letter: self.letter,
        }
    }
}

/// Fio como visto pelo observador remoto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientWire {
    pub id: WireId,
    pub cut: bool,
    pub color: WireColor,
    pub letter: WireLetter,
}
