//! Estado de um painel de fios
//!
//! [`PanelConfig`] é a declaração (o que vem do mapa/protótipo);
//! [`WiresComponent`] é o estado vivo mantido pelo sistema.

use std::collections::BTreeSet;
use serde::{Deserialize, Serialize};
use wires_core::{BehaviorSlot, EntityId, Wire, WireId, WireStateStore};
use crate::behavior::BehaviorSet;
use crate::generator::GeneratedWires;
use crate::snapshot::WiresSnapshot;

fn default_true() -> bool {
    true
}

/// Declaração de um painel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Template de layout (também chave do cache)
    #[serde(default)]
    pub layout_id: Option<String>,

    /// Comportamentos ad hoc (usados quando não há template)
    #[serde(default)]
    pub wire_actions: Option<Vec<String>>,

    /// Fios inertes do modo ad hoc
    #[serde(default)]
    pub dummy_wires: usize,

    /// Nome mostrado na UI
    #[serde(default)]
    pub board_name: Option<String>,

    /// Número de série (gerado no map-init se ausente)
    #[serde(default)]
    pub serial_number: Option<String>,

    /// Semente exibida ao cliente (0 = gerar no map-init)
    #[serde(default)]
    pub wire_seed: i32,

    #[serde(default)]
    pub panel_open: bool,

    #[serde(default = "default_true")]
    pub panel_visible: bool,

    #[serde(default = "default_true")]
    pub powered: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            layout_id: None,
            wire_actions: None,
            dummy_wires: 0,
            board_name: None,
            serial_number: None,
            wire_seed: 0,
            panel_open: false,
            panel_visible: true,
            powered: true,
        }
    }
}

impl PanelConfig {
    /// Painel definido por template
    pub fn with_layout(layout_id: impl Into<String>) -> Self {
        Self {
            layout_id: Some(layout_id.into()),
            ..Self::default()
        }
    }

    /// Painel com lista ad hoc de comportamentos
    pub fn ad_hoc<S: Into<String>>(wire_actions: impl IntoIterator<Item = S>, dummy_wires: usize) -> Self {
        Self {
            wire_actions: Some(wire_actions.into_iter().map(Into::into).collect()),
            dummy_wires,
            ..Self::default()
        }
    }

    pub fn with_board_name(mut self, name: impl Into<String>) -> Self {
        self.board_name = Some(name.into());
        self
    }

    /// Painel já aberto
    pub fn opened(mut self) -> Self {
        self.panel_open = true;
        self
    }
}

/// Estado vivo de um painel
#[derive(Debug)]
pub struct WiresComponent {
    pub(crate) layout_id: Option<String>,
    pub(crate) board_name: Option<String>,
    pub(crate) serial_number: Option<String>,
    pub(crate) wire_seed: i32,
    pub(crate) panel_open: bool,
    pub(crate) panel_visible: bool,
    pub(crate) powered: bool,
    pub(crate) wires: Vec<Wire>,
    pub(crate) behaviors: BehaviorSet,
    pub(crate) store: WireStateStore,
    pub(crate) last_snapshot: Option<WiresSnapshot>,
    pub(crate) ui_viewers: BTreeSet<EntityId>,
}

impl WiresComponent {
    pub(crate) fn new(config: PanelConfig, generated: GeneratedWires) -> Self {
        Self {
            layout_id: config.layout_id,
            board_name: config.board_name,
            serial_number: config.serial_number,
            wire_seed: config.wire_seed,
            panel_open: config.panel_open,
            panel_visible: config.panel_visible,
            powered: config.powered,
            wires: generated.wires,
            behaviors: generated.behaviors,
            store: WireStateStore::new(),
            last_snapshot: None,
            ui_viewers: BTreeSet::new(),
        }
    }

    pub fn layout_id(&self) -> Option<&str> {
        self.layout_id.as_deref()
    }

    pub fn board_name(&self) -> Option<&str> {
        self.board_name.as_deref()
    }

    pub fn serial_number(&self) -> Option<&str> {
        self.serial_number.as_deref()
    }

    pub fn wire_seed(&self) -> i32 {
        self.wire_seed
    }

    pub fn is_panel_open(&self) -> bool {
        self.panel_open
    }

    pub fn is_panel_visible(&self) -> bool {
        self.panel_visible
    }

    pub fn is_powered(&self) -> bool {
        self.powered
    }

    /// Fios em ordem de posição
    pub fn wires(&self) -> &[Wire] {
        &self.wires
    }

    /// Fio por id (id = posição)
    pub fn wire(&self, id: WireId) -> Option<&Wire> {
        self.wires.get(id.index()).filter(|w| w.id == id)
    }

    pub(crate) fn wire_mut(&mut self, id: WireId) -> Option<&mut Wire> {
        self.wires.get_mut(id.index()).filter(|w| w.id == id)
    }

    /// Nome de tipo do comportamento ligado ao slot (None para dummy)
    pub fn behavior_name(&self, slot: BehaviorSlot) -> Option<&str> {
        self.behaviors.slot_name(slot)
    }

    pub fn store(&self) -> &WireStateStore {
        &self.store
    }

    /// Último snapshot publicado
    pub fn last_snapshot(&self) -> Option<&WiresSnapshot> {
        self.last_snapshot.as_ref()
    }

    /// Atores com a UI aberta
    pub fn ui_viewers(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.ui_viewers.iter().copied()
    }

    /// Painel aberto e visível
    pub fn is_panel_exposed(&self) -> bool {
        self.panel_open && self.panel_visible
    }

    /// Monta o snapshot a partir do estado atual (status já atualizados)
    pub(crate) fn build_snapshot(&self) -> WiresSnapshot {
        WiresSnapshot {
            wires: self.wires.iter().map(Wire::to_client).collect(),
            statuses: self.store.status_entries(),
            board_name: self.board_name.clone(),
            serial_number: self.serial_number.clone(),
            wire_seed: self.wire_seed,
        }
    }
}
