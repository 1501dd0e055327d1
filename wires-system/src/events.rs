//! Sistema de eventos do painel de fios
//!
//! Tudo que sai do subsistema para colaboradores externos (UI remota,
//! aparência, áudio, popups) passa por aqui como [`WiresEvent`].

use std::collections::{HashMap, VecDeque};
use std::fmt;
use serde::{Deserialize, Serialize};
use wires_core::EntityId;
use crate::snapshot::WiresSnapshot;

/// Mensagem mostrada ao usuário quando um pedido é rejeitado
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PopupMessage {
    /// Ator sem mãos
    NoHands,
    /// Painel fora de alcance
    CannotReach,
    /// Cortar/emendar sem alicate
    NeedWirecutters,
    /// Pulsar sem multitool
    NeedMultitool,
    /// Pulsar fio cortado
    CannotPulseCutWire,
    /// Painel fechado
    PanelClosed,
}

impl PopupMessage {
    /// Chave de localização
    pub fn loc_key(self) -> &'static str {
        match self {
            PopupMessage::NoHands => "wires-component-ui-on-receive-message-no-hands",
            PopupMessage::CannotReach => "wires-component-ui-on-receive-message-cannot-reach",
            PopupMessage::NeedWirecutters => "wires-component-ui-on-receive-message-need-wirecutters",
            PopupMessage::NeedMultitool => "wires-component-ui-on-receive-message-need-multitool",
            PopupMessage::CannotPulseCutWire => "wires-component-ui-on-receive-message-cannot-pulse-cut-wire",
            PopupMessage::PanelClosed => "wires-component-ui-on-receive-message-panel-closed",
        }
    }
}

/// Sons emitidos pelo painel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WireSound {
    ScrewdriverOpen,
    ScrewdriverClose,
    Pulse,
}

/// Evento emitido pelo sistema de fios
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WiresEvent {
    /// Novo snapshot do painel
    StateUpdated {
        object: EntityId,
        snapshot: WiresSnapshot,
    },
    /// Rejeição mostrada ao ator
    Popup {
        object: EntityId,
        actor: EntityId,
        message: PopupMessage,
    },
    /// Painel aberto e visível (sinal para a camada de aparência)
    AppearanceChanged {
        object: EntityId,
        panel_open_visible: bool,
    },
    /// Som posicional no objeto
    Sound {
        object: EntityId,
        sound: WireSound,
    },
    /// UI do painel aberta para um ator
    UiOpened {
        object: EntityId,
        actor: EntityId,
    },
    /// UI do painel fechada para todos
    UiClosed {
        object: EntityId,
    },
}

impl WiresEvent {
    /// Objeto de origem
    pub fn object(&self) -> EntityId {
        match self {
            WiresEvent::StateUpdated { object, .. }
            | WiresEvent::Popup { object, .. }
            | WiresEvent::AppearanceChanged { object, .. }
            | WiresEvent::Sound { object, .. }
            | WiresEvent::UiOpened { object, .. }
            | WiresEvent::UiClosed { object } => *object,
        }
    }
}

/// Handler de eventos (callback)
pub type EventHandler = Box<dyn Fn(&WiresEvent)>;

/// Filtro de eventos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventFilter {
    /// Todos os eventos
    All,
    /// Eventos de um objeto específico
    Object(EntityId),
    /// Snapshots
    Snapshots,
    /// Popups de rejeição
    Popups,
    /// Mudanças de aparência
    Appearance,
    /// Sons
    Sounds,
    /// Abertura/fechamento de UI
    Ui,
}

impl EventFilter {
    /// Verifica se um evento passa pelo filtro
    pub fn matches(&self, event: &WiresEvent) -> bool {
        match (self, event) {
            (EventFilter::All, _) => true,
            (EventFilter::Object(id), event) => event.object() == *id,
            (EventFilter::Snapshots, WiresEvent::StateUpdated { .. }) => true,
            (EventFilter::Popups, WiresEvent::Popup { .. }) => true,
            (EventFilter::Appearance, WiresEvent::AppearanceChanged { .. }) => true,
            (EventFilter::Sounds, WiresEvent::Sound { .. }) => true,
            (EventFilter::Ui, WiresEvent::UiOpened { .. } | WiresEvent::UiClosed { .. }) => true,
            _ => false,
        }
    }
}

/// Bus de eventos (single-thread)
pub struct EventBus {
    /// Handlers registrados por filtro
    handlers: HashMap<EventFilter, Vec<EventHandler>>,
    /// Histórico de eventos (limitado)
    history: VecDeque<WiresEvent>,
    /// Tamanho máximo do histórico
    max_history: usize,
}

impl EventBus {
    /// Cria novo bus de eventos
    pub fn new() -> Self {
        Self::with_history(100)
    }

    /// Cria com tamanho de histórico customizado
    pub fn with_history(max_history: usize) -> Self {
        Self {
            handlers: HashMap::new(),
            history: VecDeque::new(),
            max_history,
        }
    }

    /// Registra handler para um filtro
    pub fn subscribe<F>(&mut self, filter: EventFilter, handler: F)
    where
        F: Fn(&WiresEvent) + 'static,
    {
        self.handlers
            .entry(filter)
            .or_default()
            .push(Box::new(handler));
    }

    /// Remove todos os handlers de um filtro
    pub fn unsubscribe(&mut self, filter: &EventFilter) {
        self.handlers.remove(filter);
    }

    /// Emite um evento
    pub fn emit(&mut self, event: WiresEvent) {
        for (filter, handler_list) in self.handlers.iter() {
            if filter.matches(&event) {
                for handler in handler_list {
                    handler(&event);
                }
            }
        }

        if self.max_history == 0 {
            return;
        }
        self.history.push_back(event);
        while self.history.len() > self.max_history {
            self.history.pop_front();
        }
    }

    /// Histórico de eventos (mais antigo primeiro)
    pub fn history(&self) -> impl Iterator<Item = &WiresEvent> {
        self.history.iter()
    }

    /// Limpa histórico
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Conta handlers registrados
    pub fn handler_count(&self) -> usize {
        self.handlers.values().map(|v| v.len()).sum()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("max_history", &self.max_history)
            .field("history_len", &self.history.len())
            .field("handler_count", &self.handler_count())
            .finish()
    }
}
