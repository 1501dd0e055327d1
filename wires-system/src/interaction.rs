//! Interface com a camada de interação/ferramentas
//!
//! O sistema de fios não decide qual ferramenta corta ou pulsa, nem se o
//! ator alcança o objeto: pergunta ao colaborador [`Interaction`].

use std::collections::{HashMap, HashSet};
use wires_core::{EntityId, ToolQuality};
use crate::events::PopupMessage;

/// Colaborador de interação (ferramentas, alcance, mãos)
pub trait Interaction {
    /// A ferramenta tem a qualidade pedida?
    fn has_quality(&self, tool: EntityId, quality: ToolQuality) -> bool;

    /// Toca o som de uso da ferramenta
    fn play_tool_sound(&mut self, _tool: EntityId) {}

    /// O ator alcança o objeto?
    fn is_reachable(&self, _actor: EntityId, _object: EntityId) -> bool {
        true
    }

    /// O ator tem mãos?
    fn has_hands(&self, _actor: EntityId) -> bool {
        true
    }

    /// Ferramenta na mão ativa do ator
    fn active_tool(&self, _actor: EntityId) -> Option<EntityId> {
        None
    }
}

/// Resultado de um pedido de ação sobre um fio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Comportamento invocado; `is_cut` é o estado do fio depois
    Dispatched { is_cut: bool },
    /// Pedido rejeitado com mensagem ao usuário
    Rejected(PopupMessage),
    /// Pedido ignorado (painel/fio/ferramenta inexistente)
    Ignored,
}

impl ActionOutcome {
    pub fn is_dispatched(&self) -> bool {
        matches!(self, ActionOutcome::Dispatched { .. })
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, ActionOutcome::Rejected(_))
    }
}

/// Resultado de usar uma ferramenta no objeto
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractOutcome {
    /// UI do painel aberta para o usuário
    UiOpened,
    /// Uso da chave de fenda iniciado; ao terminar, chamar `toggle_panel`
    ScrewingStarted { delay: f32 },
    /// Ferramenta irrelevante para o painel
    NotHandled,
}

/// Implementação em tabela de [`Interaction`] (simulação e testes)
#[derive(Debug, Clone, Default)]
pub struct StaticInteraction {
    qualities: HashMap<EntityId, HashSet<ToolQuality>>,
    held: HashMap<EntityId, EntityId>,
    handless: HashSet<EntityId>,
    unreachable: HashSet<(EntityId, EntityId)>,
    tool_sounds: Vec<EntityId>,
}

impl StaticInteraction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra ferramenta com suas qualidades
    pub fn with_tool(mut self, tool: EntityId, qualities: impl IntoIterator<Item = ToolQuality>) -> Self {
        self.qualities.entry(tool).or_default().extend(qualities);
        self
    }

    /// Coloca a ferramenta na mão ativa do ator
    pub fn hold(&mut self, actor: EntityId, tool: EntityId) {
        self.held.insert(actor, tool);
    }

    /// Esvazia a mão ativa do ator
    pub fn drop_held(&mut self, actor: EntityId) {
        self.held.remove(&actor);
    }

    /// Marca ator sem mãos
    pub fn remove_hands(&mut self, actor: EntityId) {
        self.handless.insert(actor);
    }

    /// Marca objeto fora de alcance para o ator
    pub fn block_reach(&mut self, actor: EntityId, object: EntityId) {
        self.unreachable.insert((actor, object));
    }

    /// Ferramentas que tocaram som, em ordem
    pub fn tool_sounds(&self) -> &[EntityId] {
        &self.tool_sounds
    }
}

impl Interaction for StaticInteraction {
    fn has_quality(&self, tool: EntityId, quality: ToolQuality) -> bool {
        self.qualities
            .get(&tool)
            .is_some_and(|q| q.contains(&quality))
    }

    fn play_tool_sound(&mut self, tool: EntityId) {
        self.tool_sounds.push(tool);
    }

    fn is_reachable(&self, actor: EntityId, object: EntityId) -> bool {
        !self.unreachable.contains(&(actor, object))
    }

    fn has_hands(&self, actor: EntityId) -> bool {
        !self.handless.contains(&actor)
    }

    fn active_tool(&self, actor: EntityId) -> Option<EntityId> {
        self.held.get(&actor).copied()
    }
}
