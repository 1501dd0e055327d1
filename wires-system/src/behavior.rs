//! Protocolo de comportamento de fio
//!
//! Cada tipo de comportamento implementa [`WireAction`]. Um painel tem
//! exatamente uma instância viva por tipo, compartilhada por todos os fios
//! daquele tipo; o fio guarda apenas um [`BehaviorSlot`] apontando para ela.
//!
//! ```text
//!   Wire.behavior ──► BehaviorSlot::Dummy        (embutido, inerte)
//!                 └─► BehaviorSlot::Action(i) ──► BehaviorSet[i]: Box<dyn WireAction>
//! ```
//!
//! Comportamentos nunca tocam o painel diretamente: recebem um
//! [`ActionContext`] com o store de estado do dono e acesso ao registro de
//! ações temporizadas.

use std::collections::HashMap;
use std::fmt;
use tracing::debug;
use wires_core::{
    BehaviorIndex, BehaviorSlot, EntityId, FromStateValue, StateKey, StateValue,
    StatusKey, StatusLightData, Wire, WireId, WireStateStore, WiresError, WiresResult,
};
use crate::timed::{TimedActionRegistry, TimedOutcome};

// ═══════════════════════════════════════════════════════════════════════════════
// CONTEXTO
// ═══════════════════════════════════════════════════════════════════════════════

/// Callback de conclusão de ação temporizada
pub type FinishCallback = Box<dyn FnOnce(&mut ActionContext<'_>, &Wire, TimedOutcome)>;

/// Payload guardado no registro de ações temporizadas
pub struct PendingWireAction {
    /// Fio ligado à ação (o callback recebe o estado atual dele)
    pub wire: WireId,
    pub on_finish: FinishCallback,
}

impl fmt::Debug for PendingWireAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingWireAction")
            .field("wire", &self.wire)
            .finish_non_exhaustive()
    }
}

/// Registro de ações temporizadas do sistema de fios
pub type WireTimers = TimedActionRegistry<PendingWireAction>;

/// Visão que um comportamento tem do painel dono
pub struct ActionContext<'a> {
    owner: EntityId,
    powered: bool,
    store: &'a mut WireStateStore,
    timers: &'a mut WireTimers,
}

impl<'a> ActionContext<'a> {
    pub fn new(owner: EntityId, powered: bool, store: &'a mut WireStateStore, timers: &'a mut WireTimers) -> Self {
        Self {
            owner,
            powered,
            store,
            timers,
        }
    }

    /// Entidade dona do painel
    pub fn owner(&self) -> EntityId {
        self.owner
    }

    /// Painel alimentado?
    pub fn is_powered(&self) -> bool {
        self.powered
    }

    pub fn get<T: FromStateValue>(&self, key: &StateKey) -> Option<T> {
        self.store.get(key)
    }

    /// Grava valor; `false` se igual ao atual
    pub fn set(&mut self, key: StateKey, value: impl Into<StateValue>) -> bool {
        self.store.set(key, value)
    }

    pub fn has(&self, key: &StateKey) -> bool {
        self.store.has(key)
    }

    pub fn remove(&mut self, key: &StateKey) -> Option<StateValue> {
        self.store.remove(key)
    }

    /// Grava luz de status (publicada no próximo snapshot)
    pub fn set_status(&mut self, key: StatusKey, status: StatusLightData) -> bool {
        self.store.set_status(key, status)
    }

    pub fn status(&self, key: &StatusKey) -> Option<&StatusLightData> {
        self.store.status(key)
    }

    /// Agenda ação temporizada para o dono. Não faz nada (retorna `false`)
    /// se já houver uma pendente com a mesma chave.
    pub fn start_timed_action<F>(&mut self, delay: f32, key: StateKey, wire: &Wire, on_finish: F) -> bool
    where
        F: FnOnce(&mut ActionContext<'_>, &Wire, TimedOutcome) + 'static,
    {
        self.timers.start(
            self.owner,
            delay,
            key,
            PendingWireAction {
                wire: wire.id,
                on_finish: Box::new(on_finish),
            },
        )
    }

    /// Cancela ação pendente; o callback recebe `Cancelled` no próximo tick
    pub fn cancel_timed_action(&mut self, key: &StateKey) -> bool {
        self.timers.cancel(self.owner, key)
    }

    pub fn is_timed_action_pending(&self, key: &StateKey) -> bool {
        self.timers.is_pending(self.owner, key)
    }
}

impl fmt::Debug for ActionContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionContext")
            .field("owner", &self.owner)
            .field("powered", &self.powered)
            .finish_non_exhaustive()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PROTOCOLO
// ═══════════════════════════════════════════════════════════════════════════════

/// Comportamento plugável de um fio
pub trait WireAction: fmt::Debug {
    /// Chave sob a qual a luz de status é publicada
    fn status_key(&self) -> Option<StatusKey> {
        None
    }

    /// Chamado uma vez, antes de qualquer `bind`
    fn initialize(&mut self) {}

    /// Liga o fio ao comportamento. `occurrence` conta, a partir de 1, os
    /// fios deste tipo em ordem de posição. `false` rebaixa o fio a dummy.
    fn bind(&mut self, _wire: &Wire, _occurrence: usize) -> bool {
        true
    }

    /// Corte. `true` confirma (o fio passa a cortado).
    fn cut(&mut self, ctx: &mut ActionContext<'_>, actor: EntityId, wire: &Wire) -> bool;

    /// Emenda. `true` confirma (o fio passa a intacto).
    fn mend(&mut self, ctx: &mut ActionContext<'_>, actor: EntityId, wire: &Wire) -> bool;

    /// Pulso (nunca chamado em fio cortado)
    fn pulse(&mut self, ctx: &mut ActionContext<'_>, actor: EntityId, wire: &Wire);

    /// Atualização periódica (mudança de energia)
    fn update(&mut self, _ctx: &mut ActionContext<'_>, _wire: &Wire) {}

    /// Luz de status atual
    fn status_light(&self, _ctx: &ActionContext<'_>, _wire: &Wire) -> Option<StatusLightData> {
        None
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// REGISTRO DE TIPOS
// ═══════════════════════════════════════════════════════════════════════════════

/// Construtor de comportamento
pub type BehaviorFactory = Box<dyn Fn() -> Box<dyn WireAction>>;

/// Registro nome de tipo → construtor
#[derive(Default)]
pub struct BehaviorRegistry {
    factories: HashMap<String, BehaviorFactory>,
}

impl BehaviorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra construtor para um nome de tipo
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> WiresResult<()>
    where
        F: Fn() -> Box<dyn WireAction> + 'static,
    {
        let name = name.into();
        if self.factories.contains_key(&name) {
            return Err(WiresError::BehaviorAlreadyRegistered(name));
        }
        debug!(behavior = %name, "registering wire behavior");
        self.factories.insert(name, Box::new(factory));
        Ok(())
    }

    /// Registra tipo construído por `Default`
    pub fn register_default<T>(&mut self, name: impl Into<String>) -> WiresResult<()>
    where
        T: WireAction + Default + 'static,
    {
        self.register(name, || Box::new(T::default()) as Box<dyn WireAction>)
    }

    /// Instancia comportamento pelo nome
    pub fn create(&self, name: &str) -> WiresResult<Box<dyn WireAction>> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| WiresError::UnknownBehavior(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Nomes registrados, ordenados
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for BehaviorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorRegistry")
            .field("names", &self.names())
            .finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONJUNTO POR PAINEL
// ═══════════════════════════════════════════════════════════════════════════════

/// Instâncias vivas de comportamento de um painel (uma por tipo)
#[derive(Debug, Default)]
pub struct BehaviorSet {
    entries: Vec<(String, Box<dyn WireAction>)>,
}

impl BehaviorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Índice da instância do tipo `name`
    pub fn index_of(&self, name: &str) -> Option<BehaviorIndex> {
        self.entries.iter().position(|(n, _)| n == name)
    }

    /// Adiciona instância, devolvendo seu índice
    pub fn push(&mut self, name: impl Into<String>, action: Box<dyn WireAction>) -> BehaviorIndex {
        self.entries.push((name.into(), action));
        self.entries.len() - 1
    }

    /// Nome de tipo da instância
    pub fn name(&self, index: BehaviorIndex) -> Option<&str> {
        self.entries.get(index).map(|(n, _)| n.as_str())
    }

    /// Nome de tipo por trás de um slot (`None` para dummy)
    pub fn slot_name(&self, slot: BehaviorSlot) -> Option<&str> {
        match slot {
            BehaviorSlot::Dummy => None,
            BehaviorSlot::Action(index) => self.name(index),
        }
    }

    pub fn get(&self, index: BehaviorIndex) -> Option<&dyn WireAction> {
        self.entries.get(index).map(|(_, a)| a.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn action_mut(&mut self, slot: BehaviorSlot) -> Option<&mut Box<dyn WireAction>> {
        match slot {
            BehaviorSlot::Dummy => None,
            BehaviorSlot::Action(index) => self.entries.get_mut(index).map(|(_, a)| a),
        }
    }

    /// Inicializa todas as instâncias
    pub fn initialize_all(&mut self) {
        for (_, action) in self.entries.iter_mut() {
            action.initialize();
        }
    }

    pub fn bind(&mut self, wire: &Wire, occurrence: usize) -> bool {
        match self.action_mut(wire.behavior) {
            Some(action) => action.bind(wire, occurrence),
            None => true,
        }
    }

    pub fn cut(&mut self, ctx: &mut ActionContext<'_>, actor: EntityId, wire: &Wire) -> bool {
        match self.action_mut(wire.behavior) {
            Some(action) => action.cut(ctx, actor, wire),
            None => true,
        }
    }

    pub fn mend(&mut self, ctx: &mut ActionContext<'_>, actor: EntityId, wire: &Wire) -> bool {
        match self.action_mut(wire.behavior) {
            Some(action) => action.mend(ctx, actor, wire),
            None => true,
        }
    }

    pub fn pulse(&mut self, ctx: &mut ActionContext<'_>, actor: EntityId, wire: &Wire) {
        if let Some(action) = self.action_mut(wire.behavior) {
            action.pulse(ctx, actor, wire);
        }
    }

    pub fn update(&mut self, ctx: &mut ActionContext<'_>, wire: &Wire) {
        if let Some(action) = self.action_mut(wire.behavior) {
            action.update(ctx, wire);
        }
    }

    /// Luz de status do fio com a chave sob a qual deve ser publicada
    pub fn status(&self, ctx: &ActionContext<'_>, wire: &Wire) -> Option<(StatusKey, StatusLightData)> {
        let BehaviorSlot::Action(index) = wire.behavior else {
            return None;
        };
        let action = self.get(index)?;
        let key = action.status_key()?;
        action.status_light(ctx, wire).map(|light| (key, light))
    }
}
