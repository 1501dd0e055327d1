//! Registro de ações temporizadas
//!
//! Ações atrasadas e canceláveis agendadas por comportamentos. O registro é
//! avançado uma vez por tick; entradas vencidas ou canceladas são removidas
//! ao final da varredura e devolvidas ao chamador, que dispara os callbacks.
//!
//! Invariante: no máximo uma ação pendente por par (dono, chave).

use std::collections::BTreeMap;
use tracing::trace;
use wires_core::{EntityId, StateKey};

/// Como a ação terminou
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimedOutcome {
    /// Atraso esgotado
    Completed,
    /// Cancelada antes do fim
    Cancelled,
}

impl TimedOutcome {
    pub fn is_cancelled(self) -> bool {
        matches!(self, TimedOutcome::Cancelled)
    }
}

/// Ação em andamento
#[derive(Debug)]
pub struct ActiveTimedAction<T> {
    /// Chave de identidade (idempotência e cancelamento)
    pub key: StateKey,
    /// Tempo restante (s)
    pub remaining: f32,
    cancelled: bool,
    finished: bool,
    payload: T,
}

impl<T> ActiveTimedAction<T> {
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }
}

/// Ação concluída ou cancelada, devolvida por [`TimedActionRegistry::tick`]
#[derive(Debug)]
pub struct FinishedAction<T> {
    pub owner: EntityId,
    pub key: StateKey,
    pub outcome: TimedOutcome,
    pub payload: T,
}

/// Registro de ações temporizadas por objeto
#[derive(Debug)]
pub struct TimedActionRegistry<T> {
    /// Ações pendentes por dono (ordenado para disparo determinístico)
    active: BTreeMap<EntityId, Vec<ActiveTimedAction<T>>>,
}

impl<T> TimedActionRegistry<T> {
    pub fn new() -> Self {
        Self {
            active: BTreeMap::new(),
        }
    }

    /// Agenda ação. Não faz nada (retorna `false`) se já houver uma
    /// pendente com a mesma chave para o mesmo dono.
    pub fn start(&mut self, owner: EntityId, delay: f32, key: StateKey, payload: T) -> bool {
        if self.is_pending(owner, &key) {
            trace!(%owner, %key, "timed action already pending");
            return false;
        }

        trace!(%owner, %key, delay, "timed action started");
        self.active.entry(owner).or_default().push(ActiveTimedAction {
            key,
            remaining: delay,
            cancelled: false,
            finished: false,
            payload,
        });
        true
    }

    /// Marca a ação como cancelada. O callback dispara no próximo tick.
    ///
    /// Retorna `false` se não houver ação pendente (ou se já estiver cancelada).
    pub fn cancel(&mut self, owner: EntityId, key: &StateKey) -> bool {
        let Some(action) = self
            .active
            .get_mut(&owner)
            .and_then(|actions| actions.iter_mut().find(|a| &a.key == key))
        else {
            return false;
        };

        if action.cancelled {
            return false;
        }
        action.cancelled = true;
        true
    }

    /// Existe ação pendente para (dono, chave)?
    pub fn is_pending(&self, owner: EntityId, key: &StateKey) -> bool {
        self.active
            .get(&owner)
            .is_some_and(|actions| actions.iter().any(|a| &a.key == key))
    }

    /// Ação pendente para (dono, chave)
    pub fn get(&self, owner: EntityId, key: &StateKey) -> Option<&ActiveTimedAction<T>> {
        self.active.get(&owner)?.iter().find(|a| &a.key == key)
    }

    /// Descarta todas as ações de um dono sem disparar callbacks
    pub fn cancel_all(&mut self, owner: EntityId) -> usize {
        self.active.remove(&owner).map(|a| a.len()).unwrap_or(0)
    }

    /// Total de ações pendentes
    pub fn pending_count(&self) -> usize {
        self.active.values().map(|v| v.len()).sum()
    }

    /// Número de donos com ações pendentes
    pub fn owner_count(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Avança todas as ações em `delta` segundos.
    ///
    /// Canceladas terminam imediatamente; as demais decrementam o tempo e
    /// terminam quando `remaining <= 0`. A remoção acontece depois da
    /// varredura, e donos sem ações restantes saem do registro.
    pub fn tick(&mut self, delta: f32) -> Vec<FinishedAction<T>> {
        let mut any_finished = false;

        for actions in self.active.values_mut() {
            for action in actions.iter_mut() {
                if action.cancelled {
                    action.finished = true;
                } else {
                    action.remaining -= delta;
                    action.finished = action.remaining <= 0.0;
                }
                any_finished |= action.finished;
            }
        }

        if !any_finished {
            return Vec::new();
        }

        let mut finished = Vec::new();
        for (owner, actions) in self.active.iter_mut() {
            let (done, pending): (Vec<_>, Vec<_>) =
                std::mem::take(actions).into_iter().partition(|a| a.finished);
            *actions = pending;

            for action in done {
                let outcome = if action.cancelled {
                    TimedOutcome::Cancelled
                } else {
                    TimedOutcome::Completed
                };
                trace!(%owner, key = %action.key, ?outcome, "timed action finished");
                finished.push(FinishedAction {
                    owner: *owner,
                    key: action.key,
                    outcome,
                    payload: action.payload,
                });
            }
        }

        self.active.retain(|_, actions| !actions.is_empty());
        finished
    }
}

impl<T> Default for TimedActionRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
