//! Armazenamento de estado por painel
//!
//! Comportamentos guardam progresso entre pulsos num mapa chave → valor
//! tipado ([`StateValue`]). A leitura é tipada: pedir um `bool` onde foi
//! guardado um inteiro devolve `None`, nunca uma coerção silenciosa.
//!
//! O mapa de status guarda o estado das luzes de status mostradas ao
//! cliente. Escritas iguais ao valor atual são ignoradas.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use serde::{Deserialize, Serialize};
use crate::types::{WireColor, WireId};

// ═══════════════════════════════════════════════════════════════════════════════
// CHAVES
// ═══════════════════════════════════════════════════════════════════════════════

/// Chave de estado (também usada como chave de ação temporizada)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateKey(Cow<'static, str>);

impl StateKey {
    /// Chave estática, sem alocação
    pub const fn from_static(key: &'static str) -> Self {
        Self(Cow::Borrowed(key))
    }

    /// Chave derivada de um prefixo e um fio (ex.: `"bolt-timer:3"`)
    pub fn for_wire(prefix: &str, wire: WireId) -> Self {
        Self(Cow::Owned(format!("{}:{}", prefix, wire)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for StateKey {
    fn from(value: &'static str) -> Self {
        Self::from_static(value)
    }
}

impl From<String> for StateKey {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

/// Chave de luz de status
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusKey(Cow<'static, str>);

impl StatusKey {
    pub const fn from_static(key: &'static str) -> Self {
        Self(Cow::Borrowed(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StatusKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for StatusKey {
    fn from(value: &'static str) -> Self {
        Self::from_static(value)
    }
}

impl From<String> for StatusKey {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// VALORES
// ═══════════════════════════════════════════════════════════════════════════════

/// Valor de estado com tag de tipo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StateValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Wire(WireId),
}

impl StateValue {
    /// Nome da tag (para logs)
    pub fn kind(&self) -> &'static str {
        match self {
            StateValue::Bool(_) => "bool",
            StateValue::Int(_) => "int",
            StateValue::Float(_) => "float",
            StateValue::Text(_) => "text",
            StateValue::Wire(_) => "wire",
        }
    }
}

impl From<bool> for StateValue {
    fn from(value: bool) -> Self {
        StateValue::Bool(value)
    }
}

impl From<i64> for StateValue {
    fn from(value: i64) -> Self {
        StateValue::Int(value)
    }
}

impl From<f64> for StateValue {
    fn from(value: f64) -> Self {
        StateValue::Float(value)
    }
}

impl From<String> for StateValue {
    fn from(value: String) -> Self {
        StateValue::Text(value)
    }
}

impl From<&str> for StateValue {
    fn from(value: &str) -> Self {
        StateValue::Text(value.to_string())
    }
}

impl From<WireId> for StateValue {
    fn from(value: WireId) -> Self {
        StateValue::Wire(value)
    }
}

/// Leitura tipada de um [`StateValue`]
pub trait FromStateValue: Sized {
    fn from_state_value(value: &StateValue) -> Option<Self>;
}

impl FromStateValue for bool {
    fn from_state_value(value: &StateValue) -> Option<Self> {
        match value {
            StateValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromStateValue for i64 {
    fn from_state_value(value: &StateValue) -> Option<Self> {
        match value {
            StateValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromStateValue for f64 {
    fn from_state_value(value: &StateValue) -> Option<Self> {
        match value {
            StateValue::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromStateValue for String {
    fn from_state_value(value: &StateValue) -> Option<Self> {
        match value {
            StateValue::Text(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl FromStateValue for WireId {
    fn from_state_value(value: &StateValue) -> Option<Self> {
        match value {
            StateValue::Wire(v) => Some(*v),
            _ => None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// LUZES DE STATUS
// ═══════════════════════════════════════════════════════════════════════════════

/// Estado de uma luz de status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum StatusLightState {
    #[default]
    Off,
    On,
    BlinkingFast,
    BlinkingSlow,
}

/// Dados de uma luz de status mostrada ao cliente
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusLightData {
    pub color: WireColor,
    pub state: StatusLightState,
    pub text: String,
}

impl StatusLightData {
    pub fn new(color: WireColor, state: StatusLightState, text: impl Into<String>) -> Self {
        Self {
            color,
            state,
            text: text.into(),
        }
    }
}

/// Par (chave, valor) publicado no snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntry {
    pub key: StatusKey,
    pub value: StatusLightData,
}

// ═══════════════════════════════════════════════════════════════════════════════
// STORE
// ═══════════════════════════════════════════════════════════════════════════════

/// Estado chaveado de um painel + mapa de status
#[derive(Debug, Clone, Default)]
pub struct WireStateStore {
    data: HashMap<StateKey, StateValue>,
    statuses: BTreeMap<StatusKey, StatusLightData>,
}

impl WireStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lê valor tipado; `None` se ausente ou de outro tipo
    pub fn get<T: FromStateValue>(&self, key: &StateKey) -> Option<T> {
        self.data.get(key).and_then(T::from_state_value)
    }

    /// Grava valor. Retorna `false` (sem efeito) se o valor for igual ao atual.
    pub fn set(&mut self, key: StateKey, value: impl Into<StateValue>) -> bool {
        let value = value.into();
        if self.data.get(&key) == Some(&value) {
            return false;
        }
        self.data.insert(key, value);
        true
    }

    pub fn has(&self, key: &StateKey) -> bool {
        self.data.contains_key(key)
    }

    /// Remove valor, devolvendo o anterior
    pub fn remove(&mut self, key: &StateKey) -> Option<StateValue> {
        self.data.remove(key)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Grava status. Mesma regra de igualdade de [`set`](Self::set);
    /// nunca publica por conta própria.
    pub fn set_status(&mut self, key: StatusKey, status: StatusLightData) -> bool {
        if self.statuses.get(&key) == Some(&status) {
            return false;
        }
        self.statuses.insert(key, status);
        true
    }

    pub fn status(&self, key: &StatusKey) -> Option<&StatusLightData> {
        self.statuses.get(key)
    }

    /// Status ordenados por chave
    pub fn status_entries(&self) -> Vec<StatusEntry> {
        self.statuses
            .iter()
            .map(|(key, value)| StatusEntry {
                key: key.clone(),
                value: value.clone(),
            })
            .collect()
    }
}
