//! # 🔌 wires-core — Modelo de Dados do Painel de Fios
//!
//! Tipos compartilhados pelo subsistema de hacking de fios: fios, layouts
//! (flyweight), templates declarativos, store de estado tipado e
//! configuração.
//!
//! ## Arquitetura
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    wires-core                           │
//! │  ┌──────────────┐  ┌──────────────┐  ┌───────────────┐  │
//! │  │    Wire      │  │  WireLayout  │  │ WireTemplate  │  │
//! │  │ id/cor/letra │  │ idx → (L,C,P)│  │ wires/dummies │  │
//! │  └──────────────┘  └──────────────┘  └───────────────┘  │
//! │  ┌──────────────────────────────┐  ┌─────────────────┐  │
//! │  │       WireStateStore         │  │  WiresConfig    │  │
//! │  │  StateKey → StateValue       │  │  (wires.toml)   │  │
//! │  │  StatusKey → StatusLightData │  │                 │  │
//! │  └──────────────────────────────┘  └─────────────────┘  │
//! └─────────────────────────────────────────────────────────┘
//!                          ↓
//!                    wires-system
//! ```
//!
//! ## Exemplo
//!
//! ```rust
//! use wires_core::{StateKey, WireStateStore};
//!
//! let mut store = WireStateStore::new();
//! let key = StateKey::from("pulses");
//! store.set(key.clone(), 2i64);
//!
//! assert_eq!(store.get::<i64>(&key), Some(2));
//! assert_eq!(store.get::<bool>(&key), None);
//! ```

pub mod error;
pub mod types;
pub mod wire;
pub mod layout;
pub mod state;
pub mod template;
pub mod config;

pub use error::{WiresError, WiresResult};
pub use types::{EntityId, WireId, WireColor, WireLetter, WiresAction, ToolQuality};
pub use wire::{Wire, ClientWire, BehaviorSlot, BehaviorIndex};
pub use layout::{WireLayout, WireData};
pub use state::{
    StateKey, StateValue, FromStateValue, WireStateStore,
    StatusKey, StatusLightData, StatusLightState, StatusEntry,
};
pub use template::{WireTemplate, TemplateStore};
pub use config::{WiresConfig, DEFAULT_SCREW_TIME};
