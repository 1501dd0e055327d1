//! # 🧰 wires-system — Motor do Painel de Fios
//!
//! Gera conjuntos de fios coloridos e com letras para cada objeto com painel,
//! liga cada fio a um comportamento plugável, aplica cortar/emendar/pulsar
//! com ferramentas, executa efeitos atrasados e canceláveis e mantém o
//! observador remoto sincronizado por snapshots completos.
//!
//! ## Arquitetura
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      WiresSystem                            │
//! │  ┌───────────────────────────────────────────────────────┐  │
//! │  │  WireSetGenerator ──► LayoutCache (Arc<WireLayout>)   │  │
//! │  │  template | ad hoc → shuffle/replay → bind            │  │
//! │  └───────────────────────────────────────────────────────┘  │
//! │  ┌──────────────────────────┐  ┌────────────────────────┐   │
//! │  │  Painéis (WiresComponent)│  │  TimedActionRegistry   │   │
//! │  │  fios | BehaviorSet      │  │  (dono, chave) → ação  │   │
//! │  │  WireStateStore          │  │  tick → on_finish      │   │
//! │  └──────────────────────────┘  └────────────────────────┘   │
//! │  ┌───────────────────────────────────────────────────────┐  │
//! │  │  EventBus: StateUpdated | Popup | Appearance | Sound  │  │
//! │  └───────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//!          ▲ apply_action / interact_using          │ WiresSnapshot
//!          │                                        ▼
//!      Interaction (ferramentas, alcance)     observador remoto
//! ```
//!
//! ## Exemplo
//!
//! ```rust
//! use wires_system::*;
//!
//! #[derive(Debug, Default)]
//! struct Bolt;
//!
//! impl WireAction for Bolt {
//!     fn cut(&mut self, ctx: &mut ActionContext<'_>, _: EntityId, _: &Wire) -> bool {
//!         ctx.set(StateKey::from("bolted"), true);
//!         true
//!     }
//!     fn mend(&mut self, _: &mut ActionContext<'_>, _: EntityId, _: &Wire) -> bool {
//!         true
//!     }
//!     fn pulse(&mut self, _: &mut ActionContext<'_>, _: EntityId, _: &Wire) {}
//! }
//!
//! let mut behaviors = BehaviorRegistry::new();
//! behaviors.register_default::<Bolt>("bolt").unwrap();
//!
//! let mut system = WiresSystem::new(WiresConfig::seeded(1), TemplateStore::new(), behaviors).unwrap();
//! let door = EntityId(1);
//! system.add_panel(door, PanelConfig::ad_hoc(["bolt"], 2).opened()).unwrap();
//!
//! let cutters = EntityId(10);
//! let mut tools = StaticInteraction::new().with_tool(cutters, [ToolQuality::Cutting]);
//! let bolt = system.wires_with_behavior(door, "bolt").unwrap()[0].id;
//!
//! let outcome = system.apply_action(door, EntityId(2), cutters, bolt, WiresAction::Cut, &mut tools);
//! assert_eq!(outcome, ActionOutcome::Dispatched { is_cut: true });
//! ```

pub mod cache;
pub mod behavior;
pub mod generator;
pub mod timed;
pub mod events;
pub mod interaction;
pub mod serial;
pub mod snapshot;
pub mod component;
pub mod system;

pub use cache::LayoutCache;
pub use behavior::{
    ActionContext, BehaviorFactory, BehaviorRegistry, BehaviorSet, FinishCallback,
    PendingWireAction, WireAction, WireTimers,
};
pub use generator::{resolve_definition, pick_and_take, GeneratedWires, WireDefinition, WireSetGenerator};
pub use timed::{ActiveTimedAction, FinishedAction, TimedActionRegistry, TimedOutcome};
pub use events::{EventBus, EventFilter, EventHandler, PopupMessage, WireSound, WiresEvent};
pub use interaction::{ActionOutcome, InteractOutcome, Interaction, StaticInteraction};
pub use serial::{generate_serial_number, generate_wire_seed, probability};
pub use snapshot::WiresSnapshot;
pub use component::{PanelConfig, WiresComponent};
pub use system::{WiresSystem, EXAMINE_PANEL_CLOSED, EXAMINE_PANEL_OPEN};

// Re-exporta o modelo de dados
pub use wires_core::*;
