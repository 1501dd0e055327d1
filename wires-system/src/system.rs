//! Controlador de interação e sincronização
//!
//! [`WiresSystem`] é dono de todo o estado do subsistema: painéis, cache de
//! layouts, registro de ações temporizadas, RNG e bus de eventos. É dirigido
//! por chamadas `&mut self` em uma única thread de simulação.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};
use wires_core::{
    EntityId, FromStateValue, StateKey, StateValue, StatusKey, StatusLightData, TemplateStore,
    ToolQuality, Wire, WireId, WiresAction, WiresConfig, WiresError, WiresResult,
};
use crate::behavior::{ActionContext, BehaviorRegistry, WireTimers};
use crate::cache::LayoutCache;
use crate::component::{PanelConfig, WiresComponent};
use crate::events::{EventBus, PopupMessage, WireSound, WiresEvent};
use crate::generator::{resolve_definition, GeneratedWires, WireSetGenerator};
use crate::interaction::{ActionOutcome, InteractOutcome, Interaction};
use crate::serial::{generate_serial_number, generate_wire_seed};
use crate::snapshot::WiresSnapshot;
use crate::timed::TimedOutcome;

/// Chaves de localização do exame do painel
pub const EXAMINE_PANEL_OPEN: &str = "wires-component-on-examine-panel-open";
pub const EXAMINE_PANEL_CLOSED: &str = "wires-component-on-examine-panel-closed";

/// Sistema de fios
pub struct WiresSystem {
    config: WiresConfig,
    templates: TemplateStore,
    behaviors: BehaviorRegistry,
    layouts: LayoutCache,
    timed_actions: WireTimers,
    panels: BTreeMap<EntityId, WiresComponent>,
    events: EventBus,
    rng: StdRng,
}

impl WiresSystem {
    /// Cria o sistema. Sem `rng_seed` configurado, usa entropia do sistema.
    ///
    /// A configuração é validada aqui também, pois pode ser montada em código
    /// sem passar por `WiresConfig::from_toml_str`.
    pub fn new(config: WiresConfig, templates: TemplateStore, behaviors: BehaviorRegistry) -> WiresResult<Self> {
        config.validate()?;

        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            events: EventBus::with_history(config.event_history_size),
            config,
            templates,
            behaviors,
            layouts: LayoutCache::new(),
            timed_actions: WireTimers::new(),
            panels: BTreeMap::new(),
            rng,
        })
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // CICLO DE VIDA
    // ═══════════════════════════════════════════════════════════════════════════

    /// Registra um painel: gera os fios e publica o primeiro snapshot.
    ///
    /// Erros de configuração da definição não são fatais: o painel fica sem
    /// fios e o erro é registrado com `warn!`.
    pub fn add_panel(&mut self, object: EntityId, panel: PanelConfig) -> WiresResult<()> {
        if self.panels.contains_key(&object) {
            return Err(WiresError::PanelAlreadyRegistered(object));
        }

        let generated = match self.generate_wires(object, &panel) {
            Ok(generated) => generated,
            Err(e) => {
                warn!(%object, layout_id = panel.layout_id.as_deref().unwrap_or("-"), error = %e, "wire generation failed, panel left inert");
                GeneratedWires::default()
            }
        };

        self.panels.insert(object, WiresComponent::new(panel, generated));
        self.publish_snapshot(object)
    }

    fn generate_wires(&mut self, object: EntityId, panel: &PanelConfig) -> WiresResult<GeneratedWires> {
        let Some(definition) = resolve_definition(
            &self.templates,
            panel.layout_id.as_deref(),
            panel.wire_actions.as_deref(),
            panel.dummy_wires,
        )?
        else {
            return Ok(GeneratedWires::default());
        };

        WireSetGenerator::new(&self.behaviors, &mut self.layouts)
            .with_fallback(self.config.fallback_color, self.config.fallback_letter)
            .generate(object, &definition, &mut self.rng)
    }

    /// Inicialização no mapa: número de série e semente, se ausentes
    pub fn map_init(&mut self, object: EntityId) -> WiresResult<()> {
        let panel = self
            .panels
            .get_mut(&object)
            .ok_or(WiresError::PanelNotFound(object))?;

        let mut changed = false;
        if panel.serial_number.is_none() {
            panel.serial_number = Some(generate_serial_number(&mut self.rng, self.config.alternate_serial_chance));
            changed = true;
        }
        if panel.wire_seed == 0 {
            panel.wire_seed = generate_wire_seed(&mut self.rng);
            changed = true;
        }

        if changed {
            self.publish_snapshot(object)?;
        }
        Ok(())
    }

    /// Número de série do painel, gerado no primeiro uso
    pub fn serial_number(&mut self, object: EntityId) -> WiresResult<String> {
        let panel = self
            .panels
            .get_mut(&object)
            .ok_or(WiresError::PanelNotFound(object))?;

        if let Some(serial) = &panel.serial_number {
            return Ok(serial.clone());
        }

        let serial = generate_serial_number(&mut self.rng, self.config.alternate_serial_chance);
        panel.serial_number = Some(serial.clone());
        self.publish_snapshot(object)?;
        Ok(serial)
    }

    /// Remove o painel. Ações temporizadas pendentes são descartadas sem
    /// disparar callbacks.
    pub fn remove_panel(&mut self, object: EntityId) -> Option<WiresComponent> {
        let panel = self.panels.remove(&object)?;
        let dropped = self.timed_actions.cancel_all(object);
        debug!(%object, dropped, "wire panel removed");
        Some(panel)
    }

    /// Reinício de rodada: descarta layouts em cache
    pub fn reset_round(&mut self) {
        info!(layouts = self.layouts.len(), "clearing wire layout cache");
        self.layouts.clear();
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // TICK
    // ═══════════════════════════════════════════════════════════════════════════

    /// Avança ações temporizadas e dispara os callbacks concluídos
    pub fn update(&mut self, delta: f32) {
        let finished = self.timed_actions.tick(delta);
        if finished.is_empty() {
            return;
        }

        let mut touched = BTreeSet::new();
        for action in finished {
            let Some(panel) = self.panels.get_mut(&action.owner) else {
                continue;
            };
            let Some(wire) = panel.wire(action.payload.wire).copied() else {
                continue;
            };

            let mut ctx = ActionContext::new(action.owner, panel.powered, &mut panel.store, &mut self.timed_actions);
            (action.payload.on_finish)(&mut ctx, &wire, action.outcome);
            touched.insert(action.owner);
        }

        for object in touched {
            if let Err(e) = self.publish_snapshot(object) {
                warn!(%object, error = %e, "snapshot publish after timed action failed");
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // AÇÕES
    // ═══════════════════════════════════════════════════════════════════════════

    /// Aplica cortar/emendar/pulsar com a ferramenta dada.
    ///
    /// Qualidade de ferramenta errada e pulso em fio cortado são rejeitados
    /// com popup, sem mudança de estado.
    pub fn apply_action(
        &mut self,
        object: EntityId,
        actor: EntityId,
        tool: EntityId,
        wire_id: WireId,
        action: WiresAction,
        interaction: &mut dyn Interaction,
    ) -> ActionOutcome {
        let Some(wire) = self.panels.get(&object).and_then(|p| p.wire(wire_id)).copied() else {
            return ActionOutcome::Ignored;
        };

        if !interaction.has_quality(tool, action.required_quality()) {
            let message = match action {
                WiresAction::Pulse => PopupMessage::NeedMultitool,
                WiresAction::Cut | WiresAction::Mend => PopupMessage::NeedWirecutters,
            };
            return self.reject(object, actor, message);
        }

        if action == WiresAction::Pulse && wire.is_cut {
            return self.reject(object, actor, PopupMessage::CannotPulseCutWire);
        }

        let Some(panel) = self.panels.get_mut(&object) else {
            return ActionOutcome::Ignored;
        };
        let mut ctx = ActionContext::new(object, panel.powered, &mut panel.store, &mut self.timed_actions);

        let is_cut = match action {
            WiresAction::Cut | WiresAction::Mend => {
                interaction.play_tool_sound(tool);
                let cut = action == WiresAction::Cut;
                let accepted = if cut {
                    panel.behaviors.cut(&mut ctx, actor, &wire)
                } else {
                    panel.behaviors.mend(&mut ctx, actor, &wire)
                };
                if accepted {
                    if let Some(target) = panel.wire_mut(wire_id) {
                        target.is_cut = cut;
                    }
                    cut
                } else {
                    wire.is_cut
                }
            }
            WiresAction::Pulse => {
                panel.behaviors.pulse(&mut ctx, actor, &wire);
                self.events.emit(WiresEvent::Sound {
                    object,
                    sound: WireSound::Pulse,
                });
                wire.is_cut
            }
        };

        debug!(%object, %actor, wire = %wire_id, ?action, is_cut, "wire action dispatched");
        if let Err(e) = self.publish_snapshot(object) {
            warn!(%object, error = %e, "snapshot publish after wire action failed");
        }
        ActionOutcome::Dispatched { is_cut }
    }

    /// Pedido vindo da UI remota: valida mãos, alcance, ferramenta na mão e
    /// painel aberto antes de aplicar a ação.
    pub fn handle_action_message(
        &mut self,
        object: EntityId,
        actor: EntityId,
        wire_id: WireId,
        action: WiresAction,
        interaction: &mut dyn Interaction,
    ) -> ActionOutcome {
        let Some(panel_open) = self.panels.get(&object).map(|p| p.panel_open) else {
            return ActionOutcome::Ignored;
        };

        if !interaction.has_hands(actor) {
            return self.reject(object, actor, PopupMessage::NoHands);
        }
        if !interaction.is_reachable(actor, object) {
            return self.reject(object, actor, PopupMessage::CannotReach);
        }
        let Some(tool) = interaction.active_tool(actor) else {
            return ActionOutcome::Ignored;
        };
        if !panel_open {
            return self.reject(object, actor, PopupMessage::PanelClosed);
        }

        self.apply_action(object, actor, tool, wire_id, action, interaction)
    }

    fn reject(&mut self, object: EntityId, actor: EntityId, message: PopupMessage) -> ActionOutcome {
        debug!(%object, %actor, ?message, "wire action rejected");
        self.events.emit(WiresEvent::Popup { object, actor, message });
        ActionOutcome::Rejected(message)
    }

    /// Uso de ferramenta no objeto: com o painel aberto, alicate ou
    /// multitool abrem a UI; chave de fenda inicia a abertura/fechamento.
    pub fn interact_using(
        &mut self,
        object: EntityId,
        user: EntityId,
        tool: EntityId,
        interaction: &dyn Interaction,
    ) -> InteractOutcome {
        let Some(panel_open) = self.panels.get(&object).map(|p| p.panel_open) else {
            return InteractOutcome::NotHandled;
        };

        let wire_tool = interaction.has_quality(tool, ToolQuality::Cutting)
            || interaction.has_quality(tool, ToolQuality::Pulsing);

        if panel_open && wire_tool && self.open_ui(object, user).is_ok() {
            return InteractOutcome::UiOpened;
        }

        if interaction.has_quality(tool, ToolQuality::Screwing) {
            return InteractOutcome::ScrewingStarted {
                delay: self.config.screw_time,
            };
        }

        InteractOutcome::NotHandled
    }

    /// Abre a UI para o ator e envia o snapshot atual
    pub fn open_ui(&mut self, object: EntityId, actor: EntityId) -> WiresResult<()> {
        let panel = self
            .panels
            .get_mut(&object)
            .ok_or(WiresError::PanelNotFound(object))?;
        panel.ui_viewers.insert(actor);

        self.events.emit(WiresEvent::UiOpened { object, actor });
        self.publish_snapshot(object)
    }

    /// Conclusão da chave de fenda: alterna o painel. Retorna o novo estado.
    pub fn toggle_panel(&mut self, object: EntityId) -> WiresResult<bool> {
        let panel = self
            .panels
            .get_mut(&object)
            .ok_or(WiresError::PanelNotFound(object))?;

        panel.panel_open = !panel.panel_open;
        let open = panel.panel_open;
        let exposed = panel.is_panel_exposed();
        if !open {
            panel.ui_viewers.clear();
        }

        self.events.emit(WiresEvent::AppearanceChanged {
            object,
            panel_open_visible: exposed,
        });
        self.events.emit(WiresEvent::Sound {
            object,
            sound: if open {
                WireSound::ScrewdriverOpen
            } else {
                WireSound::ScrewdriverClose
            },
        });
        if !open {
            self.events.emit(WiresEvent::UiClosed { object });
        }

        debug!(%object, open, "wire panel toggled");
        self.publish_snapshot(object)?;
        Ok(open)
    }

    /// Mostra/esconde o painel (ex.: coberto por outra peça)
    pub fn set_panel_visible(&mut self, object: EntityId, visible: bool) -> WiresResult<()> {
        let panel = self
            .panels
            .get_mut(&object)
            .ok_or(WiresError::PanelNotFound(object))?;

        panel.panel_visible = visible;
        let exposed = panel.is_panel_exposed();
        self.events.emit(WiresEvent::AppearanceChanged {
            object,
            panel_open_visible: exposed,
        });
        Ok(())
    }

    /// Mudança de energia: roda `update` em todos os fios e republica
    pub fn set_powered(&mut self, object: EntityId, powered: bool) -> WiresResult<()> {
        let panel = self
            .panels
            .get_mut(&object)
            .ok_or(WiresError::PanelNotFound(object))?;

        panel.powered = powered;
        let mut ctx = ActionContext::new(object, powered, &mut panel.store, &mut self.timed_actions);
        for wire in panel.wires.iter() {
            panel.behaviors.update(&mut ctx, wire);
        }

        debug!(%object, powered, "wire panel power changed");
        self.publish_snapshot(object)
    }

    /// Chave de localização do exame do painel
    pub fn examine(&self, object: EntityId) -> Option<&'static str> {
        self.panels.get(&object).map(|p| {
            if p.panel_open {
                EXAMINE_PANEL_OPEN
            } else {
                EXAMINE_PANEL_CLOSED
            }
        })
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SINCRONIZAÇÃO
    // ═══════════════════════════════════════════════════════════════════════════

    /// Atualiza luzes de status e publica o snapshot completo
    pub fn publish_snapshot(&mut self, object: EntityId) -> WiresResult<()> {
        let panel = self
            .panels
            .get_mut(&object)
            .ok_or(WiresError::PanelNotFound(object))?;

        let ctx = ActionContext::new(object, panel.powered, &mut panel.store, &mut self.timed_actions);
        let lights: Vec<_> = panel
            .wires
            .iter()
            .filter_map(|wire| panel.behaviors.status(&ctx, wire))
            .collect();
        for (key, light) in lights {
            panel.store.set_status(key, light);
        }

        let snapshot = panel.build_snapshot();
        panel.last_snapshot = Some(snapshot.clone());
        self.events.emit(WiresEvent::StateUpdated { object, snapshot });
        Ok(())
    }

    /// Último snapshot publicado
    pub fn snapshot(&self, object: EntityId) -> Option<&WiresSnapshot> {
        self.panels.get(&object)?.last_snapshot.as_ref()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // DADOS
    // ═══════════════════════════════════════════════════════════════════════════

    fn panel_mut(&mut self, object: EntityId) -> WiresResult<&mut WiresComponent> {
        self.panels
            .get_mut(&object)
            .ok_or(WiresError::PanelNotFound(object))
    }

    pub fn get_data<T: FromStateValue>(&self, object: EntityId, key: &StateKey) -> WiresResult<Option<T>> {
        Ok(self.panel(object)?.store.get(key))
    }

    /// Grava dado; republica só se o valor mudou
    pub fn set_data(&mut self, object: EntityId, key: StateKey, value: impl Into<StateValue>) -> WiresResult<bool> {
        let changed = self.panel_mut(object)?.store.set(key, value);
        if changed {
            self.publish_snapshot(object)?;
        }
        Ok(changed)
    }

    pub fn has_data(&self, object: EntityId, key: &StateKey) -> bool {
        self.panels.get(&object).is_some_and(|p| p.store.has(key))
    }

    pub fn remove_data(&mut self, object: EntityId, key: &StateKey) -> WiresResult<Option<StateValue>> {
        Ok(self.panel_mut(object)?.store.remove(key))
    }

    /// Grava luz de status (não publica)
    pub fn set_status(&mut self, object: EntityId, key: StatusKey, status: StatusLightData) -> WiresResult<bool> {
        Ok(self.panel_mut(object)?.store.set_status(key, status))
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // AÇÕES TEMPORIZADAS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Agenda ação temporizada ligada a um fio do painel
    pub fn start_wire_action<F>(
        &mut self,
        object: EntityId,
        delay: f32,
        key: StateKey,
        wire_id: WireId,
        on_finish: F,
    ) -> WiresResult<bool>
    where
        F: FnOnce(&mut ActionContext<'_>, &Wire, TimedOutcome) + 'static,
    {
        let panel = self
            .panels
            .get_mut(&object)
            .ok_or(WiresError::PanelNotFound(object))?;
        let wire = *panel.wire(wire_id).ok_or(WiresError::WireNotFound {
            owner: object,
            wire: wire_id,
        })?;

        let mut ctx = ActionContext::new(object, panel.powered, &mut panel.store, &mut self.timed_actions);
        Ok(ctx.start_timed_action(delay, key, &wire, on_finish))
    }

    /// Cancela ação temporizada; o callback recebe `Cancelled` no próximo tick
    pub fn cancel_wire_action(&mut self, object: EntityId, key: &StateKey) -> bool {
        self.timed_actions.cancel(object, key)
    }

    pub fn is_wire_action_pending(&self, object: EntityId, key: &StateKey) -> bool {
        self.timed_actions.is_pending(object, key)
    }

    pub fn timed_actions(&self) -> &WireTimers {
        &self.timed_actions
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // CONSULTAS
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn panel(&self, object: EntityId) -> WiresResult<&WiresComponent> {
        self.panels
            .get(&object)
            .ok_or(WiresError::PanelNotFound(object))
    }

    pub fn contains_panel(&self, object: EntityId) -> bool {
        self.panels.contains_key(&object)
    }

    /// Ids dos painéis, em ordem
    pub fn panel_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.panels.keys().copied()
    }

    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    pub fn wire(&self, object: EntityId, wire_id: WireId) -> WiresResult<&Wire> {
        self.panel(object)?
            .wire(wire_id)
            .ok_or(WiresError::WireNotFound {
                owner: object,
                wire: wire_id,
            })
    }

    pub fn wires(&self, object: EntityId) -> WiresResult<&[Wire]> {
        Ok(self.panel(object)?.wires())
    }

    /// Fios ligados ao comportamento de tipo `name`
    pub fn wires_with_behavior(&self, object: EntityId, name: &str) -> WiresResult<Vec<&Wire>> {
        let panel = self.panel(object)?;
        Ok(panel
            .wires
            .iter()
            .filter(|w| panel.behavior_name(w.behavior) == Some(name))
            .collect())
    }

    pub fn config(&self) -> &WiresConfig {
        &self.config
    }

    pub fn templates(&self) -> &TemplateStore {
        &self.templates
    }

    pub fn behaviors(&self) -> &BehaviorRegistry {
        &self.behaviors
    }

    pub fn layouts(&self) -> &LayoutCache {
        &self.layouts
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Bus de eventos (para inscrever handlers)
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }
}

impl fmt::Debug for WiresSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WiresSystem")
            .field("config", &self.config)
            .field("templates", &self.templates.len())
            .field("behaviors", &self.behaviors)
            .field("layouts", &self.layouts.len())
            .field("pending_actions", &self.timed_actions.pending_count())
            .field("panels", &self.panels.len())
            .field("events", &self.events)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wires_core::{WireTemplate, StatusLightState, WireColor};
    use crate::behavior::WireAction;
    use crate::events::EventFilter;
    use crate::interaction::StaticInteraction;

    const OBJ: EntityId = EntityId(1);
    const ACTOR: EntityId = EntityId(100);
    const CUTTERS: EntityId = EntityId(200);
    const MULTITOOL: EntityId = EntityId(201);
    const SCREWDRIVER: EntityId = EntityId(202);

    const POWER: StateKey = StateKey::from_static("power-cut");

    /// Corta a energia enquanto cortado; pulso corta por 1s
    #[derive(Debug, Default)]
    struct Power;

    impl WireAction for Power {
        fn status_key(&self) -> Option<StatusKey> {
            Some(StatusKey::from("power"))
        }

        fn cut(&mut self, ctx: &mut ActionContext<'_>, _actor: EntityId, _wire: &Wire) -> bool {
            ctx.set(POWER, true);
            true
        }

        fn mend(&mut self, ctx: &mut ActionContext<'_>, _actor: EntityId, _wire: &Wire) -> bool {
            ctx.set(POWER, false);
            true
        }

        fn pulse(&mut self, ctx: &mut ActionContext<'_>, _actor: EntityId, wire: &Wire) {
            ctx.set(POWER, true);
            ctx.start_timed_action(1.0, StateKey::from("power-pulse"), wire, |ctx, wire, _| {
                if !wire.is_cut {
                    ctx.set(POWER, false);
                }
            });
        }

        fn status_light(&self, ctx: &ActionContext<'_>, _wire: &Wire) -> Option<StatusLightData> {
            let state = if ctx.get::<bool>(&POWER).unwrap_or(false) {
                StatusLightState::Off
            } else {
                StatusLightState::On
            };
            Some(StatusLightData::new(WireColor::Gold, state, "POWR"))
        }
    }

    /// Recusa o corte
    #[derive(Debug, Default)]
    struct Stubborn;

    impl WireAction for Stubborn {
        fn cut(&mut self, _: &mut ActionContext<'_>, _: EntityId, _: &Wire) -> bool {
            false
        }
        fn mend(&mut self, _: &mut ActionContext<'_>, _: EntityId, _: &Wire) -> bool {
            true
        }
        fn pulse(&mut self, _: &mut ActionContext<'_>, _: EntityId, _: &Wire) {}
    }

    fn system() -> WiresSystem {
        let mut templates = TemplateStore::new();
        templates.insert(WireTemplate::new("Test", ["power", "stubborn"], 1)).unwrap();

        let mut behaviors = BehaviorRegistry::new();
        behaviors.register_default::<Power>("power").unwrap();
        behaviors.register_default::<Stubborn>("stubborn").unwrap();

        let mut system = WiresSystem::new(WiresConfig::seeded(42), templates, behaviors).unwrap();
        system.add_panel(OBJ, PanelConfig::with_layout("Test").opened()).unwrap();
        system
    }

    fn tools() -> StaticInteraction {
        let mut table = StaticInteraction::new()
            .with_tool(CUTTERS, [ToolQuality::Cutting])
            .with_tool(MULTITOOL, [ToolQuality::Pulsing])
            .with_tool(SCREWDRIVER, [ToolQuality::Screwing]);
        table.hold(ACTOR, CUTTERS);
        table
    }

    fn wire_of(system: &WiresSystem, name: &str) -> WireId {
        system.wires_with_behavior(OBJ, name).unwrap()[0].id
    }

    #[test]
    fn test_add_panel_publishes() {
        let system = system();
        assert_eq!(system.wires(OBJ).unwrap().len(), 3);
        assert_eq!(system.snapshot(OBJ).unwrap().wires.len(), 3);
        assert!(system.layouts().contains("Test"));
    }

    #[test]
    fn test_add_panel_twice() {
        let mut system = system();
        let result = system.add_panel(OBJ, PanelConfig::default());
        assert_eq!(result, Err(WiresError::PanelAlreadyRegistered(OBJ)));
    }

    #[test]
    fn test_add_panel_bad_layout_is_inert() {
        let mut system = system();
        system.add_panel(EntityId(2), PanelConfig::with_layout("Nope")).unwrap();
        assert!(system.wires(EntityId(2)).unwrap().is_empty());
    }

    #[test]
    fn test_cut_and_mend() {
        let mut system = system();
        let mut tools = tools();
        let power = wire_of(&system, "power");

        let outcome = system.apply_action(OBJ, ACTOR, CUTTERS, power, WiresAction::Cut, &mut tools);
        assert_eq!(outcome, ActionOutcome::Dispatched { is_cut: true });
        assert!(system.wire(OBJ, power).unwrap().is_cut);
        assert_eq!(system.get_data::<bool>(OBJ, &POWER).unwrap(), Some(true));
        assert_eq!(tools.tool_sounds(), &[CUTTERS]);

        let outcome = system.apply_action(OBJ, ACTOR, CUTTERS, power, WiresAction::Mend, &mut tools);
        assert_eq!(outcome, ActionOutcome::Dispatched { is_cut: false });
        assert!(!system.wire(OBJ, power).unwrap().is_cut);
    }

    #[test]
    fn test_behavior_refuses_cut() {
        let mut system = system();
        let mut tools = tools();
        let stubborn = wire_of(&system, "stubborn");

        let outcome = system.apply_action(OBJ, ACTOR, CUTTERS, stubborn, WiresAction::Cut, &mut tools);
        assert_eq!(outcome, ActionOutcome::Dispatched { is_cut: false });
        assert!(!system.wire(OBJ, stubborn).unwrap().is_cut);
    }

    #[test]
    fn test_wrong_tool_rejected() {
        let mut system = system();
        let mut tools = tools();
        let power = wire_of(&system, "power");

        let outcome = system.apply_action(OBJ, ACTOR, MULTITOOL, power, WiresAction::Cut, &mut tools);
        assert_eq!(outcome, ActionOutcome::Rejected(PopupMessage::NeedWirecutters));
        assert!(!system.wire(OBJ, power).unwrap().is_cut);

        let outcome = system.apply_action(OBJ, ACTOR, CUTTERS, power, WiresAction::Pulse, &mut tools);
        assert_eq!(outcome, ActionOutcome::Rejected(PopupMessage::NeedMultitool));
        assert!(!system.has_data(OBJ, &POWER));
    }

    #[test]
    fn test_pulse_cut_wire_rejected() {
        let mut system = system();
        let mut tools = tools();
        let power = wire_of(&system, "power");

        system.apply_action(OBJ, ACTOR, CUTTERS, power, WiresAction::Cut, &mut tools);
        system.remove_data(OBJ, &POWER).unwrap();

        let outcome = system.apply_action(OBJ, ACTOR, MULTITOOL, power, WiresAction::Pulse, &mut tools);
        assert_eq!(outcome, ActionOutcome::Rejected(PopupMessage::CannotPulseCutWire));
        assert!(!system.has_data(OBJ, &POWER));
        assert!(!system.is_wire_action_pending(OBJ, &StateKey::from("power-pulse")));
    }

    #[test]
    fn test_pulse_timed_restore() {
        let mut system = system();
        let mut tools = tools();
        let power = wire_of(&system, "power");

        let outcome = system.apply_action(OBJ, ACTOR, MULTITOOL, power, WiresAction::Pulse, &mut tools);
        assert_eq!(outcome, ActionOutcome::Dispatched { is_cut: false });
        assert_eq!(system.get_data::<bool>(OBJ, &POWER).unwrap(), Some(true));

        let status = |s: &WiresSystem| s.panel(OBJ).unwrap().store().status(&StatusKey::from("power")).unwrap().state;
        assert_eq!(status(&system), StatusLightState::Off);

        system.update(0.5);
        assert_eq!(system.get_data::<bool>(OBJ, &POWER).unwrap(), Some(true));
        system.update(0.5);
        assert_eq!(system.get_data::<bool>(OBJ, &POWER).unwrap(), Some(false));
        assert_eq!(status(&system), StatusLightState::On);
    }

    #[test]
    fn test_missing_wire_ignored() {
        let mut system = system();
        let mut tools = tools();
        let outcome = system.apply_action(OBJ, ACTOR, CUTTERS, WireId(99), WiresAction::Cut, &mut tools);
        assert_eq!(outcome, ActionOutcome::Ignored);
        let outcome = system.apply_action(EntityId(9), ACTOR, CUTTERS, WireId(0), WiresAction::Cut, &mut tools);
        assert_eq!(outcome, ActionOutcome::Ignored);
    }

    #[test]
    fn test_action_message_checks() {
        let mut system = system();
        let mut tools = tools();

        let outcome = system.handle_action_message(OBJ, ACTOR, WireId(0), WiresAction::Cut, &mut tools);
        assert!(outcome.is_dispatched());

        tools.block_reach(ACTOR, OBJ);
        let outcome = system.handle_action_message(OBJ, ACTOR, WireId(0), WiresAction::Mend, &mut tools);
        assert_eq!(outcome, ActionOutcome::Rejected(PopupMessage::CannotReach));

        tools.remove_hands(ACTOR);
        let outcome = system.handle_action_message(OBJ, ACTOR, WireId(0), WiresAction::Mend, &mut tools);
        assert_eq!(outcome, ActionOutcome::Rejected(PopupMessage::NoHands));
    }

    #[test]
    fn test_action_message_without_tool_or_closed() {
        let mut system = system();
        let mut tools = tools();
        tools.drop_held(ACTOR);
        let outcome = system.handle_action_message(OBJ, ACTOR, WireId(0), WiresAction::Cut, &mut tools);
        assert_eq!(outcome, ActionOutcome::Ignored);

        tools.hold(ACTOR, CUTTERS);
        system.toggle_panel(OBJ).unwrap();
        let outcome = system.handle_action_message(OBJ, ACTOR, WireId(0), WiresAction::Cut, &mut tools);
        assert_eq!(outcome, ActionOutcome::Rejected(PopupMessage::PanelClosed));
    }

    #[test]
    fn test_interact_using() {
        let mut system = system();
        let tools = tools();

        assert_eq!(system.interact_using(OBJ, ACTOR, CUTTERS, &tools), InteractOutcome::UiOpened);
        assert_eq!(system.panel(OBJ).unwrap().ui_viewers().collect::<Vec<_>>(), vec![ACTOR]);
        assert_eq!(
            system.interact_using(OBJ, ACTOR, SCREWDRIVER, &tools),
            InteractOutcome::ScrewingStarted { delay: 2.5 }
        );
        assert_eq!(system.interact_using(OBJ, ACTOR, EntityId(404), &tools), InteractOutcome::NotHandled);

        system.toggle_panel(OBJ).unwrap();
        assert_eq!(system.interact_using(OBJ, ACTOR, MULTITOOL, &tools), InteractOutcome::NotHandled);
    }

    #[test]
    fn test_toggle_panel_events() {
        let mut system = system();
        system.open_ui(OBJ, ACTOR).unwrap();
        system.events_mut().clear_history();

        assert!(!system.toggle_panel(OBJ).unwrap());
        assert_eq!(system.panel(OBJ).unwrap().ui_viewers().count(), 0);
        assert_eq!(system.examine(OBJ), Some(EXAMINE_PANEL_CLOSED));

        let kinds: Vec<_> = system.events().history().cloned().collect();
        assert!(kinds.contains(&WiresEvent::AppearanceChanged { object: OBJ, panel_open_visible: false }));
        assert!(kinds.contains(&WiresEvent::Sound { object: OBJ, sound: WireSound::ScrewdriverClose }));
        assert!(kinds.contains(&WiresEvent::UiClosed { object: OBJ }));

        assert!(system.toggle_panel(OBJ).unwrap());
        assert_eq!(system.examine(OBJ), Some(EXAMINE_PANEL_OPEN));
    }

    #[test]
    fn test_panel_visibility() {
        let mut system = system();
        system.set_panel_visible(OBJ, false).unwrap();
        assert!(matches!(
            system.events().history().last(),
            Some(WiresEvent::AppearanceChanged { panel_open_visible: false, .. })
        ));
    }

    #[test]
    fn test_set_data_publishes_on_change() {
        let mut system = system();
        let counter = std::rc::Rc::new(std::cell::Cell::new(0));
        let c = counter.clone();
        system
            .events_mut()
            .subscribe(EventFilter::Snapshots, move |_| c.set(c.get() + 1));

        let key = StateKey::from("alarm");
        assert!(system.set_data(OBJ, key.clone(), 1i64).unwrap());
        assert!(!system.set_data(OBJ, key.clone(), 1i64).unwrap());
        assert_eq!(counter.get(), 1);

        assert_eq!(
            system.set_data(EntityId(9), key, 1i64),
            Err(WiresError::PanelNotFound(EntityId(9)))
        );
    }

    #[test]
    fn test_map_init_stable() {
        let mut system = system();
        system.map_init(OBJ).unwrap();

        let serial = system.serial_number(OBJ).unwrap();
        let seed = system.panel(OBJ).unwrap().wire_seed();
        assert_eq!(serial.chars().count(), 9);
        assert!(seed >= 1);

        system.map_init(OBJ).unwrap();
        assert_eq!(system.serial_number(OBJ).unwrap(), serial);
        assert_eq!(system.panel(OBJ).unwrap().wire_seed(), seed);
        assert_eq!(system.snapshot(OBJ).unwrap().serial_number.as_deref(), Some(serial.as_str()));
    }

    #[test]
    fn test_remove_panel_drops_timers() {
        let mut system = system();
        let fired = std::rc::Rc::new(std::cell::Cell::new(false));
        let f = fired.clone();
        system
            .start_wire_action(OBJ, 0.0, StateKey::from("x"), WireId(0), move |_, _, _| f.set(true))
            .unwrap();

        assert!(system.remove_panel(OBJ).is_some());
        assert!(system.timed_actions().is_empty());
        system.update(1.0);
        assert!(!fired.get());
    }

    #[test]
    fn test_cancel_wire_action() {
        let mut system = system();
        let outcome = std::rc::Rc::new(std::cell::Cell::new(None));
        let o = outcome.clone();
        system
            .start_wire_action(OBJ, 10.0, StateKey::from("x"), WireId(0), move |_, _, result| o.set(Some(result)))
            .unwrap();

        assert!(system.cancel_wire_action(OBJ, &StateKey::from("x")));
        assert!(!system.cancel_wire_action(OBJ, &StateKey::from("x")));
        system.update(0.016);
        assert_eq!(outcome.get(), Some(TimedOutcome::Cancelled));
        assert!(!system.is_wire_action_pending(OBJ, &StateKey::from("x")));
    }

    #[test]
    fn test_start_wire_action_unknown_wire() {
        let mut system = system();
        let result = system.start_wire_action(OBJ, 1.0, StateKey::from("x"), WireId(50), |_, _, _| {});
        assert_eq!(
            result,
            Err(WiresError::WireNotFound { owner: OBJ, wire: WireId(50) })
        );
    }

    #[test]
    fn test_reset_round() {
        let mut system = system();
        system.reset_round();
        assert!(system.layouts().is_empty());
        assert_eq!(system.panel_count(), 1);
    }
}
