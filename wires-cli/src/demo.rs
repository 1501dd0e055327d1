//! Comportamentos de demonstração usados pelo simulador
//!
//! - `power`: cortar derruba a energia, pulsar derruba por alguns segundos
//! - `bolt`: cortar baixa os ferrolhos, pulsar alterna
//! - `timer`: pulsar arma uma contagem; cortar desarma

use wires_core::{
    EntityId, StateKey, StatusKey, StatusLightData, StatusLightState, TemplateStore, Wire,
    WireColor, WiresResult,
};
use wires_system::{ActionContext, BehaviorRegistry, TimedOutcome, WireAction};

/// Layouts embutidos (quando nenhum arquivo é passado)
pub const DEFAULT_LAYOUTS: &str = r#"
[[layout]]
id = "Airlock"
wires = ["power", "power", "bolt", "timer"]
dummy_wires = 2

[[layout]]
id = "AirlockCommand"
parent = "Airlock"

[[layout]]
id = "Vending"
wires = ["power", "timer"]
dummy_wires = 1
colors = ["Red", "Blue", "Green", "Gold"]
"#;

/// Duração da queda de energia causada por pulso (s)
const POWER_PULSE_TIME: f32 = 5.0;
/// Contagem armada pelo pulso do timer (s)
const TIMER_COUNTDOWN: f32 = 10.0;

const POWER_CUT_COUNT: StateKey = StateKey::from_static("power:cut");
const POWER_PULSED: StateKey = StateKey::from_static("power:pulsed");
const POWER_PULSE_ACTION: StateKey = StateKey::from_static("power:pulse");
const BOLTED: StateKey = StateKey::from_static("bolt:down");
const TIMER_ACTION: StateKey = StateKey::from_static("timer:countdown");
const TIMER_FIRED: StateKey = StateKey::from_static("timer:fired");

/// Registro com os comportamentos de demonstração
pub fn registry() -> WiresResult<BehaviorRegistry> {
    let mut registry = BehaviorRegistry::new();
    registry.register_default::<PowerWire>("power")?;
    registry.register_default::<BoltWire>("bolt")?;
    registry.register_default::<TimerWire>("timer")?;
    Ok(registry)
}

/// Templates embutidos
pub fn default_templates() -> WiresResult<TemplateStore> {
    TemplateStore::from_toml_str(DEFAULT_LAYOUTS)
}

// ═══════════════════════════════════════════════════════════════════════════════
// POWER
// ═══════════════════════════════════════════════════════════════════════════════

/// Energia principal. Com mais de um fio, qualquer um cortado derruba.
#[derive(Debug, Default)]
pub struct PowerWire {
    wires: usize,
}

impl WireAction for PowerWire {
    fn status_key(&self) -> Option<StatusKey> {
        Some(StatusKey::from("power"))
    }

    fn bind(&mut self, _wire: &Wire, occurrence: usize) -> bool {
        self.wires = self.wires.max(occurrence);
        true
    }

    fn cut(&mut self, ctx: &mut ActionContext<'_>, _actor: EntityId, wire: &Wire) -> bool {
        let key = StateKey::for_wire("power:cut", wire.id);
        if !ctx.has(&key) {
            ctx.set(key, true);
            let count = ctx.get::<i64>(&POWER_CUT_COUNT).unwrap_or(0);
            ctx.set(POWER_CUT_COUNT, count + 1);
        }
        true
    }

    fn mend(&mut self, ctx: &mut ActionContext<'_>, _actor: EntityId, wire: &Wire) -> bool {
        if ctx.remove(&StateKey::for_wire("power:cut", wire.id)).is_some() {
            let count = ctx.get::<i64>(&POWER_CUT_COUNT).unwrap_or(0);
            ctx.set(POWER_CUT_COUNT, (count - 1).max(0));
        }
        true
    }

    fn pulse(&mut self, ctx: &mut ActionContext<'_>, _actor: EntityId, wire: &Wire) {
        ctx.set(POWER_PULSED, true);
        ctx.start_timed_action(POWER_PULSE_TIME, POWER_PULSE_ACTION, wire, |ctx, _, _| {
            ctx.set(POWER_PULSED, false);
        });
    }

    fn status_light(&self, ctx: &ActionContext<'_>, _wire: &Wire) -> Option<StatusLightData> {
        let cut = ctx.get::<i64>(&POWER_CUT_COUNT).unwrap_or(0) > 0;
        let pulsed = ctx.get::<bool>(&POWER_PULSED).unwrap_or(false);
        let state = match (ctx.is_powered(), cut, pulsed) {
            (false, _, _) | (_, true, _) => StatusLightState::Off,
            (true, false, true) => StatusLightState::BlinkingFast,
            (true, false, false) => StatusLightState::On,
        };
        Some(StatusLightData::new(WireColor::Red, state, "POWR"))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// BOLT
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
pub struct BoltWire;

impl WireAction for BoltWire {
    fn status_key(&self) -> Option<StatusKey> {
        Some(StatusKey::from("bolt"))
    }

    fn cut(&mut self, ctx: &mut ActionContext<'_>, _actor: EntityId, _wire: &Wire) -> bool {
        ctx.set(BOLTED, true);
        true
    }

    fn mend(&mut self, _ctx: &mut ActionContext<'_>, _actor: EntityId, _wire: &Wire) -> bool {
        true
    }

    fn pulse(&mut self, ctx: &mut ActionContext<'_>, _actor: EntityId, _wire: &Wire) {
        let bolted = ctx.get::<bool>(&BOLTED).unwrap_or(false);
        ctx.set(BOLTED, !bolted);
    }

    fn status_light(&self, ctx: &ActionContext<'_>, _wire: &Wire) -> Option<StatusLightData> {
        let state = if ctx.get::<bool>(&BOLTED).unwrap_or(false) {
            StatusLightState::On
        } else {
            StatusLightState::Off
        };
        Some(StatusLightData::new(WireColor::Orange, state, "BOLT"))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TIMER
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
pub struct TimerWire;

impl WireAction for TimerWire {
    fn status_key(&self) -> Option<StatusKey> {
        Some(StatusKey::from("timer"))
    }

    fn cut(&mut self, ctx: &mut ActionContext<'_>, _actor: EntityId, _wire: &Wire) -> bool {
        ctx.cancel_timed_action(&TIMER_ACTION);
        true
    }

    fn mend(&mut self, _ctx: &mut ActionContext<'_>, _actor: EntityId, _wire: &Wire) -> bool {
        true
    }

    fn pulse(&mut self, ctx: &mut ActionContext<'_>, _actor: EntityId, wire: &Wire) {
        ctx.start_timed_action(TIMER_COUNTDOWN, TIMER_ACTION, wire, |ctx, _, outcome| {
            if outcome == TimedOutcome::Completed {
                let fired = ctx.get::<i64>(&TIMER_FIRED).unwrap_or(0);
                ctx.set(TIMER_FIRED, fired + 1);
            }
        });
    }

    fn status_light(&self, ctx: &ActionContext<'_>, _wire: &Wire) -> Option<StatusLightData> {
        let state = if ctx.is_timed_action_pending(&TIMER_ACTION) {
            StatusLightState::BlinkingSlow
        } else {
            StatusLightState::Off
        };
        Some(StatusLightData::new(WireColor::Cyan, state, "TIMR"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wires_core::{ToolQuality, WiresAction, WiresConfig};
    use wires_system::{PanelConfig, StaticInteraction, WiresSystem};

    const OBJ: EntityId = EntityId(1);
    const ACTOR: EntityId = EntityId(10);
    const CUTTERS: EntityId = EntityId(11);

    #[test]
    fn test_default_layouts_parse() {
        let templates = default_templates().unwrap();
        assert_eq!(templates.len(), 3);
        assert!(templates.resolve_effective("AirlockCommand").unwrap().has_wires());
    }

    #[test]
    fn test_registry_names() {
        let registry = registry().unwrap();
        assert_eq!(registry.names(), vec!["bolt", "power", "timer"]);
    }

    #[test]
    fn test_power_stays_down_while_any_wire_cut() {
        let mut system = WiresSystem::new(WiresConfig::seeded(3), default_templates().unwrap(), registry().unwrap()).unwrap();
        system.add_panel(OBJ, PanelConfig::with_layout("Airlock").opened()).unwrap();
        let mut tools = StaticInteraction::new().with_tool(CUTTERS, [ToolQuality::Cutting]);

        let power: Vec<_> = system
            .wires_with_behavior(OBJ, "power")
            .unwrap()
            .iter()
            .map(|w| w.id)
            .collect();
        assert_eq!(power.len(), 2);

        let light = |system: &WiresSystem| {
            system.panel(OBJ).unwrap().store().status(&StatusKey::from("power")).unwrap().state
        };

        system.apply_action(OBJ, ACTOR, CUTTERS, power[0], WiresAction::Cut, &mut tools);
        system.apply_action(OBJ, ACTOR, CUTTERS, power[0], WiresAction::Cut, &mut tools);
        system.apply_action(OBJ, ACTOR, CUTTERS, power[1], WiresAction::Cut, &mut tools);
        assert_eq!(light(&system), StatusLightState::Off);

        system.apply_action(OBJ, ACTOR, CUTTERS, power[0], WiresAction::Mend, &mut tools);
        assert_eq!(light(&system), StatusLightState::Off);

        system.apply_action(OBJ, ACTOR, CUTTERS, power[1], WiresAction::Mend, &mut tools);
        assert_eq!(light(&system), StatusLightState::On);
    }
}
