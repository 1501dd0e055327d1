//! Gerador de conjuntos de fios
//!
//! Resolve a definição de um painel (template ou lista ad hoc), posiciona
//! os fios (reaproveitando o layout em cache quando existir) e liga cada
//! fio ao seu comportamento.
//!
//! ```text
//!  definição ──► instâncias de comportamento ──► entradas (ações + dummies)
//!                                                    │
//!             layout em cache? ── sim ──► replay (cor/letra/posição)
//!                     │
//!                     └── não ──► shuffle + sorteio sem reposição ──► cache
//!                                                    │
//!                        ordenar por posição ──► initialize ──► bind(fio, ocorrência)
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, trace};
use wires_core::{
    BehaviorIndex, BehaviorSlot, EntityId, TemplateStore, Wire, WireColor, WireData, WireId,
    WireLayout, WireLetter, WiresError, WiresResult,
};
use crate::behavior::{BehaviorRegistry, BehaviorSet};
use crate::cache::LayoutCache;

/// Definição efetiva de um painel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireDefinition {
    /// Chave do cache de layout (None = layout não compartilhado)
    pub layout_id: Option<String>,
    /// Comportamentos (nomes de tipo), na ordem declarada
    pub behaviors: Vec<String>,
    pub dummy_wires: usize,
    pub colors: Vec<WireColor>,
    pub letters: Vec<WireLetter>,
}

impl WireDefinition {
    /// Definição ad hoc com pools completos
    pub fn ad_hoc(layout_id: Option<String>, behaviors: Vec<String>, dummy_wires: usize) -> Self {
        Self {
            layout_id,
            behaviors,
            dummy_wires,
            colors: WireColor::ALL.to_vec(),
            letters: WireLetter::ALL.to_vec(),
        }
    }

    /// Total de fios gerados
    pub fn wire_count(&self) -> usize {
        self.behaviors.len() + self.dummy_wires
    }
}

/// Resolve a definição de um painel.
///
/// - layout id com template resolvível → template (herdando do pai se o
///   template não declara fios);
/// - lista declarada na instância → ad hoc (layout id, se houver, continua
///   sendo a chave do cache);
/// - layout id sem template e sem lista → `TemplateNotFound`;
/// - nada → `Ok(None)` (painel vazio).
pub fn resolve_definition(
    templates: &TemplateStore,
    layout_id: Option<&str>,
    wire_actions: Option<&[String]>,
    dummy_wires: usize,
) -> WiresResult<Option<WireDefinition>> {
    if let Some(id) = layout_id {
        if templates.contains(id) {
            let template = templates.resolve_effective(id)?;
            return Ok(Some(WireDefinition {
                layout_id: Some(id.to_string()),
                behaviors: template.wires.clone().unwrap_or_default(),
                dummy_wires: template.dummy_wires,
                colors: template.color_pool(),
                letters: template.letter_pool(),
            }));
        }
    }

    match (wire_actions, layout_id) {
        (Some(actions), _) => Ok(Some(WireDefinition::ad_hoc(
            layout_id.map(str::to_string),
            actions.to_vec(),
            dummy_wires,
        ))),
        (None, Some(id)) => Err(WiresError::TemplateNotFound(id.to_string())),
        (None, None) => Ok(None),
    }
}

/// Resultado da geração: fios ordenados por posição e instâncias vivas
#[derive(Debug, Default)]
pub struct GeneratedWires {
    pub wires: Vec<Wire>,
    pub behaviors: BehaviorSet,
}

/// Sorteia e remove um elemento do pool; pool vazio devolve `fallback`
pub fn pick_and_take<T: Copy, R: Rng + ?Sized>(pool: &mut Vec<T>, rng: &mut R, fallback: T) -> T {
    if pool.is_empty() {
        return fallback;
    }
    let index = rng.gen_range(0..pool.len());
    pool.swap_remove(index)
}

fn take_value<T: PartialEq>(pool: &mut Vec<T>, value: &T) {
    if let Some(index) = pool.iter().position(|v| v == value) {
        pool.swap_remove(index);
    }
}

/// Gerador de fios
#[derive(Debug)]
pub struct WireSetGenerator<'a> {
    registry: &'a BehaviorRegistry,
    cache: &'a mut LayoutCache,
    fallback_color: WireColor,
    fallback_letter: WireLetter,
}

impl<'a> WireSetGenerator<'a> {
    pub fn new(registry: &'a BehaviorRegistry, cache: &'a mut LayoutCache) -> Self {
        Self {
            registry,
            cache,
            fallback_color: WireColor::default(),
            fallback_letter: WireLetter::default(),
        }
    }

    /// Cor/letra usadas quando os pools se esgotam
    pub fn with_fallback(mut self, color: WireColor, letter: WireLetter) -> Self {
        self.fallback_color = color;
        self.fallback_letter = letter;
        self
    }

    /// Gera os fios de um painel
    pub fn generate<R: Rng + ?Sized>(
        &mut self,
        owner: EntityId,
        definition: &WireDefinition,
        rng: &mut R,
    ) -> WiresResult<GeneratedWires> {
        let mut behaviors = BehaviorSet::new();
        let mut entries: Vec<BehaviorSlot> = Vec::with_capacity(definition.wire_count());

        for name in &definition.behaviors {
            let index = match behaviors.index_of(name) {
                Some(index) => index,
                None => behaviors.push(name.clone(), self.registry.create(name)?),
            };
            entries.push(BehaviorSlot::Action(index));
        }
        entries.extend(std::iter::repeat_n(BehaviorSlot::Dummy, definition.dummy_wires));

        let cached = definition
            .layout_id
            .as_deref()
            .and_then(|id| self.cache.get(id));

        let placements = match cached {
            Some(layout) => self.replay(&layout, definition, entries.len(), rng),
            None => {
                let placements = self.randomize(definition, entries.len(), rng);
                if let Some(id) = definition.layout_id.as_deref() {
                    self.cache
                        .put(id, placements.iter().copied().enumerate().collect());
                }
                placements
            }
        };

        let mut wires: Vec<Wire> = entries
            .iter()
            .zip(&placements)
            .map(|(slot, data)| {
                Wire::new(owner, WireId(data.position as u32), data.color, data.letter, *slot)
            })
            .collect();
        wires.sort_by_key(|w| w.id);

        behaviors.initialize_all();
        let mut occurrences: HashMap<BehaviorIndex, usize> = HashMap::new();
        for wire in wires.iter_mut() {
            let BehaviorSlot::Action(index) = wire.behavior else {
                continue;
            };
            let occurrence = occurrences.entry(index).or_insert(0);
            *occurrence += 1;
            if !behaviors.bind(wire, *occurrence) {
                trace!(
                    %owner,
                    wire = %wire.id,
                    behavior = behaviors.name(index).unwrap_or_default(),
                    "bind refused, wire downgraded to dummy"
                );
                wire.behavior = BehaviorSlot::Dummy;
            }
        }

        debug!(
            %owner,
            layout_id = definition.layout_id.as_deref().unwrap_or("-"),
            wires = wires.len(),
            behaviors = behaviors.len(),
            "wires generated"
        );

        Ok(GeneratedWires { wires, behaviors })
    }

    /// Posicionamento aleatório: entradas embaralhadas, cor e letra
    /// sorteadas sem reposição na ordem embaralhada.
    fn randomize<R: Rng + ?Sized>(&self, definition: &WireDefinition, count: usize, rng: &mut R) -> Vec<WireData> {
        let mut colors = definition.colors.clone();
        let mut letters = definition.letters.clone();

        let mut order: Vec<usize> = (0..count).collect();
        order.shuffle(rng);

        let mut placements = vec![WireData::new(self.fallback_letter, self.fallback_color, 0); count];
        for (position, &index) in order.iter().enumerate() {
            let color = pick_and_take(&mut colors, rng, self.fallback_color);
            let letter = pick_and_take(&mut letters, rng, self.fallback_letter);
            placements[index] = WireData::new(letter, color, position);
        }
        placements
    }

    /// Replay de layout em cache. Entradas sem especificação válida sorteiam
    /// dos pools restantes e ocupam as primeiras posições livres.
    fn replay<R: Rng + ?Sized>(
        &self,
        layout: &Arc<WireLayout>,
        definition: &WireDefinition,
        count: usize,
        rng: &mut R,
    ) -> Vec<WireData> {
        let mut colors = definition.colors.clone();
        let mut letters = definition.letters.clone();
        let mut used = vec![false; count];

        let mut replayed: Vec<Option<WireData>> = (0..count)
            .map(|index| {
                let data = *layout.get(index)?;
                if data.position >= count || used[data.position] {
                    return None;
                }
                used[data.position] = true;
                take_value(&mut colors, &data.color);
                take_value(&mut letters, &data.letter);
                Some(data)
            })
            .collect();

        let mut free = (0..count).filter(|p| !used[*p]).collect::<Vec<_>>().into_iter();
        for slot in replayed.iter_mut().filter(|s| s.is_none()) {
            let position = free.next().unwrap_or_default();
            let color = pick_and_take(&mut colors, rng, self.fallback_color);
            let letter = pick_and_take(&mut letters, rng, self.fallback_letter);
            *slot = Some(WireData::new(letter, color, position));
        }

        replayed.into_iter().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use wires_core::WireTemplate;
    use crate::behavior::{ActionContext, WireAction};

    #[derive(Debug, Default)]
    struct Noop;

    impl WireAction for Noop {
        fn cut(&mut self, _: &mut ActionContext<'_>, _: EntityId, _: &Wire) -> bool {
            true
        }
        fn mend(&mut self, _: &mut ActionContext<'_>, _: EntityId, _: &Wire) -> bool {
            true
        }
        fn pulse(&mut self, _: &mut ActionContext<'_>, _: EntityId, _: &Wire) {}
    }

    /// Aceita só a primeira ocorrência
    #[derive(Debug, Default)]
    struct OnlyFirst;

    impl WireAction for OnlyFirst {
        fn bind(&mut self, _: &Wire, occurrence: usize) -> bool {
            occurrence == 1
        }
        fn cut(&mut self, _: &mut ActionContext<'_>, _: EntityId, _: &Wire) -> bool {
            true
        }
        fn mend(&mut self, _: &mut ActionContext<'_>, _: EntityId, _: &Wire) -> bool {
            true
        }
        fn pulse(&mut self, _: &mut ActionContext<'_>, _: EntityId, _: &Wire) {}
    }

    fn registry() -> BehaviorRegistry {
        let mut registry = BehaviorRegistry::new();
        registry.register_default::<Noop>("noop").unwrap();
        registry.register_default::<OnlyFirst>("only-first").unwrap();
        registry
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolve_template() {
        let mut templates = TemplateStore::new();
        templates.insert(WireTemplate::new("Airlock", ["noop"], 2)).unwrap();
        templates.insert(WireTemplate::inheriting("AirlockCommand", "Airlock")).unwrap();

        let definition = resolve_definition(&templates, Some("AirlockCommand"), None, 0)
            .unwrap()
            .unwrap();
        assert_eq!(definition.layout_id.as_deref(), Some("AirlockCommand"));
        assert_eq!(definition.behaviors, names(&["noop"]));
        assert_eq!(definition.dummy_wires, 2);
    }

    #[test]
    fn test_resolve_ad_hoc_and_errors() {
        let templates = TemplateStore::new();
        let actions = names(&["noop"]);

        let ad_hoc = resolve_definition(&templates, Some("Shared"), Some(&actions), 1)
            .unwrap()
            .unwrap();
        assert_eq!(ad_hoc.layout_id.as_deref(), Some("Shared"));
        assert_eq!(ad_hoc.wire_count(), 2);

        assert_eq!(
            resolve_definition(&templates, Some("Missing"), None, 0),
            Err(WiresError::TemplateNotFound("Missing".into()))
        );
        assert_eq!(resolve_definition(&templates, None, None, 3), Ok(None));
    }

    #[test]
    fn test_pick_and_take_fallback() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut pool = vec![1, 2];
        let a = pick_and_take(&mut pool, &mut rng, 0);
        let b = pick_and_take(&mut pool, &mut rng, 0);
        assert_ne!(a, b);
        assert_eq!(pick_and_take(&mut pool, &mut rng, 0), 0);
    }

    #[test]
    fn test_generate_positions_and_ids() {
        let registry = registry();
        let mut cache = LayoutCache::new();
        let mut rng = StdRng::seed_from_u64(3);
        let definition = WireDefinition::ad_hoc(None, names(&["noop", "noop", "noop"]), 2);

        let generated = WireSetGenerator::new(&registry, &mut cache)
            .generate(EntityId(1), &definition, &mut rng)
            .unwrap();

        let ids: Vec<u32> = generated.wires.iter().map(|w| w.id.0).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
        assert_eq!(generated.behaviors.len(), 1);
        assert_eq!(generated.wires.iter().filter(|w| w.behavior.is_dummy()).count(), 2);

        let colors: HashSet<_> = generated.wires.iter().map(|w| w.color).collect();
        assert_eq!(colors.len(), 5);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_generate_pool_exhaustion() {
        let registry = registry();
        let mut cache = LayoutCache::new();
        let mut rng = StdRng::seed_from_u64(5);
        let mut definition = WireDefinition::ad_hoc(None, names(&["noop"]), 3);
        definition.colors = vec![WireColor::Blue];
        definition.letters = vec![WireLetter::Omega, WireLetter::Psi];

        let generated = WireSetGenerator::new(&registry, &mut cache)
            .with_fallback(WireColor::Gray, WireLetter::Beta)
            .generate(EntityId(1), &definition, &mut rng)
            .unwrap();

        let blue = generated.wires.iter().filter(|w| w.color == WireColor::Blue).count();
        let gray = generated.wires.iter().filter(|w| w.color == WireColor::Gray).count();
        let beta = generated.wires.iter().filter(|w| w.letter == WireLetter::Beta).count();
        assert_eq!((blue, gray, beta), (1, 3, 2));
    }

    #[test]
    fn test_generate_caches_and_replays() {
        let registry = registry();
        let mut cache = LayoutCache::new();
        let mut rng = StdRng::seed_from_u64(9);
        let definition = WireDefinition::ad_hoc(Some("Door".into()), names(&["noop", "only-first"]), 3);

        let first = WireSetGenerator::new(&registry, &mut cache)
            .generate(EntityId(1), &definition, &mut rng)
            .unwrap();
        assert!(cache.contains("Door"));

        let second = WireSetGenerator::new(&registry, &mut cache)
            .generate(EntityId(2), &definition, &mut rng)
            .unwrap();

        let view = |g: &GeneratedWires| -> Vec<_> {
            g.wires.iter().map(|w| (w.id, w.color, w.letter)).collect()
        };
        assert_eq!(view(&first), view(&second));
        assert!(second.wires.iter().all(|w| w.owner == EntityId(2)));
    }

    #[test]
    fn test_replay_fills_missing_entries() {
        let registry = registry();
        let mut cache = LayoutCache::new();
        cache.put(
            "Short",
            [(0, WireData::new(WireLetter::Alpha, WireColor::Red, 1))].into_iter().collect(),
        );

        let mut rng = StdRng::seed_from_u64(11);
        let definition = WireDefinition::ad_hoc(Some("Short".into()), names(&["noop"]), 2);
        let generated = WireSetGenerator::new(&registry, &mut cache)
            .generate(EntityId(1), &definition, &mut rng)
            .unwrap();

        assert_eq!(generated.wires.len(), 3);
        let replayed = &generated.wires[1];
        assert_eq!((replayed.color, replayed.letter), (WireColor::Red, WireLetter::Alpha));
        assert!(!replayed.behavior.is_dummy());
        assert!(generated.wires.iter().filter(|w| w.id != WireId(1)).all(|w| w.color != WireColor::Red));
    }

    #[test]
    fn test_bind_refusal_downgrades() {
        let registry = registry();
        let mut cache = LayoutCache::new();
        let mut rng = StdRng::seed_from_u64(13);
        let definition = WireDefinition::ad_hoc(None, names(&["only-first", "only-first", "only-first"]), 0);

        let generated = WireSetGenerator::new(&registry, &mut cache)
            .generate(EntityId(1), &definition, &mut rng)
            .unwrap();

        let bound: Vec<bool> = generated.wires.iter().map(|w| !w.behavior.is_dummy()).collect();
        assert_eq!(bound, vec![true, false, false]);
    }

    #[test]
    fn test_unknown_behavior_aborts() {
        let registry = registry();
        let mut cache = LayoutCache::new();
        let mut rng = StdRng::seed_from_u64(1);
        let definition = WireDefinition::ad_hoc(Some("Bad".into()), names(&["noop", "ghost"]), 0);

        let result = WireSetGenerator::new(&registry, &mut cache).generate(EntityId(1), &definition, &mut rng);
        assert!(matches!(result, Err(WiresError::UnknownBehavior(name)) if name == "ghost"));
        assert!(!cache.contains("Bad"));
    }
}
