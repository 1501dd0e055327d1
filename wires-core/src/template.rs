//! Templates de layout (protótipos declarativos)
//!
//! Um template declara a lista de comportamentos (por nome de tipo), a
//! quantidade de fios dummy e, opcionalmente, um pool reduzido de cores e
//! letras. Um template sem lista de fios herda a definição do pai.
//!
//! ```toml
//! [[layout]]
//! id = "Airlock"
//! wires = ["power", "bolt", "timer"]
//! dummy_wires = 2
//!
//! [[layout]]
//! id = "AirlockCommand"
//! parent = "Airlock"
//! ```

use std::collections::{HashMap, HashSet};
use std::path::Path;
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::error::{WiresError, WiresResult};
use crate::types::{WireColor, WireLetter};

/// Template de layout de fios
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireTemplate {
    /// Identificador do layout (também chave do cache)
    pub id: String,

    /// Template pai
    #[serde(default)]
    pub parent: Option<String>,

    /// Comportamentos (nomes de tipo), na ordem declarada
    #[serde(default)]
    pub wires: Option<Vec<String>>,

    /// Quantidade de fios inertes
    #[serde(default)]
    pub dummy_wires: usize,

    /// Pool de cores (padrão: todas)
    #[serde(default)]
    pub colors: Option<Vec<WireColor>>,

    /// Pool de letras (padrão: todas)
    #[serde(default)]
    pub letters: Option<Vec<WireLetter>>,
}

impl WireTemplate {
    /// Template com lista de comportamentos
    pub fn new<S: Into<String>>(id: impl Into<String>, wires: impl IntoIterator<Item = S>, dummy_wires: usize) -> Self {
        Self {
            id: id.into(),
            parent: None,
            wires: Some(wires.into_iter().map(Into::into).collect()),
            dummy_wires,
            colors: None,
            letters: None,
        }
    }

    /// Template que herda do pai
    pub fn inheriting(id: impl Into<String>, parent: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent: Some(parent.into()),
            wires: None,
            dummy_wires: 0,
            colors: None,
            letters: None,
        }
    }

    /// Restringe o pool de cores
    pub fn with_colors(mut self, colors: impl IntoIterator<Item = WireColor>) -> Self {
        self.colors = Some(colors.into_iter().collect());
        self
    }

    /// Restringe o pool de letras
    pub fn with_letters(mut self, letters: impl IntoIterator<Item = WireLetter>) -> Self {
        self.letters = Some(letters.into_iter().collect());
        self
    }

    /// Template declara fios próprios?
    pub fn has_wires(&self) -> bool {
        self.wires.as_ref().is_some_and(|w| !w.is_empty())
    }

    /// Pool de cores efetivo
    pub fn color_pool(&self) -> Vec<WireColor> {
        self.colors.clone().unwrap_or_else(|| WireColor::ALL.to_vec())
    }

    /// Pool de letras efetivo
    pub fn letter_pool(&self) -> Vec<WireLetter> {
        self.letters.clone().unwrap_or_else(|| WireLetter::ALL.to_vec())
    }
}

#[derive(Debug, Deserialize)]
struct TemplateFile {
    #[serde(default)]
    layout: Vec<WireTemplate>,
}

/// Store de templates indexado por id
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    templates: HashMap<String, WireTemplate>,
}

impl TemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Carrega templates de TOML (`[[layout]]`)
    pub fn from_toml_str(content: &str) -> WiresResult<Self> {
        let file: TemplateFile = toml::from_str(content)?;
        let mut store = Self::new();
        for template in file.layout {
            store.insert(template)?;
        }
        debug!(count = store.len(), "loaded wire layout templates");
        Ok(store)
    }

    /// Carrega templates de arquivo
    pub fn from_file(path: &Path) -> WiresResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| WiresError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Registra template; ids duplicados são rejeitados
    pub fn insert(&mut self, template: WireTemplate) -> WiresResult<()> {
        if self.templates.contains_key(&template.id) {
            return Err(WiresError::TemplateAlreadyRegistered(template.id));
        }
        self.templates.insert(template.id.clone(), template);
        Ok(())
    }

    /// Busca template por id, sem herança
    pub fn resolve(&self, id: &str) -> Option<&WireTemplate> {
        self.templates.get(id)
    }

    /// Busca template efetivo: sobe a cadeia de pais enquanto o template
    /// não declarar fios próprios.
    pub fn resolve_effective(&self, id: &str) -> WiresResult<&WireTemplate> {
        let mut visited = HashSet::new();
        let mut current = self
            .resolve(id)
            .ok_or_else(|| WiresError::TemplateNotFound(id.to_string()))?;

        loop {
            if current.has_wires() {
                return Ok(current);
            }

            let Some(parent) = current.parent.as_deref() else {
                return Ok(current);
            };

            if !visited.insert(current.id.clone()) {
                return Err(WiresError::TemplateCycle(current.id.clone()));
            }

            current = self
                .resolve(parent)
                .ok_or_else(|| WiresError::TemplateNotFound(parent.to_string()))?;
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    /// Ids registrados (ordem arbitrária)
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
