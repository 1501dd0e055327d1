//! Configuração do subsistema de fios (wires.toml)

use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::error::{WiresError, WiresResult};
use crate::types::{WireColor, WireLetter};

/// Tempo padrão (s) para abrir/fechar o painel com chave de fenda
pub const DEFAULT_SCREW_TIME: f32 = 2.5;

/// Configuração do sistema de fios
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WiresConfig {
    /// Semente do RNG (None = entropia do sistema)
    pub rng_seed: Option<u64>,
    /// Tempo (s) de uso da chave de fenda no painel
    pub screw_time: f32,
    /// Chance de o número de série usar o alfabeto alternativo
    pub alternate_serial_chance: f64,
    /// Tamanho do histórico de eventos
    pub event_history_size: usize,
    /// Cor usada quando o pool de cores se esgota
    pub fallback_color: WireColor,
    /// Letra usada quando o pool de letras se esgota
    pub fallback_letter: WireLetter,
}

impl Default for WiresConfig {
    fn default() -> Self {
        Self {
            rng_seed: None,
            screw_time: DEFAULT_SCREW_TIME,
            alternate_serial_chance: 0.01,
            event_history_size: 100,
            fallback_color: WireColor::Red,
            fallback_letter: WireLetter::Alpha,
        }
    }
}

impl WiresConfig {
    /// Configuração determinística (testes, replays)
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng_seed: Some(seed),
            ..Self::default()
        }
    }

    /// Parse de TOML
    pub fn from_toml_str(content: &str) -> WiresResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Carrega de arquivo
    pub fn from_file(path: &Path) -> WiresResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| WiresError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Valida limites
    pub fn validate(&self) -> WiresResult<()> {
        if !(0.0..=1.0).contains(&self.alternate_serial_chance) {
            return Err(WiresError::InvalidConfiguration(format!(
                "alternate_serial_chance must be within [0, 1], got {}",
                self.alternate_serial_chance
            )));
        }
        if !self.screw_time.is_finite() || self.screw_time < 0.0 {
            return Err(WiresError::InvalidConfiguration(format!(
                "screw_time must be a non-negative number, got {}",
                self.screw_time
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WiresConfig::default();
        assert_eq!(config.screw_time, 2.5);
        assert_eq!(config.fallback_color, WireColor::Red);
        assert_eq!(config.fallback_letter, WireLetter::Alpha);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config = WiresConfig::from_toml_str("rng_seed = 42\nscrew_time = 1.0\n").unwrap();
        assert_eq!(config.rng_seed, Some(42));
        assert_eq!(config.screw_time, 1.0);
        assert_eq!(config.event_history_size, 100);
    }

    #[test]
    fn test_invalid_chance() {
        let result = WiresConfig::from_toml_str("alternate_serial_chance = 2.0\n");
        assert!(matches!(result, Err(WiresError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_fallback_from_toml() {
        let config = WiresConfig::from_toml_str("fallback_color = \"Gray\"\nfallback_letter = \"Omega\"\n").unwrap();
        assert_eq!(config.fallback_color, WireColor::Gray);
        assert_eq!(config.fallback_letter, WireLetter::Omega);
    }

    #[test]
    fn test_seeded() {
        assert_eq!(WiresConfig::seeded(7).rng_seed, Some(7));
    }
}
