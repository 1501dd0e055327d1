//! Tipos básicos do painel de fios

use std::fmt;
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════════
// IDENTIFICADORES
// ═══════════════════════════════════════════════════════════════════════════════

/// Identificador de entidade (objeto com painel, ator ou ferramenta)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Identificador de fio exposto ao cliente.
///
/// Coincide com a posição final do fio no painel e não revela o
/// comportamento ligado a ele.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WireId(pub u32);

impl WireId {
    /// Posição no painel
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for WireId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CORES E LETRAS
// ═══════════════════════════════════════════════════════════════════════════════

/// Cor do fio
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WireColor {
    #[default]
    Red,
    Blue,
    Green,
    Orange,
    Brown,
    Gold,
    Gray,
    Cyan,
    Navy,
    Purple,
    Pink,
    Fuchsia,
}

impl WireColor {
    /// Todas as cores, na ordem de declaração
    pub const ALL: [WireColor; 12] = [
        WireColor::Red,
        WireColor::Blue,
        WireColor::Green,
        WireColor::Orange,
        WireColor::Brown,
        WireColor::Gold,
        WireColor::Gray,
        WireColor::Cyan,
        WireColor::Navy,
        WireColor::Purple,
        WireColor::Pink,
        WireColor::Fuchsia,
    ];

    /// Nome em minúsculas (chave de localização)
    pub fn name(self) -> &'static str {
        match self {
            WireColor::Red => "red",
            WireColor::Blue => "blue",
            WireColor::Green => "green",
            WireColor::Orange => "orange",
            WireColor::Brown => "brown",
            WireColor::Gold => "gold",
            WireColor::Gray => "gray",
            WireColor::Cyan => "cyan",
            WireColor::Navy => "navy",
            WireColor::Purple => "purple",
            WireColor::Pink => "pink",
            WireColor::Fuchsia => "fuchsia",
        }
    }
}

/// Letra grega impressa sob o fio
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WireLetter {
    #[default]
    Alpha,
    Beta,
    Gamma,
    Delta,
    Epsilon,
    Zeta,
    Eta,
    Theta,
    Iota,
    Kappa,
    Lambda,
    Mu,
    Nu,
    Xi,
    Omicron,
    Pi,
    Rho,
    Sigma,
    Tau,
    Upsilon,
    Phi,
    Chi,
    Psi,
    Omega,
}

impl WireLetter {
    /// Alfabeto completo
    pub const ALL: [WireLetter; 24] = [
        WireLetter::Alpha,
        WireLetter::Beta,
        WireLetter::Gamma,
        WireLetter::Delta,
        WireLetter::Epsilon,
        WireLetter::Zeta,
        WireLetter::Eta,
        WireLetter::Theta,
        WireLetter::Iota,
        WireLetter::Kappa,
        WireLetter::Lambda,
        WireLetter::Mu,
        WireLetter::Nu,
        WireLetter::Xi,
        WireLetter::Omicron,
        WireLetter::Pi,
        WireLetter::Rho,
        WireLetter::Sigma,
        WireLetter::Tau,
        WireLetter::Upsilon,
        WireLetter::Phi,
        WireLetter::Chi,
        WireLetter::Psi,
        WireLetter::Omega,
    ];

    /// Símbolo grego minúsculo
    pub fn symbol(self) -> char {
        // α (U+03B1) .. ω (U+03C9), pulando o sigma final (U+03C2)
        let offset = self as u32;
        let code = if offset >= WireLetter::Sigma as u32 {
            0x03B1 + offset + 1
        } else {
            0x03B1 + offset
        };
        char::from_u32(code).unwrap_or('?')
    }
}

impl fmt::Display for WireLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// AÇÕES E FERRAMENTAS
// ═══════════════════════════════════════════════════════════════════════════════

/// Ação pedida pelo cliente sobre um fio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WiresAction {
    Cut,
    Mend,
    Pulse,
}

impl WiresAction {
    /// Qualidade de ferramenta exigida pela ação
    pub fn required_quality(self) -> ToolQuality {
        match self {
            WiresAction::Cut | WiresAction::Mend => ToolQuality::Cutting,
            WiresAction::Pulse => ToolQuality::Pulsing,
        }
    }
}

/// Qualidade de ferramenta relevante para o painel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolQuality {
    /// Alicate (cortar/emendar)
    Cutting,
    /// Multitool (pulsar)
    Pulsing,
    /// Chave de fenda (abrir/fechar o painel)
    Screwing,
}

impl ToolQuality {
    pub fn name(self) -> &'static str {
        match self {
            ToolQuality::Cutting => "Cutting",
            ToolQuality::Pulsing => "Pulsing",
            ToolQuality::Screwing => "Screwing",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_symbols() {
        assert_eq!(WireLetter::Alpha.symbol(), 'α');
        assert_eq!(WireLetter::Rho.symbol(), 'ρ');
        assert_eq!(WireLetter::Sigma.symbol(), 'σ');
        assert_eq!(WireLetter::Omega.symbol(), 'ω');
    }

    #[test]
    fn test_all_distinct() {
        use std::collections::HashSet;

        let colors: HashSet<_> = WireColor::ALL.iter().collect();
        assert_eq!(colors.len(), 12);

        let letters: HashSet<_> = WireLetter::ALL.iter().collect();
        assert_eq!(letters.len(), 24);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(WireColor::default(), WireColor::Red);
        assert_eq!(WireLetter::default(), WireLetter::Alpha);
    }

    #[test]
    fn test_required_quality() {
        assert_eq!(WiresAction::Cut.required_quality(), ToolQuality::Cutting);
        assert_eq!(WiresAction::Mend.required_quality(), ToolQuality::Cutting);
        assert_eq!(WiresAction::Pulse.required_quality(), ToolQuality::Pulsing);
    }

    #[test]
    fn test_ids_serialize_transparent() {
        let json = serde_json::to_string(&WireId(4)).unwrap();
        assert_eq!(json, "4");
        let json = serde_json::to_string(&EntityId(12)).unwrap();
        assert_eq!(json, "12");
    }
}
