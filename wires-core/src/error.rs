//! Erros do painel de fios

use thiserror::Error;
use crate::types::{EntityId, WireId};

pub type WiresResult<T> = Result<T, WiresError>;

/// Erros de configuração e de consulta do subsistema de fios
///
/// Rejeições de usuário (ferramenta errada, fio cortado) não são erros:
/// viram popups. Estes variantes cobrem configuração inválida e consultas
/// a painéis/fios inexistentes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WiresError {
    /// Template de layout não encontrado
    #[error("Wire layout template not found: {0}")]
    TemplateNotFound(String),

    /// Cadeia de herança de templates com ciclo
    #[error("Wire layout template inheritance cycle at: {0}")]
    TemplateCycle(String),

    /// Template duplicado
    #[error("Wire layout template already registered: {0}")]
    TemplateAlreadyRegistered(String),

    /// Tipo de comportamento desconhecido
    #[error("Unknown wire behavior: {0}")]
    UnknownBehavior(String),

    /// Tipo de comportamento já registrado
    #[error("Wire behavior already registered: {0}")]
    BehaviorAlreadyRegistered(String),

    /// Objeto sem painel de fios
    #[error("Wire panel not found for entity {0}")]
    PanelNotFound(EntityId),

    /// Objeto já possui painel
    #[error("Wire panel already registered for entity {0}")]
    PanelAlreadyRegistered(EntityId),

    /// Fio inexistente no painel
    #[error("Wire {wire} not found on entity {owner}")]
    WireNotFound { owner: EntityId, wire: WireId },

    /// Configuração inválida
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Falha ao ler/parsear arquivo de configuração
    #[error("Config error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for WiresError {
    fn from(err: toml::de::Error) -> Self {
        WiresError::Config(err.to_string())
    }
}

impl From<std::io::Error> for WiresError {
    fn from(err: std::io::Error) -> Self {
        WiresError::Config(err.to_string())
    }
}

impl WiresError {
    /// Erros de configuração deixam o painel inerte, mas nunca derrubam o processo
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            WiresError::TemplateNotFound(_)
                | WiresError::TemplateCycle(_)
                | WiresError::TemplateAlreadyRegistered(_)
                | WiresError::UnknownBehavior(_)
                | WiresError::BehaviorAlreadyRegistered(_)
                | WiresError::InvalidConfiguration(_)
                | WiresError::Config(_)
        )
    }
}
