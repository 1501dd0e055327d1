//! Snapshot publicado para o observador remoto
//!
//! Estado completo (não diff) do painel: fios como `(id, cut, color, letter)`,
//! luzes de status, nome da placa, número de série e semente. Nenhum campo
//! identifica o comportamento ligado a um fio.

use serde::{Deserialize, Serialize};
use wires_core::{ClientWire, StatusEntry};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WiresSnapshot {
    pub wires: Vec<ClientWire>,
    pub statuses: Vec<StatusEntry>,
    pub board_name: Option<String>,
    pub serial_number: Option<String>,
    pub wire_seed: i32,
}

impl WiresSnapshot {
    /// Serializa para JSON (protocolo de sincronização)
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Fio do snapshot por id
    pub fn wire(&self, id: wires_core::WireId) -> Option<&ClientWire> {
        self.wires.iter().find(|w| w.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wires_core::{WireColor, WireId, WireLetter};

    #[test]
    fn test_snapshot_json_shape() {
        let snapshot = WiresSnapshot {
            wires: vec![ClientWire {
                id: WireId(0),
                cut: true,
                color: WireColor::Cyan,
                letter: WireLetter::Psi,
            }],
            statuses: Vec::new(),
            board_name: Some("Airlock Control".into()),
            serial_number: Some("ABCD-1234".into()),
            wire_seed: 77,
        };

        let json: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(json["wires"][0]["id"], 0);
        assert_eq!(json["wires"][0]["cut"], true);
        assert_eq!(json["wires"][0]["color"], "Cyan");
        assert_eq!(json["wires"][0]["letter"], "Psi");
        assert_eq!(json["wire_seed"], 77);
    }

    #[test]
    fn test_snapshot_wire_lookup() {
        let snapshot = WiresSnapshot::default();
        assert!(snapshot.wire(WireId(0)).is_none());
    }
}
