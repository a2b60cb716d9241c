//! Work-order ("ordem de serviço") models and display projections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TipoOs {
    Externa,
    Interna,
}

impl TipoOs {
    pub fn from_label(label: &str) -> Option<TipoOs> {
        match label {
            "Externa" => Some(Self::Externa),
            "Interna" => Some(Self::Interna),
            _ => None,
        }
    }
}

impl std::fmt::Display for TipoOs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Externa => write!(f, "Externa"),
            Self::Interna => write!(f, "Interna"),
        }
    }
}

/// Pipeline stage of a work order. Only the backend advances status;
/// this client displays it and never writes it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StatusOs {
    #[serde(rename = "OS Criada")]
    OsCriada,
    #[serde(rename = "Dprog Gráfica")]
    DprogGrafica,
    #[serde(rename = "Triagem")]
    Triagem,
    #[serde(rename = "Supervisão de Impressão")]
    SupervisaoImpressao,
    #[serde(rename = "CTP")]
    Ctp,
    #[serde(rename = "Impressão Offset")]
    ImpressaoOffset,
    #[serde(rename = "Impressão Digital")]
    ImpressaoDigital,
    #[serde(rename = "Acabamento")]
    Acabamento,
    #[serde(rename = "Expedição")]
    Expedicao,
    #[serde(rename = "Cliente (Entrega Final)")]
    ClienteEntregaFinal,
}

impl StatusOs {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OsCriada => "OS Criada",
            Self::DprogGrafica => "Dprog Gráfica",
            Self::Triagem => "Triagem",
            Self::SupervisaoImpressao => "Supervisão de Impressão",
            Self::Ctp => "CTP",
            Self::ImpressaoOffset => "Impressão Offset",
            Self::ImpressaoDigital => "Impressão Digital",
            Self::Acabamento => "Acabamento",
            Self::Expedicao => "Expedição",
            Self::ClienteEntregaFinal => "Cliente (Entrega Final)",
        }
    }

    /// Pipeline stages in board order.
    pub fn pipeline() -> &'static [StatusOs] {
        &[
            Self::OsCriada,
            Self::DprogGrafica,
            Self::Triagem,
            Self::SupervisaoImpressao,
            Self::Ctp,
            Self::ImpressaoOffset,
            Self::ImpressaoDigital,
            Self::Acabamento,
            Self::Expedicao,
            Self::ClienteEntregaFinal,
        ]
    }

    /// A work order is done once it reaches the customer.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::ClienteEntregaFinal)
    }
}

impl std::fmt::Display for StatusOs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrdemServico {
    pub id: i64,
    pub numero_os: String,
    pub tipo_os: TipoOs,
    pub descricao: Option<String>,
    pub details: Option<String>,
    pub workaround: Option<String>,
    pub data_source: Option<String>,
    pub url_imagem_capa: Option<String>,
    pub status: StatusOs,
    pub data_inicio: DateTime<Utc>,
}

/// Body for `POST /api/ordens-servico`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrdemRequest {
    pub numero_os: String,
    #[serde(default = "default_tipo_os")]
    pub tipo_os: TipoOs,
    pub descricao: Option<String>,
    pub details: Option<String>,
    pub workaround: Option<String>,
    pub data_source: Option<String>,
    pub url_imagem_capa: Option<String>,
}

fn default_tipo_os() -> TipoOs {
    TipoOs::Externa
}

/// Counters shown on the "Resumo" tab, derived from a fetched list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResumoOrdens {
    pub total: usize,
    pub em_andamento: usize,
    pub concluidas: usize,
}

impl ResumoOrdens {
    pub fn from_ordens(ordens: &[OrdemServico]) -> Self {
        let concluidas = ordens.iter().filter(|o| o.status.is_final()).count();
        Self {
            total: ordens.len(),
            em_andamento: ordens.len() - concluidas,
            concluidas,
        }
    }
}

/// Status-grouped projection returned by `GET /api/kanban`.
///
/// JSON object ordering is not trusted; columns are presented in pipeline
/// order, with any label this client does not know appended at the end.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct KanbanBoard(pub HashMap<String, Vec<OrdemServico>>);

impl KanbanBoard {
    /// Columns in board order. Empty columns absent from the response are skipped.
    pub fn columns(&self) -> Vec<(&str, &[OrdemServico])> {
        let mut columns: Vec<(&str, &[OrdemServico])> = Vec::with_capacity(self.0.len());
        for status in StatusOs::pipeline() {
            if let Some(items) = self.0.get(status.as_str()) {
                columns.push((status.as_str(), items.as_slice()));
            }
        }
        let mut extras: Vec<&String> = self
            .0
            .keys()
            .filter(|k| StatusOs::pipeline().iter().all(|s| s.as_str() != k.as_str()))
            .collect();
        extras.sort();
        for key in extras {
            columns.push((key.as_str(), self.0[key].as_slice()));
        }
        columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ordem(id: i64, status: StatusOs) -> OrdemServico {
        OrdemServico {
            id,
            numero_os: format!("OS-{id:04}"),
            tipo_os: TipoOs::Externa,
            descricao: None,
            details: None,
            workaround: None,
            data_source: None,
            url_imagem_capa: None,
            status,
            data_inicio: Utc::now(),
        }
    }

    #[test]
    fn test_status_final_label() {
        assert!(StatusOs::ClienteEntregaFinal.is_final());
        assert_eq!(
            StatusOs::ClienteEntregaFinal.as_str(),
            "Cliente (Entrega Final)"
        );
        for status in StatusOs::pipeline() {
            if *status != StatusOs::ClienteEntregaFinal {
                assert!(!status.is_final(), "{status} should not be final");
            }
        }
    }

    #[test]
    fn test_status_labels_round_trip() {
        for status in StatusOs::pipeline() {
            let json = serde_json::to_string(status).unwrap();
            let back: StatusOs = serde_json::from_str(&json).unwrap();
            assert_eq!(back, *status);
        }
    }

    #[test]
    fn test_resumo_counts() {
        let ordens = vec![
            ordem(1, StatusOs::ClienteEntregaFinal),
            ordem(2, StatusOs::Triagem),
            ordem(3, StatusOs::ImpressaoOffset),
        ];
        let resumo = ResumoOrdens::from_ordens(&ordens);
        assert_eq!(resumo.total, 3);
        assert_eq!(resumo.concluidas, 1);
        assert_eq!(resumo.em_andamento, 2);
    }

    #[test]
    fn test_resumo_empty() {
        let resumo = ResumoOrdens::from_ordens(&[]);
        assert_eq!(resumo.total, 0);
        assert_eq!(resumo.em_andamento, 0);
        assert_eq!(resumo.concluidas, 0);
    }

    #[test]
    fn test_kanban_columns_pipeline_order() {
        let mut map = HashMap::new();
        map.insert("Expedição".to_string(), vec![ordem(1, StatusOs::Expedicao)]);
        map.insert("OS Criada".to_string(), vec![ordem(2, StatusOs::OsCriada)]);
        map.insert("Revisão Especial".to_string(), vec![]);
        let board = KanbanBoard(map);

        let labels: Vec<&str> = board.columns().iter().map(|(label, _)| *label).collect();
        assert_eq!(labels, vec!["OS Criada", "Expedição", "Revisão Especial"]);
    }

    #[test]
    fn test_create_ordem_defaults_tipo() {
        let req: CreateOrdemRequest =
            serde_json::from_str(r#"{"numero_os":"OS-0001"}"#).unwrap();
        assert_eq!(req.tipo_os, TipoOs::Externa);
    }

    #[test]
    fn test_ordem_deserialize() {
        let ordem: OrdemServico = serde_json::from_str(
            r#"{
                "id": 12,
                "numero_os": "OS-0012",
                "tipo_os": "Interna",
                "descricao": "Cartaz institucional",
                "details": null,
                "workaround": null,
                "data_source": null,
                "url_imagem_capa": null,
                "status": "Impressão Digital",
                "data_inicio": "2025-03-14T12:30:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(ordem.tipo_os, TipoOs::Interna);
        assert_eq!(ordem.status, StatusOs::ImpressaoDigital);
        assert!(!ordem.status.is_final());
    }
}
