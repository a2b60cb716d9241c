//! User models and the fixed role-label set.

use serde::{Deserialize, Serialize};

/// Job-role labels used across the print-shop pipeline.
///
/// Serialized exactly as the backend spells them, accents included.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Cargo {
    #[serde(rename = "Comercial")]
    Comercial,
    #[serde(rename = "Dprog Gráfica")]
    DprogGrafica,
    #[serde(rename = "Pré-impressão")]
    PreImpressao,
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
    #[serde(rename = "Administrador")]
    Administrador,
}

impl Cargo {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Comercial => "Comercial",
            Self::DprogGrafica => "Dprog Gráfica",
            Self::PreImpressao => "Pré-impressão",
            Self::SupervisaoImpressao => "Supervisão de Impressão",
            Self::Ctp => "CTP",
            Self::ImpressaoOffset => "Impressão Offset",
            Self::ImpressaoDigital => "Impressão Digital",
            Self::Acabamento => "Acabamento",
            Self::Expedicao => "Expedição",
            Self::Administrador => "Administrador",
        }
    }

    /// Resolve a role from its exact label.
    pub fn from_label(label: &str) -> Option<Cargo> {
        Self::all().iter().copied().find(|c| c.as_str() == label)
    }

    /// All roles, in the order the admin form offers them.
    pub fn all() -> &'static [Cargo] {
        &[
            Self::Comercial,
            Self::DprogGrafica,
            Self::PreImpressao,
            Self::SupervisaoImpressao,
            Self::Ctp,
            Self::ImpressaoOffset,
            Self::ImpressaoDigital,
            Self::Acabamento,
            Self::Expedicao,
            Self::Administrador,
        ]
    }
}

impl std::fmt::Display for Cargo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub nome: String,
    pub email: String,
    pub cargo: Cargo,
    /// Privilege tier, 1..=3. Level 3 unlocks the admin panel regardless of cargo.
    pub nivel_acesso: i32,
    pub ativo: bool,
}

/// Body for `POST /api/auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub nome: String,
    pub email: String,
    pub senha: String,
    pub cargo: Cargo,
    #[serde(default = "default_nivel_acesso")]
    pub nivel_acesso: i32,
}

fn default_nivel_acesso() -> i32 {
    1
}

/// Body of a successful `POST /api/auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cargo_labels_round_trip() {
        for cargo in Cargo::all() {
            let json = serde_json::to_string(cargo).unwrap();
            assert_eq!(json, format!("\"{}\"", cargo.as_str()));
            let back: Cargo = serde_json::from_str(&json).unwrap();
            assert_eq!(back, *cargo);
        }
    }

    #[test]
    fn test_cargo_accented_labels() {
        let cargo: Cargo = serde_json::from_str("\"Supervisão de Impressão\"").unwrap();
        assert_eq!(cargo, Cargo::SupervisaoImpressao);
        assert_eq!(cargo.to_string(), "Supervisão de Impressão");
    }

    #[test]
    fn test_create_user_defaults_nivel() {
        let req: CreateUserRequest = serde_json::from_str(
            r#"{"nome":"Ana","email":"ana@cepe.com.br","senha":"s","cargo":"Comercial"}"#,
        )
        .unwrap();
        assert_eq!(req.nivel_acesso, 1);
    }

    #[test]
    fn test_user_deserialize() {
        let user: User = serde_json::from_str(
            r#"{"id":7,"nome":"Admin","email":"admin@cepe.com.br","cargo":"Administrador","nivel_acesso":3,"ativo":true}"#,
        )
        .unwrap();
        assert_eq!(user.cargo, Cargo::Administrador);
        assert_eq!(user.nivel_acesso, 3);
        assert!(user.ativo);
    }
}
