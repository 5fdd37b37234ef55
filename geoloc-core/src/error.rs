//! # Taxonomia de Erros
//!
//! Três famílias de falha, sem nenhuma tentativa de repetição (a extração é
//! determinística, repetir não mudaria o resultado):
//!
//! | Família            | Variantes                                   | Quando ocorre              |
//! |--------------------|---------------------------------------------|----------------------------|
//! | Entrada inválida   | `InvalidInput`                              | documento ausente          |
//! | Falha de modelo    | `ModelRead`, `ModelParse`, `ModelInvalid`   | somente na construção      |
//! | Violação de contrato | `ContractViolation`                       | bug em um colaborador      |

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// O documento não foi fornecido (equivalente ao `null` de outras APIs).
    #[error("entrada inválida: {0}")]
    InvalidInput(String),

    #[error("falha ao ler o arquivo de modelo {path}: {source}")]
    ModelRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("arquivo de modelo malformado {path}: {source}")]
    ModelParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("modelo inconsistente em {path}: {reason}")]
    ModelInvalid { path: PathBuf, reason: String },

    /// Um invariante de índices/spans foi quebrado por um colaborador.
    /// Indica defeito no tokenizador, reconhecedor ou etiquetador, nunca entrada ruim.
    #[error("violação de contrato: {0}")]
    ContractViolation(String),
}

impl ExtractError {
    /// Verdadeiro para qualquer falha de carregamento de modelo.
    pub fn is_model_load_failure(&self) -> bool {
        matches!(
            self,
            ExtractError::ModelRead { .. }
                | ExtractError::ModelParse { .. }
                | ExtractError::ModelInvalid { .. }
        )
    }

    pub(crate) fn contract(message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::warn!(%message, "violação de contrato detectada");
        ExtractError::ContractViolation(message)
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
