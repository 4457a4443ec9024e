//! # Erros do Motor
//!
//! Três famílias de erro, todas via `thiserror`:
//!
//! | Tipo | Quando | Fatal? |
//! |------|--------|--------|
//! | [`ParseError`] | Texto de KB ou consulta malformado | Sim, para aquele texto |
//! | [`LoadError`] | Carregamento da KB | Sim, antes de qualquer consulta |
//! | [`SolveError`] | Busca excedeu um limite configurado | Encerra aquela consulta |
//!
//! Falha lógica (objetivo não demonstrável) **não** é erro: é uma sequência
//! vazia de soluções.

use std::path::PathBuf;

use thiserror::Error;

/// Erro de sintaxe com posição (linha e coluna começam em 1).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("erro de sintaxe na linha {line}, coluna {column}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}

/// Falha ao montar a base de conhecimento.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Syntax(#[from] ParseError),

    /// A aridade declarada não bate com o número de argumentos fornecidos.
    #[error("`{functor}` declarado com aridade {declared}, mas recebeu {found} argumento(s)")]
    ArityMismatch {
        functor: String,
        declared: usize,
        found: usize,
    },

    /// O mesmo functor aparece com duas aridades diferentes na KB.
    #[error("`{functor}` usado com aridade {first} e também com aridade {second}")]
    InconsistentArity {
        functor: String,
        first: usize,
        second: usize,
    },

    #[error("cláusula inválida: {0}")]
    InvalidClause(String),

    #[error("falha ao ler {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A busca foi interrompida por um limite de recursos.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    #[error("profundidade máxima ({limit}) excedida ao resolver `{goal}`")]
    DepthExceeded { limit: usize, goal: String },

    #[error("limite de {limit} passos de resolução excedido")]
    StepLimitExceeded { limit: u64 },
}
