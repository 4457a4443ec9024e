//! # Configuração do Solver
//!
//! Limites de busca e opções de rastreamento. A busca SLD ingênua não
//! detecta ciclos: uma regra recursiva sobre dados cíclicos (ex:
//! `ancestor/2` com `parent(a, b)` e `parent(b, a)`) não termina sozinha.
//! Os limites abaixo transformam esse laço num erro distinguível.
//!
//! | Campo | Padrão | Variável de ambiente (CLI) |
//! |-------|--------|----------------------------|
//! | `max_depth` | 50 | `FAMILY_KB_MAX_DEPTH` |
//! | `max_steps` | 1 000 000 | `FAMILY_KB_MAX_STEPS` (`0` = sem limite) |
//! | `trace` | `false` | — (`--trace`) |

use serde::Serialize;
use thiserror::Error;

/// Caminho padrão da KB de família (relativo à raiz do projeto).
pub const DEFAULT_KB_PATH: &str = "kb/family_kb.pl";

/// Profundidade máxima de aplicações de regra aninhadas numa derivação.
pub const DEFAULT_MAX_DEPTH: usize = 50;

/// Tentativas de unificação com cabeças de cláusula por consulta.
pub const DEFAULT_MAX_STEPS: u64 = 1_000_000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SolverConfig {
    /// Um objetivo introduzido por `n` aplicações de regra aninhadas tem
    /// profundidade `n`; acima de `max_depth` a busca para com
    /// [`SolveError::DepthExceeded`](crate::core::SolveError::DepthExceeded).
    pub max_depth: usize,
    /// `None` desliga o limite de passos.
    pub max_steps: Option<u64>,
    /// Registra [`TraceEvent`](crate::inference::TraceEvent)s durante a busca.
    pub trace: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_steps: Some(DEFAULT_MAX_STEPS),
            trace: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("max_depth deve ser pelo menos 1")]
    ZeroDepth,
    #[error("max_steps deve ser pelo menos 1 (use `None` para desligar)")]
    ZeroSteps,
}

impl SolverConfig {
    /// Converte o valor de linha de comando, onde `0` significa "sem limite".
    pub fn with_step_limit(mut self, steps: u64) -> Self {
        self.max_steps = (steps > 0).then_some(steps);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        if self.max_steps == Some(0) {
            return Err(ConfigError::ZeroSteps);
        }
        Ok(())
    }
}
