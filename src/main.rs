#![allow(dead_code)]
#![allow(rustdoc::broken_intra_doc_links)]
//! # family-kb — Base de Conhecimento de Família
//!
//! **Ponto de entrada principal**: carrega a KB de cláusulas de Horn e
//! responde consultas por resolução SLD.
//!
//! ## Fluxo de Inicialização
//!
//! ```text
//! main()
//!   ├── Configura tracing/logging (stderr)
//!   ├── Lê argumentos (clap) e valida SolverConfig
//!   ├── Carrega KB do disco (kb/family_kb.pl); falha aqui é fatal
//!   └── Com consultas na linha de comando: responde cada uma e sai
//!       Sem consultas: abre o REPL em stdin
//! ```
//!
//! ## Exemplo de Uso
//!
//! ```bash
//! # Uma consulta
//! cargo run -- "father(X, Y)."
//!
//! # Primeira prova com rastro, em JSON
//! cargo run -- --first --trace --json "grandparent(john, alice)"
//!
//! # REPL com logs detalhados
//! RUST_LOG=debug cargo run
//! ```

/// Módulo `config` — limites do solver e caminho padrão da KB.
mod config;

/// Módulo `core` — tipos fundamentais: Term, Clause, Substitution, KnowledgeBase.
mod core;

/// Módulo `inference` — unificação, solver SLD e interface de consultas.
mod inference;

/// Módulo `loader` — leitura da KB a partir do disco.
mod loader;

/// Módulo `repl` — laço interativo de consultas e formatação das respostas.
mod repl;

/// Módulo `syntax` — lexer e parser do formato textual de cláusulas.
mod syntax;

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::{SolverConfig, DEFAULT_KB_PATH, DEFAULT_MAX_DEPTH, DEFAULT_MAX_STEPS};
use crate::inference::InferenceEngine;
use crate::repl::{Repl, ReplOptions};

/// Consulta uma base de conhecimento de cláusulas de Horn.
#[derive(Parser, Debug)]
#[command(name = "family-kb", version)]
struct Cli {
    /// Arquivo de cláusulas a carregar.
    #[arg(long, env = "FAMILY_KB_PATH", default_value = DEFAULT_KB_PATH)]
    kb: PathBuf,

    /// Profundidade máxima de regras aninhadas numa derivação.
    #[arg(long, env = "FAMILY_KB_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Máximo de tentativas de unificação por consulta (0 = sem limite).
    #[arg(long, env = "FAMILY_KB_MAX_STEPS", default_value_t = DEFAULT_MAX_STEPS)]
    max_steps: u64,

    /// Imprime o rastro da prova após as respostas.
    #[arg(long)]
    trace: bool,

    /// Um relatório JSON por consulta.
    #[arg(long)]
    json: bool,

    /// Para na primeira resposta de cada consulta.
    #[arg(long)]
    first: bool,

    /// Consultas a responder; sem nenhuma, abre o REPL.
    queries: Vec<String>,
}

impl Cli {
    fn solver_config(&self) -> SolverConfig {
        SolverConfig {
            max_depth: self.max_depth,
            trace: self.trace,
            ..SolverConfig::default()
        }
        .with_step_limit(self.max_steps)
    }
}

fn main() -> Result<()> {
    // Logs vão para stderr; stdout fica só com as respostas.
    // Exemplo: RUST_LOG=debug cargo run
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.solver_config();
    config.validate().context("Configuração inválida")?;

    let kb = loader::load_kb(&cli.kb)
        .with_context(|| format!("Falha ao carregar a KB de {}", cli.kb.display()))?;
    let mut engine = InferenceEngine::new(kb, config);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.queries.is_empty() {
        let stdin = io::stdin();
        let options = ReplOptions {
            json: cli.json,
            first_only: cli.first,
            prompt: stdin.is_terminal(),
        };
        return Repl::new(&mut engine, options).run(stdin.lock(), &mut out);
    }

    let mut failed = 0;
    for query in &cli.queries {
        let report = engine.run_query(query, cli.first);
        if report.error.is_some() {
            failed += 1;
        }
        repl::render_report(&report, cli.json, &mut out)?;
    }
    tracing::info!(queries = cli.queries.len(), failed, "consultas respondidas");
    Ok(())
}
