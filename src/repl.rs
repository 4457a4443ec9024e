//! # REPL — Consultas Interativas
//!
//! Lê linhas da entrada e responde cada uma:
//!
//! | Linha | Ação |
//! |-------|------|
//! | `father(X, Y).` ou `?- father(X, Y).` | Executa a consulta |
//! | `:listing father/2` | Lista as cláusulas do predicado (sem argumento: todos) |
//! | `:stats` | Tamanho da KB e limites do solver |
//! | `:trace on` / `:trace off` | Liga/desliga o rastro da prova |
//! | `:help` | Ajuda |
//! | `:quit` | Sai |
//!
//! Erros de consulta são impressos e o laço continua.
//!
//! ## Formato das Respostas
//!
//! ```text
//! ?- father(X, mary).
//! X = john.
//! ?- sibling(mary, mary).
//! false.
//! ```

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use crate::core::Signature;
use crate::inference::{InferenceEngine, QueryReport};

const HELP: &str = "\
Consultas: escreva um objetivo, ex: `father(X, mary).` (o ponto final é opcional)
Comandos:
  :listing [nome/aridade]  lista cláusulas (ou predicados)
  :stats                   tamanho da KB e limites do solver
  :trace on|off            liga/desliga o rastro da prova
  :help                    esta mensagem
  :quit                    sai";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReplOptions {
    /// Um relatório JSON por linha em vez de texto.
    pub json: bool,
    /// Para na primeira resposta.
    pub first_only: bool,
    /// Mostra `?- ` antes de cada linha (só faz sentido num terminal).
    pub prompt: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Repl<'e> {
    engine: &'e mut InferenceEngine,
    options: ReplOptions,
}

impl<'e> Repl<'e> {
    pub fn new(engine: &'e mut InferenceEngine, options: ReplOptions) -> Self {
        Self { engine, options }
    }

    /// Processa a entrada até `:quit` ou fim de arquivo.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        if self.options.prompt {
            writeln!(out, "family-kb — :help para ajuda")?;
            write!(out, "?- ")?;
            out.flush()?;
        }
        for line in input.lines() {
            let line = line.context("Falha ao ler a entrada")?;
            if self.handle_line(&line, out)? == Flow::Quit {
                break;
            }
            if self.options.prompt {
                write!(out, "?- ")?;
                out.flush()?;
            }
        }
        Ok(())
    }

    pub fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('%') {
            return Ok(Flow::Continue);
        }
        if let Some(command) = line.strip_prefix(':') {
            return self.command(command, out);
        }
        let report = self.engine.run_query(line, self.options.first_only);
        render_report(&report, self.options.json, out)?;
        Ok(Flow::Continue)
    }

    fn command<W: Write>(&mut self, command: &str, out: &mut W) -> Result<Flow> {
        let mut parts = command.split_whitespace();
        let name = parts.next().unwrap_or("");
        let arg = parts.next();

        match (name, arg) {
            ("quit" | "q", _) => return Ok(Flow::Quit),
            ("help" | "h", _) => writeln!(out, "{}", HELP)?,
            ("stats", _) => {
                let kb = self.engine.kb();
                let config = self.engine.config();
                writeln!(
                    out,
                    "{} cláusulas, {} predicados",
                    kb.clause_count(),
                    kb.predicate_count()
                )?;
                let steps = config
                    .max_steps
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "sem limite".to_string());
                writeln!(
                    out,
                    "max_depth = {}, max_steps = {}, trace = {}",
                    config.max_depth,
                    steps,
                    if config.trace { "on" } else { "off" }
                )?;
            }
            ("listing", None) => {
                for sig in self.engine.kb().signatures() {
                    writeln!(out, "{}", sig)?;
                }
            }
            ("listing", Some(indicator)) => match Signature::parse_indicator(indicator) {
                Some(sig) if self.engine.kb().is_defined(&sig) => {
                    for clause in self.engine.kb().clauses_for(&sig) {
                        writeln!(out, "{}", clause)?;
                    }
                }
                Some(sig) => writeln!(out, "predicado desconhecido: {}", sig)?,
                None => writeln!(out, "uso: :listing nome/aridade")?,
            },
            ("trace", Some("on")) => {
                self.engine.set_trace(true);
                writeln!(out, "rastro ligado")?;
            }
            ("trace", Some("off")) => {
                self.engine.set_trace(false);
                writeln!(out, "rastro desligado")?;
            }
            ("trace", _) => writeln!(out, "uso: :trace on|off")?,
            _ => writeln!(out, "comando desconhecido: :{} (veja :help)", name)?,
        }
        Ok(Flow::Continue)
    }
}

/// Escreve um relatório de consulta como texto ou como uma linha JSON.
pub fn render_report<W: Write>(report: &QueryReport, json: bool, out: &mut W) -> Result<()> {
    if json {
        serde_json::to_writer(&mut *out, report).context("Falha ao serializar o relatório")?;
        writeln!(out)?;
        return Ok(());
    }

    for answer in &report.answers {
        writeln!(out, "{}.", answer)?;
    }
    match &report.error {
        Some(err) => writeln!(out, "erro: {}", err)?,
        None if report.answers.is_empty() => writeln!(out, "false.")?,
        None => {}
    }
    for event in &report.trace {
        writeln!(out, "{}", event)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverConfig;
    use crate::loader::parse_kb;

    fn engine() -> InferenceEngine {
        InferenceEngine::new(
            parse_kb(include_str!("../kb/family_kb.pl")).unwrap(),
            SolverConfig::default(),
        )
    }

    fn session(engine: &mut InferenceEngine, options: ReplOptions, input: &str) -> String {
        let mut out = Vec::new();
        Repl::new(engine, options)
            .run(input.as_bytes(), &mut out)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn answers_queries_line_by_line() {
        let mut engine = engine();
        let out = session(
            &mut engine,
            ReplOptions::default(),
            "father(X, mary).\n?- sibling(mary, mary).\n\nmale(john)\n",
        );
        assert_eq!(out, "X = john.\nfalse.\ntrue.\n");
    }

    #[test]
    fn quit_stops_reading() {
        let mut engine = engine();
        let out = session(&mut engine, ReplOptions::default(), ":quit\nmale(john).\n");
        assert_eq!(out, "");
    }

    #[test]
    fn errors_do_not_stop_the_loop() {
        let mut engine = engine();
        let out = session(&mut engine, ReplOptions::default(), "father(X\nmale(paul).\n");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("erro: erro de sintaxe"));
        assert_eq!(lines[1], "true.");
    }

    #[test]
    fn listing_prints_clauses() {
        let mut engine = engine();
        let out = session(
            &mut engine,
            ReplOptions::default(),
            ":listing ancestor/2\n:listing ghost/3\n:listing oops\n",
        );
        assert_eq!(
            out,
            "ancestor(X, Y) :- parent(X, Y).\n\
             ancestor(X, Y) :- parent(X, Z), ancestor(Z, Y).\n\
             predicado desconhecido: ghost/3\n\
             uso: :listing nome/aridade\n"
        );
    }

    #[test]
    fn listing_without_argument_lists_predicates() {
        let mut engine = engine();
        let out = session(&mut engine, ReplOptions::default(), ":listing\n");
        assert!(out.lines().any(|l| l == "father/2"));
        assert_eq!(out.lines().count(), 11);
    }

    #[test]
    fn trace_toggle() {
        let mut engine = engine();
        let out = session(
            &mut engine,
            ReplOptions::default(),
            ":trace on\nmale(john).\n:trace off\n",
        );
        assert_eq!(
            out,
            "rastro ligado\ntrue.\nGoal: male(john)\n  Matched FACT: male(john)\nrastro desligado\n"
        );
        assert!(!engine.config().trace);
    }

    #[test]
    fn stats_and_unknown_commands() {
        let mut engine = engine();
        let out = session(&mut engine, ReplOptions::default(), ":stats\n:frobnicate\n");
        assert_eq!(
            out,
            "29 cláusulas, 11 predicados\n\
             max_depth = 50, max_steps = 1000000, trace = off\n\
             comando desconhecido: :frobnicate (veja :help)\n"
        );
    }

    #[test]
    fn json_mode_prints_one_report_per_line() {
        let mut engine = engine();
        let options = ReplOptions {
            json: true,
            first_only: true,
            prompt: false,
        };
        let out = session(&mut engine, options, "mother(X, paul)\n");
        assert_eq!(
            out,
            "{\"query\":\"mother(X, paul)\",\"answers\":[{\"X\":\"susan\"}],\"error\":null}\n"
        );
    }
}
