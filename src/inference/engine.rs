//! # InferenceEngine — Interface de Consultas
//!
//! Junta a [`KnowledgeBase`] carregada com a [`SolverConfig`] e oferece as
//! operações de consulta:
//!
//! | Método | Retorno | Uso |
//! |--------|---------|-----|
//! | [`solve()`](InferenceEngine::solve) | `Solutions` (substituições cruas) | API de baixo nível |
//! | [`query()`](InferenceEngine::query) | `Query` (respostas por variável) | Enumerar todas as respostas |
//! | [`prove()`](InferenceEngine::prove) | `Proof` | Primeira prova + rastro |
//! | [`run_query()`](InferenceEngine::run_query) | `QueryReport` | CLI/REPL: nunca falha |
//!
//! ## Exemplo
//!
//! ```rust
//! let engine = InferenceEngine::new(kb, SolverConfig::default());
//! for answer in engine.query_str("father(X, Y)")? {
//!     println!("{}", answer?); // X = john, Y = mary
//! }
//! ```

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use super::solver::Solutions;
use super::trace::TraceEvent;
use crate::config::SolverConfig;
use crate::core::{KnowledgeBase, ParseError, SolveError, Substitution, Term, Var};
use crate::syntax::parse_query;

/// Uma resposta: valor de cada variável nomeada da consulta, na ordem em que
/// aparecem. Variáveis anônimas (`_`, `_X`) ficam de fora.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Answer {
    pub bindings: IndexMap<String, Term>,
}

impl Answer {
    fn project(vars: &[Var], subst: &Substitution) -> Self {
        let bindings = vars
            .iter()
            .map(|v| (v.name.to_string(), subst.apply(&Term::Var(v.clone()))))
            .collect();
        Self { bindings }
    }

    pub fn get(&self, name: &str) -> Option<&Term> {
        self.bindings.get(name)
    }

    /// `true` para consultas sem variáveis (resposta "sim").
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bindings.is_empty() {
            return f.write_str("true");
        }
        for (i, (name, value)) in self.bindings.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} = {}", name, value)?;
        }
        Ok(())
    }
}

/// Iterador de respostas de uma consulta.
pub struct Query<'kb> {
    vars: Vec<Var>,
    solutions: Solutions<'kb>,
}

impl<'kb> Query<'kb> {
    pub fn trace(&self) -> &[TraceEvent] {
        self.solutions.trace()
    }
}

impl Iterator for Query<'_> {
    type Item = Result<Answer, SolveError>;

    fn next(&mut self) -> Option<Self::Item> {
        let vars = &self.vars;
        self.solutions
            .next()
            .map(|r| r.map(|subst| Answer::project(vars, &subst)))
    }
}

/// Resultado de [`prove()`](InferenceEngine::prove): a primeira prova, se houver.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Proof {
    pub holds: bool,
    pub answer: Option<Answer>,
    pub trace: Vec<TraceEvent>,
}

/// Relatório completo de uma consulta textual, pronto para exibição ou JSON.
///
/// Erros de sintaxe ou de limite vão para `error`; as respostas obtidas
/// antes de um erro de limite são mantidas.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QueryReport {
    pub query: String,
    pub answers: Vec<Answer>,
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trace: Vec<TraceEvent>,
}

impl QueryReport {
    pub fn holds(&self) -> bool {
        !self.answers.is_empty()
    }
}

pub struct InferenceEngine {
    kb: KnowledgeBase,
    config: SolverConfig,
}

impl InferenceEngine {
    pub fn new(kb: KnowledgeBase, config: SolverConfig) -> Self {
        Self { kb, config }
    }

    pub fn kb(&self) -> &KnowledgeBase {
        &self.kb
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn set_trace(&mut self, on: bool) {
        self.config.trace = on;
    }

    /// Todas as substituições que estendem `subst` e tornam `goal`
    /// demonstrável, em ordem SLD.
    pub fn solve(&self, goal: &Term, subst: Substitution) -> Solutions<'_> {
        Solutions::new(&self.kb, vec![goal.clone()], subst, &self.config)
    }

    /// Consulta uma conjunção de objetivos, projetando as respostas nas
    /// variáveis nomeadas.
    pub fn query_goals(&self, goals: Vec<Term>) -> Query<'_> {
        let mut vars = Vec::new();
        for goal in &goals {
            goal.collect_vars(&mut vars);
        }
        vars.retain(|v| !v.is_anonymous());
        let rendered: Vec<String> = goals.iter().map(ToString::to_string).collect();
        tracing::debug!(query = %rendered.join(", "), "consulta iniciada");
        Query {
            vars,
            solutions: Solutions::new(&self.kb, goals, Substitution::new(), &self.config),
        }
    }

    pub fn query(&self, goal: &Term) -> Query<'_> {
        self.query_goals(vec![goal.clone()])
    }

    /// Interpreta e executa uma consulta textual (`"father(X, Y)."`).
    pub fn query_str(&self, text: &str) -> Result<Query<'_>, ParseError> {
        Ok(self.query_goals(parse_query(text)?))
    }

    /// Busca apenas a primeira prova, sempre com rastro.
    pub fn prove(&self, goal: &Term) -> Result<Proof, SolveError> {
        self.prove_goals(vec![goal.clone()])
    }

    /// Como [`prove()`](Self::prove), para uma conjunção de objetivos.
    pub fn prove_goals(&self, goals: Vec<Term>) -> Result<Proof, SolveError> {
        let config = SolverConfig {
            trace: true,
            ..self.config.clone()
        };
        let mut vars = Vec::new();
        for goal in &goals {
            goal.collect_vars(&mut vars);
        }
        vars.retain(|v| !v.is_anonymous());

        let mut solutions = Solutions::new(&self.kb, goals, Substitution::new(), &config);
        let answer = solutions
            .next()
            .transpose()?
            .map(|subst| Answer::project(&vars, &subst));
        Ok(Proof {
            holds: answer.is_some(),
            answer,
            trace: solutions.trace().to_vec(),
        })
    }

    /// Executa uma consulta textual e resume tudo num [`QueryReport`].
    ///
    /// Com `first_only`, para na primeira resposta (via
    /// [`prove_goals()`](Self::prove_goals)). O rastro só entra no relatório
    /// se estiver ligado na configuração.
    pub fn run_query(&self, text: &str, first_only: bool) -> QueryReport {
        let mut report = QueryReport {
            query: text.trim().to_string(),
            answers: Vec::new(),
            error: None,
            trace: Vec::new(),
        };

        let goals = match parse_query(text) {
            Ok(goals) => goals,
            Err(err) => {
                report.error = Some(err.to_string());
                return report;
            }
        };

        if first_only {
            match self.prove_goals(goals) {
                Ok(proof) => {
                    report.answers.extend(proof.answer);
                    if self.config.trace {
                        report.trace = proof.trace;
                    }
                }
                Err(err) => report.error = Some(err.to_string()),
            }
        } else {
            let mut query = self.query_goals(goals);
            for result in query.by_ref() {
                match result {
                    Ok(answer) => report.answers.push(answer),
                    Err(err) => {
                        report.error = Some(err.to_string());
                        break;
                    }
                }
            }
            report.trace = query.trace().to_vec();
        }
        tracing::debug!(
            query = %report.query,
            answers = report.answers.len(),
            error = report.error.is_some(),
            "consulta concluída"
        );
        report
    }
}
