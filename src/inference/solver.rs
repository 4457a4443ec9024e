//! # Solver — Resolução SLD com Pilha de Pontos de Escolha
//!
//! [`Solutions`] é um iterador preguiçoso: cada `next()` retoma a busca do
//! ponto onde a solução anterior foi produzida.
//!
//! ## Estado da Busca
//!
//! ```text
//! pending: Option<Goals>     lista de objetivos a expandir (modo "avançar")
//! stack:   Vec<ChoicePoint>  um por objetivo expandido:
//!            goal       forma atual do objetivo
//!            rest       objetivos que vêm depois dele
//!            candidates cláusulas com a mesma assinatura
//!            next       próxima cláusula a tentar
//!            mark       posição da trilha ao criar o ponto
//! ```
//!
//! ## Algoritmo
//!
//! 1. **Avançar**: pega o primeiro objetivo pendente, aplica a substituição,
//!    busca as cláusulas candidatas e empilha um ponto de escolha.
//!    Lista vazia ⇒ solução.
//! 2. **Retroceder**: no topo da pilha, desfaz a trilha até `mark` e tenta
//!    a próxima cláusula: renomeia (geração nova), unifica com a cabeça e,
//!    se der certo, agenda `corpo ++ rest`. Sem alternativas, desempilha.
//!
//! A lista de objetivos é uma lista ligada persistente (`Rc`), de modo que
//! cada ponto de escolha guarda a continuação sem copiá-la.
//!
//! ## Limites
//!
//! - profundidade de um objetivo > `max_depth` ⇒ [`SolveError::DepthExceeded`]
//! - tentativas de unificação > `max_steps` ⇒ [`SolveError::StepLimitExceeded`]
//!
//! Após um erro o iterador termina. Cancelar = parar de chamar `next()`.

use std::rc::Rc;

use super::trace::TraceEvent;
use super::unify::unify;
use crate::config::SolverConfig;
use crate::core::{KnowledgeBase, Mark, SolveError, Substitution, Term};

type Goals = Option<Rc<GoalNode>>;

struct GoalNode {
    goal: Term,
    /// Número de aplicações de regra aninhadas que introduziram o objetivo.
    depth: usize,
    next: Goals,
}

struct ChoicePoint<'kb> {
    goal: Term,
    depth: usize,
    rest: Goals,
    candidates: &'kb [usize],
    next: usize,
    mark: Mark,
    matched: bool,
}

pub struct Solutions<'kb> {
    kb: &'kb KnowledgeBase,
    max_depth: usize,
    max_steps: Option<u64>,
    subst: Substitution,
    stack: Vec<ChoicePoint<'kb>>,
    pending: Option<Goals>,
    generation: u64,
    steps: u64,
    trace: Option<Vec<TraceEvent>>,
    /// Renderizar eventos custa caro; só o fazemos se alguém for ler.
    observed: bool,
    done: bool,
}

fn emit(trace: &mut Option<Vec<TraceEvent>>, event: TraceEvent) {
    tracing::trace!(%event, "solver");
    if let Some(trace) = trace {
        trace.push(event);
    }
}

impl<'kb> Solutions<'kb> {
    /// Prepara a busca pela conjunção `goals` a partir de `subst`.
    pub fn new(
        kb: &'kb KnowledgeBase,
        goals: Vec<Term>,
        subst: Substitution,
        config: &SolverConfig,
    ) -> Self {
        // Gerações novas nunca podem colidir com variáveis já presentes.
        let generation = goals
            .iter()
            .map(Term::max_generation)
            .chain(std::iter::once(subst.max_generation()))
            .max()
            .unwrap_or(0);

        let mut list: Goals = None;
        for goal in goals.into_iter().rev() {
            list = Some(Rc::new(GoalNode {
                goal,
                depth: 0,
                next: list,
            }));
        }

        Self {
            kb,
            max_depth: config.max_depth,
            max_steps: config.max_steps,
            subst,
            stack: Vec::new(),
            pending: Some(list),
            generation,
            steps: 0,
            trace: config.trace.then(Vec::new),
            observed: config.trace || tracing::enabled!(tracing::Level::TRACE),
            done: false,
        }
    }

    /// Eventos registrados até agora (vazio se o rastro estiver desligado).
    pub fn trace(&self) -> &[TraceEvent] {
        self.trace.as_deref().unwrap_or(&[])
    }

    /// Tentativas de unificação feitas até agora.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Empilha um ponto de escolha para o primeiro objetivo de `node`.
    fn expand(&mut self, node: &GoalNode) -> Result<(), SolveError> {
        let goal = self.subst.apply(&node.goal);
        if node.depth > self.max_depth {
            return Err(SolveError::DepthExceeded {
                limit: self.max_depth,
                goal: goal.to_string(),
            });
        }

        let kb = self.kb;
        let candidates: &'kb [usize] = match goal.signature() {
            Some(sig) => {
                let candidates = kb.candidates(&sig);
                if candidates.is_empty() {
                    tracing::debug!(predicate = %sig, "predicado sem cláusulas, falha lógica");
                }
                candidates
            }
            None => &[],
        };

        if self.observed {
            emit(
                &mut self.trace,
                TraceEvent::Goal {
                    goal: goal.to_string(),
                },
            );
        }
        self.stack.push(ChoicePoint {
            goal,
            depth: node.depth,
            rest: node.next.clone(),
            candidates,
            next: 0,
            mark: self.subst.mark(),
            matched: false,
        });
        Ok(())
    }

    /// Tenta a próxima alternativa do topo da pilha, desempilhando pontos
    /// esgotados. `Ok(false)` quando a pilha acaba.
    fn backtrack(&mut self) -> Result<bool, SolveError> {
        let kb = self.kb;
        while let Some(cp) = self.stack.last_mut() {
            self.subst.undo_to(cp.mark);

            while cp.next < cp.candidates.len() {
                let clause = kb.clause(cp.candidates[cp.next]);
                cp.next += 1;

                self.steps += 1;
                if let Some(limit) = self.max_steps {
                    if self.steps > limit {
                        return Err(SolveError::StepLimitExceeded { limit });
                    }
                }

                let Some(generation) = self.generation.checked_add(1) else {
                    return Err(SolveError::StepLimitExceeded { limit: u64::MAX });
                };
                self.generation = generation;
                let head = clause.head.rename(generation);
                if !unify(&cp.goal, &head, &mut self.subst) {
                    continue;
                }
                cp.matched = true;

                let body: Vec<Term> = clause.body.iter().map(|g| g.rename(generation)).collect();
                if self.observed {
                    let event = if body.is_empty() {
                        TraceEvent::MatchedFact {
                            fact: self.subst.apply(&head).to_string(),
                        }
                    } else {
                        let goals: Vec<String> = body
                            .iter()
                            .map(|g| self.subst.apply(g).to_string())
                            .collect();
                        TraceEvent::MatchedRule {
                            rule: format!("{} :- {}", self.subst.apply(&head), goals.join(", ")),
                        }
                    };
                    emit(&mut self.trace, event);
                }

                let mut goals = cp.rest.clone();
                for goal in body.into_iter().rev() {
                    goals = Some(Rc::new(GoalNode {
                        goal,
                        depth: cp.depth + 1,
                        next: goals,
                    }));
                }
                self.pending = Some(goals);
                return Ok(true);
            }

            if !cp.matched && self.observed {
                emit(
                    &mut self.trace,
                    TraceEvent::Fail {
                        goal: cp.goal.to_string(),
                    },
                );
            }
            self.stack.pop();
        }
        Ok(false)
    }

    fn fail(&mut self, err: SolveError) -> Option<Result<Substitution, SolveError>> {
        tracing::debug!(error = %err, steps = self.steps, "busca interrompida");
        self.done = true;
        self.stack.clear();
        Some(Err(err))
    }
}

impl Iterator for Solutions<'_> {
    type Item = Result<Substitution, SolveError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            if let Some(goals) = self.pending.take() {
                match goals {
                    None => return Some(Ok(self.subst.clone())),
                    Some(node) => {
                        if let Err(err) = self.expand(&node) {
                            return self.fail(err);
                        }
                    }
                }
            }
            match self.backtrack() {
                Ok(true) => continue,
                Ok(false) => {
                    self.done = true;
                    return None;
                }
                Err(err) => return self.fail(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Var;
    use crate::syntax::{parse_program, parse_query};

    fn kb(src: &str) -> KnowledgeBase {
        KnowledgeBase::from_clauses(parse_program(src).unwrap()).unwrap()
    }

    fn run(kb: &KnowledgeBase, query: &str, config: &SolverConfig) -> Vec<Result<Substitution, SolveError>> {
        Solutions::new(kb, parse_query(query).unwrap(), Substitution::new(), config).collect()
    }

    fn value(s: &Substitution, name: &str) -> String {
        s.apply(&Term::Var(Var::new(name))).to_string()
    }

    #[test]
    fn facts_enumerate_in_source_order() {
        let kb = kb("p(a). p(b). p(c).");
        let found: Vec<String> = run(&kb, "p(X)", &SolverConfig::default())
            .into_iter()
            .map(|r| value(&r.unwrap(), "X"))
            .collect();
        assert_eq!(found, vec!["a", "b", "c"]);
    }

    #[test]
    fn conjunction_chains_bindings() {
        let kb = kb("edge(a, b). edge(b, c). edge(c, d).");
        let found: Vec<String> = run(&kb, "edge(X, Y), edge(Y, Z)", &SolverConfig::default())
            .into_iter()
            .map(|r| {
                let s = r.unwrap();
                format!("{}{}{}", value(&s, "X"), value(&s, "Y"), value(&s, "Z"))
            })
            .collect();
        assert_eq!(found, vec!["abc", "bcd"]);
    }

    #[test]
    fn recursive_rule_renames_apart() {
        let kb = kb(
            "edge(a, b). edge(b, c). edge(c, d).\n\
             path(X, Y) :- edge(X, Y).\n\
             path(X, Y) :- edge(X, Z), path(Z, Y).",
        );
        let found: Vec<String> = run(&kb, "path(a, Y)", &SolverConfig::default())
            .into_iter()
            .map(|r| value(&r.unwrap(), "Y"))
            .collect();
        assert_eq!(found, vec!["b", "c", "d"]);
    }

    #[test]
    fn unknown_predicate_is_logical_failure() {
        let kb = kb("p(a).");
        assert!(run(&kb, "q(X)", &SolverConfig::default()).is_empty());
    }

    #[test]
    fn initial_substitution_is_respected() {
        let kb = kb("p(a). p(b).");
        let mut start = Substitution::new();
        start.bind(Var::new("X"), Term::atom("b"));
        let results: Vec<_> = Solutions::new(
            &kb,
            parse_query("p(X)").unwrap(),
            start,
            &SolverConfig::default(),
        )
        .collect();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn cyclic_data_hits_depth_limit() {
        let kb = kb(
            "parent(a, b). parent(b, a).\n\
             ancestor(X, Y) :- parent(X, Y).\n\
             ancestor(X, Y) :- parent(X, Z), ancestor(Z, Y).",
        );
        let config = SolverConfig {
            max_depth: 10,
            ..SolverConfig::default()
        };
        let results = run(&kb, "ancestor(a, c)", &config);
        assert!(matches!(
            results.last(),
            Some(Err(SolveError::DepthExceeded { limit: 10, .. }))
        ));
        assert!(results.iter().all(|r| r.is_err()));
    }

    #[test]
    fn step_limit_stops_search() {
        let kb = kb("loop :- loop.");
        let config = SolverConfig {
            max_depth: usize::MAX,
            max_steps: Some(100),
            trace: false,
        };
        let mut solutions = Solutions::new(&kb, parse_query("loop").unwrap(), Substitution::new(), &config);
        assert!(matches!(
            solutions.next(),
            Some(Err(SolveError::StepLimitExceeded { limit: 100 }))
        ));
        assert!(solutions.next().is_none());
        assert_eq!(solutions.steps(), 101);
    }

    #[test]
    fn generation_overflow_stops_search() {
        let kb = kb("p(a). p(b).");
        let x = Var::new("X").renamed(u64::MAX - 1);
        let goal = Term::compound("p", vec![Term::Var(x)]);
        let mut solutions =
            Solutions::new(&kb, vec![goal], Substitution::new(), &SolverConfig::default());
        assert!(matches!(solutions.next(), Some(Ok(_))));
        assert!(matches!(
            solutions.next(),
            Some(Err(SolveError::StepLimitExceeded { limit: u64::MAX }))
        ));
        assert!(solutions.next().is_none());
    }

    #[test]
    fn trace_records_matches_and_failures() {
        let kb = kb("male(john). father(X, Y) :- parent(X, Y), male(X). parent(susan, mary).");
        let config = SolverConfig {
            trace: true,
            ..SolverConfig::default()
        };
        let mut solutions = Solutions::new(&kb, parse_query("father(susan, mary)").unwrap(), Substitution::new(), &config);
        assert!(solutions.next().is_none());
        let lines: Vec<String> = solutions.trace().iter().map(|e| e.to_string()).collect();
        assert_eq!(
            lines,
            vec![
                "Goal: father(susan, mary)",
                "  Matched RULE: father(susan, mary) :- parent(susan, mary), male(susan)",
                "Goal: parent(susan, mary)",
                "  Matched FACT: parent(susan, mary)",
                "Goal: male(susan)",
                "  Fail: male(susan)",
            ]
        );
    }
}
