//! # Rastro da Prova
//!
//! Quando [`SolverConfig::trace`](crate::config::SolverConfig::trace) está
//! ligado, o solver registra cada passo da busca:
//!
//! ```text
//! Goal: grandparent(john, alice)
//!   Matched RULE: grandparent(john, alice) :- parent(john, Y_1), parent(Y_1, alice)
//! Goal: parent(john, Y_1)
//!   Matched FACT: parent(john, mary)
//! Goal: parent(mary, alice)
//!   Matched FACT: parent(mary, alice)
//! ```
//!
//! Os termos já chegam renderizados (`String`) porque a substituição muda a
//! cada retrocesso; o rastro precisa mostrar o estado **no momento** do passo.

use std::fmt;

use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceEvent {
    /// Objetivo selecionado para resolução.
    Goal { goal: String },
    /// O objetivo unificou com um fato.
    MatchedFact { fact: String },
    /// O objetivo unificou com a cabeça de uma regra; o corpo vem a seguir.
    MatchedRule { rule: String },
    /// Nenhuma cláusula unificou com o objetivo.
    Fail { goal: String },
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEvent::Goal { goal } => write!(f, "Goal: {}", goal),
            TraceEvent::MatchedFact { fact } => write!(f, "  Matched FACT: {}", fact),
            TraceEvent::MatchedRule { rule } => write!(f, "  Matched RULE: {}", rule),
            TraceEvent::Fail { goal } => write!(f, "  Fail: {}", goal),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_indented_layout() {
        let goal = TraceEvent::Goal {
            goal: "male(john)".into(),
        };
        let fact = TraceEvent::MatchedFact {
            fact: "male(john)".into(),
        };
        assert_eq!(goal.to_string(), "Goal: male(john)");
        assert_eq!(fact.to_string(), "  Matched FACT: male(john)");
    }

    #[test]
    fn serializes_with_event_tag() {
        let event = TraceEvent::Fail {
            goal: "male(susan)".into(),
        };
        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"{"event":"fail","goal":"male(susan)"}"#
        );
    }
}
