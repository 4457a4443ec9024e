//! # Clause — Fatos e Regras
//!
//! Uma [`Clause`] é uma cláusula de Horn: cabeça + corpo conjuntivo.
//! Um **fato** é uma cláusula de corpo vazio.
//!
//! ```text
//! parent(john, mary).                       ← fato
//! father(X, Y) :- parent(X, Y), male(X).    ← regra
//! ```
//!
//! Além do texto, cláusulas podem ser montadas a partir de declarações
//! estruturadas ([`ClauseDecl`] / [`GoalDecl`]), onde a aridade é informada
//! explicitamente e conferida contra os argumentos.

use std::fmt;

use super::error::LoadError;
use super::term::{Signature, Term};

/// Cláusula validada: cabeça e objetivos do corpo são sempre chamáveis.
#[derive(Clone, Debug, PartialEq)]
pub struct Clause {
    pub head: Term,
    pub body: Vec<Term>,
    signature: Signature,
}

impl Clause {
    /// Monta uma cláusula, rejeitando cabeça ou objetivos não chamáveis
    /// (variáveis).
    pub fn new(head: Term, body: Vec<Term>) -> Result<Self, LoadError> {
        let signature = head.signature().ok_or_else(|| {
            LoadError::InvalidClause(format!("a cabeça `{}` não é um predicado", head))
        })?;
        if let Some(goal) = body.iter().find(|g| !g.is_callable()) {
            return Err(LoadError::InvalidClause(format!(
                "o objetivo `{}` no corpo de `{}` não é um predicado",
                goal, head
            )));
        }
        Ok(Self {
            head,
            body,
            signature,
        })
    }

    /// Atalho para fatos.
    pub fn fact(head: Term) -> Result<Self, LoadError> {
        Self::new(head, Vec::new())
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn is_fact(&self) -> bool {
        self.body.is_empty()
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.head)?;
        if !self.body.is_empty() {
            f.write_str(" :- ")?;
            for (i, goal) in self.body.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", goal)?;
            }
        }
        f.write_str(".")
    }
}

/// Objetivo declarado com functor, aridade e argumentos explícitos.
#[derive(Clone, Debug, PartialEq)]
pub struct GoalDecl {
    pub functor: String,
    pub arity: usize,
    pub args: Vec<Term>,
}

impl GoalDecl {
    pub fn new(functor: &str, arity: usize, args: Vec<Term>) -> Self {
        Self {
            functor: functor.to_string(),
            arity,
            args,
        }
    }

    /// Converte em termo, conferindo a aridade declarada.
    pub fn into_term(self) -> Result<Term, LoadError> {
        if self.args.len() != self.arity {
            return Err(LoadError::ArityMismatch {
                functor: self.functor,
                declared: self.arity,
                found: self.args.len(),
            });
        }
        Ok(Term::compound(&self.functor, self.args))
    }
}

/// Cláusula declarada: cabeça + corpo (vazio para fatos).
#[derive(Clone, Debug, PartialEq)]
pub struct ClauseDecl {
    pub head: GoalDecl,
    pub body: Vec<GoalDecl>,
}

impl ClauseDecl {
    pub fn into_clause(self) -> Result<Clause, LoadError> {
        let head = self.head.into_term()?;
        let body = self
            .body
            .into_iter()
            .map(GoalDecl::into_term)
            .collect::<Result<Vec<_>, _>>()?;
        Clause::new(head, body)
    }
}
