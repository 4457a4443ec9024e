//! # Substitution — Ligações com Trilha de Desfazer
//!
//! A [`Substitution`] mapeia variáveis para termos. Cada ligação nova é
//! registrada numa **trilha** (`trail`); um [`Mark`] captura o tamanho da
//! trilha e [`undo_to()`](Substitution::undo_to) remove tudo que foi ligado
//! depois dele.
//!
//! ```text
//! mark = s.mark()          trilha: [X]
//! s.bind(Y, john)          trilha: [X, Y]
//! s.bind(Z, mary)          trilha: [X, Y, Z]
//! s.undo_to(mark)          trilha: [X]      ← estado anterior restaurado
//! ```
//!
//! O solver guarda um `Mark` em cada ponto de escolha e volta a ele ao
//! retroceder, sem copiar o mapa inteiro.
//!
//! Não há occurs-check: ligar `X` a `f(X)` cria um termo cíclico e
//! [`apply()`](Substitution::apply) não termina. Os dados de família só
//! usam átomos como argumentos.

use std::collections::HashMap;

use super::term::{Term, Var};

/// Posição na trilha para onde é possível voltar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Mark(usize);

#[derive(Clone, Debug, Default)]
pub struct Substitution {
    bindings: HashMap<Var, Term>,
    trail: Vec<Var>,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, var: &Var) -> Option<&Term> {
        self.bindings.get(var)
    }

    /// Liga uma variável **livre** a um termo.
    pub fn bind(&mut self, var: Var, term: Term) {
        debug_assert!(!self.bindings.contains_key(&var), "{} já ligada", var);
        self.trail.push(var.clone());
        self.bindings.insert(var, term);
    }

    pub fn mark(&self) -> Mark {
        Mark(self.trail.len())
    }

    /// Desfaz todas as ligações feitas depois de `mark`.
    pub fn undo_to(&mut self, mark: Mark) {
        while self.trail.len() > mark.0 {
            if let Some(var) = self.trail.pop() {
                self.bindings.remove(&var);
            }
        }
    }

    /// Segue a cadeia de ligações de uma variável até um termo não-variável
    /// ou uma variável livre. Não desce em argumentos de compostos.
    pub fn walk<'a>(&'a self, mut term: &'a Term) -> &'a Term {
        while let Term::Var(var) = term {
            match self.bindings.get(var) {
                Some(next) => term = next,
                None => break,
            }
        }
        term
    }

    /// Aplica a substituição recursivamente, produzindo a forma atual do termo.
    pub fn apply(&self, term: &Term) -> Term {
        match self.walk(term) {
            Term::Compound { functor, args } => Term::Compound {
                functor: functor.clone(),
                args: args.iter().map(|a| self.apply(a)).collect(),
            },
            other => other.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Maior geração de variável ligada (ou presente nos valores).
    pub fn max_generation(&self) -> u64 {
        self.bindings
            .iter()
            .map(|(var, term)| var.generation.max(term.max_generation()))
            .max()
            .unwrap_or(0)
    }
}
