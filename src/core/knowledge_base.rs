//! # KnowledgeBase — Contêiner de Cláusulas
//!
//! A [`KnowledgeBase`] guarda as cláusulas na **ordem da fonte** e um índice
//! `Signature → posições` para que o solver encontre, em O(1), as cláusulas
//! candidatas de um objetivo.
//!
//! ## Armazenamento
//!
//! - **Cláusulas**: `Vec<Clause>` — ordem de leitura preservada
//! - **Índice**: `HashMap<Signature, Vec<usize>>` — posições em `clauses`,
//!   em ordem crescente
//! - **Aridades**: `HashMap<Symbol, usize>` — cada functor tem uma única
//!   aridade em toda a KB
//!
//! A ordem importa apenas para a **ordem de enumeração** das respostas,
//! nunca para a correção.
//!
//! ## Ciclo de Vida
//!
//! A KB é montada uma vez (via [`loader`](crate::loader) ou
//! [`from_decls()`](KnowledgeBase::from_decls)) e depois só é lida. O solver
//! a empresta como `&KnowledgeBase` — não há lock.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! let kb = KnowledgeBase::from_clauses(vec![
//!     Clause::fact(Term::compound("male", vec![Term::atom("john")]))?,
//! ])?;
//! assert_eq!(kb.clause_count(), 1);
//! ```

use std::collections::HashMap;

use super::clause::{Clause, ClauseDecl};
use super::error::LoadError;
use super::term::{Signature, Symbol, Term};

#[derive(Debug, Default)]
pub struct KnowledgeBase {
    clauses: Vec<Clause>,
    index: HashMap<Signature, Vec<usize>>,
    /// Functor → aridade da primeira ocorrência (cabeça ou corpo).
    arities: HashMap<Symbol, usize>,
}

impl KnowledgeBase {
    /// Cria uma KnowledgeBase vazia.
    pub fn new() -> Self {
        Self::default()
    }

    /// Monta a KB a partir de cláusulas já validadas, na ordem dada.
    ///
    /// # Erros
    ///
    /// [`LoadError::InconsistentArity`] se um functor aparecer com duas
    /// aridades diferentes (ex: `parent/2` e `parent/3`).
    pub fn from_clauses(clauses: impl IntoIterator<Item = Clause>) -> Result<Self, LoadError> {
        let mut kb = Self::new();
        for clause in clauses {
            kb.add_clause(clause)?;
        }
        Ok(kb)
    }

    /// Monta a KB a partir de declarações com aridade explícita.
    ///
    /// # Erros
    ///
    /// - [`LoadError::ArityMismatch`] — aridade declarada ≠ argumentos
    /// - [`LoadError::InconsistentArity`] — functor com duas aridades
    /// - [`LoadError::InvalidClause`] — cabeça ou objetivo não chamável
    pub fn from_decls(decls: impl IntoIterator<Item = ClauseDecl>) -> Result<Self, LoadError> {
        let clauses = decls
            .into_iter()
            .map(ClauseDecl::into_clause)
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_clauses(clauses)
    }

    fn add_clause(&mut self, clause: Clause) -> Result<(), LoadError> {
        for goal in std::iter::once(&clause.head).chain(clause.body.iter()) {
            self.check_arity(goal)?;
        }
        let position = self.clauses.len();
        tracing::debug!(position, clause = %clause, "KB: cláusula armazenada");
        self.index
            .entry(clause.signature().clone())
            .or_default()
            .push(position);
        self.clauses.push(clause);
        Ok(())
    }

    fn check_arity(&mut self, goal: &Term) -> Result<(), LoadError> {
        let Some(sig) = goal.signature() else {
            return Ok(());
        };
        match self.arities.get(&sig.name) {
            Some(&known) if known != sig.arity => Err(LoadError::InconsistentArity {
                functor: sig.name.to_string(),
                first: known,
                second: sig.arity,
            }),
            Some(_) => Ok(()),
            None => {
                self.arities.insert(sig.name, sig.arity);
                Ok(())
            }
        }
    }

    /// Posições das cláusulas cuja cabeça tem a assinatura dada, em ordem
    /// da fonte. Vazio para predicados desconhecidos.
    pub fn candidates(&self, sig: &Signature) -> &[usize] {
        self.index.get(sig).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn clause(&self, position: usize) -> &Clause {
        &self.clauses[position]
    }

    /// Cláusulas de um predicado, em ordem da fonte.
    pub fn clauses_for<'a>(&'a self, sig: &Signature) -> impl Iterator<Item = &'a Clause> + 'a {
        self.candidates(sig).iter().map(move |&i| &self.clauses[i])
    }

    /// Fatos sem variáveis — cada um deve ser demonstrável exatamente uma vez.
    pub fn ground_facts(&self) -> impl Iterator<Item = &Clause> {
        self.clauses
            .iter()
            .filter(|c| c.is_fact() && c.head.is_ground())
    }

    /// Assinaturas definidas, em ordem alfabética.
    pub fn signatures(&self) -> Vec<&Signature> {
        let mut sigs: Vec<&Signature> = self.index.keys().collect();
        sigs.sort();
        sigs
    }

    pub fn is_defined(&self, sig: &Signature) -> bool {
        self.index.contains_key(sig)
    }

    /// Retorna o número total de cláusulas na KB.
    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    /// Retorna o número de predicados (assinaturas distintas) definidos.
    pub fn predicate_count(&self) -> usize {
        self.index.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clause::GoalDecl;

    fn fact(functor: &str, args: &[&str]) -> Clause {
        Clause::fact(Term::compound(
            functor,
            args.iter().map(|a| Term::atom(a)).collect(),
        ))
        .unwrap()
    }

    #[test]
    fn index_preserves_source_order() {
        let kb = KnowledgeBase::from_clauses(vec![
            fact("parent", &["john", "mary"]),
            fact("male", &["john"]),
            fact("parent", &["john", "paul"]),
        ])
        .unwrap();

        let listed: Vec<String> = kb
            .clauses_for(&Signature::new("parent", 2))
            .map(|c| c.to_string())
            .collect();
        assert_eq!(listed, vec!["parent(john, mary).", "parent(john, paul)."]);
        assert_eq!(kb.candidates(&Signature::new("parent", 2)), &[0, 2]);
        assert_eq!(kb.predicate_count(), 2);
        assert_eq!(kb.clause_count(), 3);
    }

    #[test]
    fn unknown_predicate_has_no_candidates() {
        let kb = KnowledgeBase::new();
        assert!(kb.candidates(&Signature::new("ghost", 1)).is_empty());
        assert!(!kb.is_defined(&Signature::new("ghost", 1)));
    }

    #[test]
    fn inconsistent_arity_is_rejected() {
        let err = KnowledgeBase::from_clauses(vec![
            fact("parent", &["john", "mary"]),
            fact("parent", &["john"]),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            LoadError::InconsistentArity { first: 2, second: 1, .. }
        ));
    }

    #[test]
    fn inconsistent_arity_in_body_is_rejected() {
        let rule = Clause::new(
            Term::compound("father", vec![Term::var("X")]),
            vec![Term::compound("parent", vec![Term::var("X")])],
        )
        .unwrap();
        let err = KnowledgeBase::from_clauses(vec![fact("parent", &["john", "mary"]), rule])
            .unwrap_err();
        assert!(matches!(err, LoadError::InconsistentArity { .. }));
    }

    #[test]
    fn from_decls_checks_declared_arity() {
        let err = KnowledgeBase::from_decls(vec![ClauseDecl {
            head: GoalDecl::new("male", 1, vec![]),
            body: vec![],
        }])
        .unwrap_err();
        assert!(matches!(err, LoadError::ArityMismatch { .. }));
    }

    #[test]
    fn ground_facts_skip_rules() {
        let rule = Clause::new(
            Term::compound("father", vec![Term::var("X"), Term::var("Y")]),
            vec![Term::compound("parent", vec![Term::var("X"), Term::var("Y")])],
        )
        .unwrap();
        let kb = KnowledgeBase::from_clauses(vec![fact("parent", &["john", "mary"]), rule])
            .unwrap();
        assert_eq!(kb.ground_facts().count(), 1);
    }
}
