//! # Módulo Core — Tipos Fundamentais do Domínio
//!
//! Este módulo agrupa os **tipos fundamentais** sobre os quais o motor de
//! inferência trabalha:
//!
//! - [`Term`] — átomo, variável ou termo composto
//! - [`Clause`] — fato ou regra (cláusula de Horn)
//! - [`Substitution`] — ligações variável → termo, com trilha para desfazer
//! - [`KnowledgeBase`] — cláusulas indexadas por functor/aridade
//! - [`LoadError`], [`SolveError`], [`ParseError`] — erros do domínio
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use crate::core::{Clause, KnowledgeBase, Term};
//!
//! let kb = KnowledgeBase::from_clauses(vec![
//!     Clause::fact(Term::compound("parent", vec![Term::atom("john"), Term::atom("mary")]))?,
//! ])?;
//! ```

pub mod clause;
pub mod error;
pub mod knowledge_base;
pub mod substitution;
pub mod term;

pub use clause::{Clause, ClauseDecl, GoalDecl};
pub use error::{LoadError, ParseError, SolveError};
pub use knowledge_base::KnowledgeBase;
pub use substitution::{Mark, Substitution};
pub use term::{Signature, Symbol, Term, Var};
