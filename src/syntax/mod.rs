//! # Módulo Syntax — Formato Textual de Cláusulas
//!
//! Transforma o texto da KB (`kb/family_kb.pl`) e das consultas em
//! [`Clause`](crate::core::Clause)s e [`Term`](crate::core::Term)s.
//!
//! ```text
//! texto ──lexer──▶ tokens ──parser──▶ Vec<Clause> / Vec<Term>
//! ```

pub mod lexer;
pub mod parser;

pub use parser::{parse_program, parse_query};
