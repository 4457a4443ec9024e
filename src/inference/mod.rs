//! # Módulo Inference — Motor de Resolução SLD
//!
//! Este módulo contém o **motor de inferência**: dado um objetivo (com ou
//! sem variáveis), encontra todas as ligações que o tornam demonstrável a
//! partir da [`KnowledgeBase`](crate::core::KnowledgeBase).
//!
//! ## Componentes
//!
//! | Sub-módulo | Papel |
//! |------------|-------|
//! | [`unify`] | Unificação com desfazer por trilha |
//! | [`solver`] | Busca em profundidade, esquerda→direita, com pontos de escolha explícitos |
//! | [`trace`] | Eventos do rastro da prova |
//! | [`engine`] | Fachada de consultas: respostas, provas, relatórios |
//!
//! ## Exemplo
//!
//! ```text
//! KB:       father(X, Y) :- parent(X, Y), male(X).
//! Consulta: father(X, mary)
//! Resposta: X = john
//! ```

pub mod engine;
pub mod solver;
pub mod trace;
pub mod unify;

pub use engine::{Answer, InferenceEngine, Proof, Query, QueryReport};
pub use solver::Solutions;
pub use trace::TraceEvent;
pub use unify::unify;
