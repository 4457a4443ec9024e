//! # Unificação
//!
//! [`unify()`] tenta estender a [`Substitution`] de modo que os dois termos
//! fiquem idênticos após aplicá-la:
//!
//! | Par | Resultado |
//! |-----|-----------|
//! | átomo × átomo | sucesso sse iguais |
//! | variável livre × qualquer | liga a variável |
//! | variável ligada × qualquer | unifica o valor ligado |
//! | composto × composto | mesmo functor, mesma aridade, argumentos da esquerda para a direita |
//! | demais combinações | falha |
//!
//! Sem occurs-check. Em caso de falha, as ligações parciais são desfeitas e
//! a substituição volta exatamente ao estado de entrada.

use crate::core::{Substitution, Term};

/// Unifica `a` e `b` sob `subst`. Retorna `false` (substituição intacta)
/// se não houver unificador.
pub fn unify(a: &Term, b: &Term, subst: &mut Substitution) -> bool {
    let mark = subst.mark();
    if unify_terms(a, b, subst) {
        true
    } else {
        subst.undo_to(mark);
        false
    }
}

fn unify_terms(a: &Term, b: &Term, subst: &mut Substitution) -> bool {
    let a = subst.walk(a).clone();
    let b = subst.walk(b).clone();
    match (a, b) {
        (Term::Var(x), Term::Var(y)) if x == y => true,
        (Term::Var(x), other) | (other, Term::Var(x)) => {
            subst.bind(x, other);
            true
        }
        (Term::Atom(x), Term::Atom(y)) => x == y,
        (
            Term::Compound {
                functor: f,
                args: xs,
            },
            Term::Compound {
                functor: g,
                args: ys,
            },
        ) => {
            f == g
                && xs.len() == ys.len()
                && xs.iter().zip(&ys).all(|(x, y)| unify_terms(x, y, subst))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Var;

    fn parent(a: Term, b: Term) -> Term {
        Term::compound("parent", vec![a, b])
    }

    #[test]
    fn atoms_unify_iff_identical() {
        let mut s = Substitution::new();
        assert!(unify(&Term::atom("john"), &Term::atom("john"), &mut s));
        assert!(!unify(&Term::atom("john"), &Term::atom("mary"), &mut s));
        assert!(s.is_empty());
    }

    #[test]
    fn variable_binds_to_atom() {
        let mut s = Substitution::new();
        assert!(unify(&Term::var("X"), &Term::atom("john"), &mut s));
        assert_eq!(s.get(&Var::new("X")), Some(&Term::atom("john")));
    }

    #[test]
    fn bound_variable_unifies_through_its_value() {
        let mut s = Substitution::new();
        s.bind(Var::new("X"), Term::atom("john"));
        assert!(unify(&Term::var("X"), &Term::atom("john"), &mut s));
        assert!(!unify(&Term::var("X"), &Term::atom("mary"), &mut s));
    }

    #[test]
    fn compounds_unify_argumentwise() {
        let mut s = Substitution::new();
        let goal = parent(Term::var("X"), Term::atom("mary"));
        let head = parent(Term::atom("john"), Term::var("Y"));
        assert!(unify(&goal, &head, &mut s));
        assert_eq!(s.apply(&goal).to_string(), "parent(john, mary)");
        assert_eq!(s.apply(&head).to_string(), "parent(john, mary)");
    }

    #[test]
    fn repeated_variable_must_be_consistent() {
        let mut s = Substitution::new();
        let same = Term::compound("same", vec![Term::var("X"), Term::var("X")]);
        let ok = Term::compound("same", vec![Term::atom("a"), Term::atom("a")]);
        let bad = Term::compound("same", vec![Term::atom("a"), Term::atom("b")]);
        assert!(!unify(&same, &bad, &mut s));
        assert!(s.is_empty());
        assert!(unify(&same, &ok, &mut s));
    }

    #[test]
    fn failure_rolls_back_partial_bindings() {
        let mut s = Substitution::new();
        s.bind(Var::new("Z"), Term::atom("susan"));
        let goal = parent(Term::var("X"), Term::atom("mary"));
        let head = parent(Term::atom("john"), Term::atom("paul"));
        assert!(!unify(&goal, &head, &mut s));
        // X foi ligada antes de `mary` × `paul` falhar, e precisa ter sumido.
        assert_eq!(s.get(&Var::new("X")), None);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn functor_and_arity_must_match() {
        let mut s = Substitution::new();
        let a = Term::compound("f", vec![Term::atom("a")]);
        let b = Term::compound("g", vec![Term::atom("a")]);
        let c = Term::compound("f", vec![Term::atom("a"), Term::atom("b")]);
        assert!(!unify(&a, &b, &mut s));
        assert!(!unify(&a, &c, &mut s));
        assert!(!unify(&a, &Term::atom("f"), &mut s));
    }

    #[test]
    fn variable_to_variable() {
        let mut s = Substitution::new();
        assert!(unify(&Term::var("X"), &Term::var("Y"), &mut s));
        assert!(unify(&Term::var("Y"), &Term::atom("emma"), &mut s));
        assert_eq!(s.apply(&Term::var("X")), Term::atom("emma"));
        assert!(unify(&Term::var("X"), &Term::var("X"), &mut s));
    }
}
