//! End-to-end scenarios exercised through the public `typeforge` API: a
//! small `elaborate` helper, one `#[test]` per scenario.

use typeforge::elaborate::CodeDescriptor;
use typeforge::macro_expand::IdentityExpander;
use typeforge::surface::{print, read_all};
use typeforge::{EngineError, Elaborator, Environment};

fn elaborate(src: &str) -> Result<Vec<CodeDescriptor>, EngineError> {
    let env = Environment::with_builtins();
    let mut elaborator = Elaborator::new(env, &IdentityExpander);
    let forms = read_all(src).expect("reader should accept well-formed s-expressions");
    let mut out = Vec::new();
    for form in &forms {
        out.extend(elaborator.elaborate_top(form)?);
    }
    Ok(out)
}

fn defined_type(descriptors: &[CodeDescriptor], name: &str) -> String {
    for d in descriptors {
        match d {
            CodeDescriptor::Define { internal_name, ty, .. }
            | CodeDescriptor::Assign { internal_name, ty, .. }
                if internal_name == name =>
            {
                return print(ty);
            }
            _ => {}
        }
    }
    panic!("no definition found for `{}`", name);
}

#[test]
fn scenario_identity_function_is_polymorphic() {
    let descriptors = elaborate("(define id (fn (x) x))").unwrap();
    assert_eq!(defined_type(&descriptors, "id"), "a -> a");
}

#[test]
fn scenario_let_polymorphism_lets_id_be_used_at_two_types() {
    // id is bound with `let`, so it can be applied to an Int and used in
    // an `if` condition (Bool) in the same body.
    let descriptors = elaborate(
        "(define result
           (let ((id (fn (x) x)))
             (if (id (= 1 1)) (id 1) (id 2))))",
    )
    .unwrap();
    assert_eq!(defined_type(&descriptors, "result"), "Int");
}

#[test]
fn scenario_lambda_bound_variable_is_monomorphic_and_self_application_fails() {
    let err = elaborate("(define bad (fn (x) (x x)))").unwrap_err();
    assert!(matches!(err, EngineError::InfiniteType { .. }));
}

#[test]
fn scenario_factorial_via_letrec_shorthand() {
    let descriptors =
        elaborate("(define (fact n) (if (= n 0) 1 (* n (fact (- n 1)))))").unwrap();
    assert_eq!(defined_type(&descriptors, "fact"), "Int -> Int");
}

#[test]
fn scenario_maybe_adt_constructors_are_usable() {
    let descriptors = elaborate(
        "(define-type (Maybe a) (Just a) (Nothing))
         (define one (Just 1))",
    )
    .unwrap();
    assert_eq!(defined_type(&descriptors, "one"), "(Maybe Int)");
}

#[test]
fn scenario_maybe_predicate_is_a_usable_bound_name() {
    // define-type (Maybe a) Nothing (Just a)); predicate Just-P has type
    // (Maybe a) -> Bool and is itself callable, not just listed.
    let descriptors = elaborate(
        "(define-type (Maybe a) (Nothing) (Just a))
         (define check (fn (x) (Just-P x)))",
    )
    .unwrap();
    match &descriptors[0] {
        CodeDescriptor::DefineType { predicates, .. } => {
            assert_eq!(predicates, &vec!["Nothing-P".to_string(), "Just-P".to_string()]);
        }
        _ => panic!("expected a DefineType descriptor"),
    }
    assert_eq!(defined_type(&descriptors, "check"), "(Maybe a) -> Bool");
}

#[test]
fn scenario_self_application_is_an_infinite_type() {
    let err = elaborate("(define omega (fn (x) (x x)))").unwrap_err();
    assert!(matches!(err, EngineError::InfiniteType { .. }));
}

#[test]
fn redefining_a_name_emits_an_assign_descriptor_not_an_error() {
    let descriptors = elaborate("(define x 1) (define x 2)").unwrap();
    assert!(matches!(descriptors[0], CodeDescriptor::Define { .. }));
    assert!(matches!(descriptors[1], CodeDescriptor::Assign { .. }));
}

#[test]
fn unbound_variable_is_reported() {
    let err = elaborate("(define x nope)").unwrap_err();
    assert!(matches!(err, EngineError::UnboundVariable { .. }));
}

#[test]
fn type_mismatch_between_if_branches_is_reported() {
    let err = elaborate(
        "(define-type (Maybe a) (Just a) (Nothing))
         (define bad (if (= 1 1) 1 Nothing))",
    )
    .unwrap_err();
    assert!(matches!(err, EngineError::TypeMismatch { .. }));
}

#[test]
fn declare_then_matching_define_succeeds() {
    let descriptors = elaborate("(declare one (-> () Int)) (define (one) 1)").unwrap();
    assert_eq!(defined_type(&descriptors, "one"), "() -> Int");
}

#[test]
fn declare_then_mismatched_define_is_rejected() {
    let err = elaborate("(declare x Bool) (define x 1)").unwrap_err();
    assert!(matches!(err, EngineError::TypeMismatch { .. }));
}

#[test]
fn host_escape_trusts_its_annotation() {
    let descriptors = elaborate("(define magic (lisp Int (some-host-form 1 2 3)))").unwrap();
    assert_eq!(defined_type(&descriptors, "magic"), "Int");
}
