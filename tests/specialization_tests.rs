//! Integration tests for generic specialization and control-split tracking.

mod common;

use common::*;
use pretty_assertions::assert_eq;
use tern::prelude::*;
use tern::{NodeId, generated_callable_name};

/// `macro Id<T>(x: T): T { return x; }` and its callable node.
fn id_generic(b: &mut AstBuilder) -> (Decl, NodeId) {
    let sig = b.signature().param("x", "T").returns("T");
    let callable = b.macro_callable("Id", sig);
    let node = callable.id;
    let x = b.ident("x");
    let ret = b.ret(Some(x));
    let body = b.block(vec![ret]);
    (b.generic(callable, &["T"], Some(body)), node)
}

/// `macro Convert<param>(x: param): returns {}`
fn convert_generic(b: &mut AstBuilder, param: &str, returns: &str) -> Decl {
    let sig = b.signature().param("x", param).returns(returns);
    let callable = b.macro_callable("Convert", sig);
    let body = b.block(vec![]);
    b.generic(callable, &[param], Some(body))
}

/// `Convert<Smi>(x: param): returns {}`
fn convert_specialization(b: &mut AstBuilder, param: &str, returns: &str) -> Decl {
    let sig = b.signature().param("x", param).returns(returns);
    let body = b.block(vec![]);
    b.specialization("Convert", &["Smi"], sig, Some(body))
}

// =============================================================================
// Call-site specialization
// =============================================================================

#[test]
fn test_identity_scenario_realizes_once() {
    let mut b = AstBuilder::new();
    let smi = smi(&mut b);
    let (id, _) = id_generic(&mut b);
    let first = call_stmt(&mut b, "Id", &["Smi"]);
    let second = call_stmt(&mut b, "Id", &["Smi"]);
    let caller = void_macro(&mut b, "Caller", vec![first, second]);

    let result = Declared::run(&b.ast(vec![smi, id, caller]));

    result.assert_success();
    let specialized: Vec<_> = result
        .decls
        .callables()
        .filter(|c| c.specialization.is_some())
        .collect();
    assert_eq!(specialized.len(), 1);
    let generic = result.decls.generics().next().expect("Id declared");
    let key = SpecializationKey::new(generic.id, vec![result.type_hash("Smi")]);
    assert_eq!(specialized[0].specialization.as_ref(), Some(&key));
    assert_eq!(specialized[0].name, generated_callable_name("Id", &["Smi".to_string()]));
}

#[test]
fn test_distinct_type_vectors_realize_separately() {
    let mut b = AstBuilder::new();
    let smi = smi(&mut b);
    let (id, id_node) = id_generic(&mut b);
    let on_smi = call_stmt(&mut b, "Id", &["Smi"]);
    let on_object = call_stmt(&mut b, "Id", &["Object"]);
    let caller = void_macro(&mut b, "Caller", vec![on_smi, on_object]);

    let result = Declared::run(&b.ast(vec![smi, id, caller]));

    result.assert_success();
    assert_eq!(result.output.specializations_realized, 2);
    assert_eq!(result.callable("Id3Smi").signature.return_type, result.type_hash("Smi"));
    assert_eq!(
        result.callable("Id6Object").signature.return_type,
        result.type_hash("Object")
    );
    let generic = result.decls.generics().next().expect("Id declared").id;
    for ty in ["Smi", "Object"] {
        let key = SpecializationKey::new(generic, vec![result.type_hash(ty)]);
        assert_eq!(result.changed(id_node, Some(&key)), vec!["_return"]);
    }
}

#[test]
fn test_specialization_requested_inside_module() {
    let mut b = AstBuilder::new();
    let smi = smi(&mut b);
    let (id, _) = id_generic(&mut b);
    let call = call_stmt(&mut b, "Id", &["Smi"]);
    let caller = void_macro(&mut b, "Caller", vec![call]);
    let module = b.module("base", vec![id, caller]);

    let result = Declared::run(&b.ast(vec![smi, module]));

    result.assert_success();
    assert_eq!(result.output.specializations_realized, 1);
    assert!(result.decls.lookup("Id").is_none());
}

#[test]
fn test_generic_without_body_is_not_queued() {
    let mut b = AstBuilder::new();
    let smi = smi(&mut b);
    let sig = b.signature().param("x", "T").returns("T");
    let callable = b.callable(
        "Cast",
        CallableKind::ExternalMacro {
            op: "Cast".to_string(),
        },
        sig,
    );
    let cast = b.generic(callable, &["T"], None);
    let call = call_stmt(&mut b, "Cast", &["Smi"]);
    let caller = void_macro(&mut b, "Caller", vec![call]);

    let options = DeclarationOptions::new().drain_specializations(false);
    let result = Declared::run_with(&b.ast(vec![smi, cast, caller]), options);

    result.assert_success();
    assert!(result.output.pending_specializations.is_empty());
}

#[test]
fn test_extern_specialization_has_no_body() {
    let mut b = AstBuilder::new();
    let smi = smi(&mut b);
    let sig = b.signature().param("x", "T").returns("T");
    let callable = b.callable(
        "Cast",
        CallableKind::ExternalMacro {
            op: "Cast".to_string(),
        },
        sig,
    );
    let cast = b.generic(callable, &["T"], None);
    let spec_sig = b.signature().param("x", "Smi").returns("Smi");
    let spec = b.specialization("Cast", &["Smi"], spec_sig, None);

    let result = Declared::run(&b.ast(vec![smi, cast, spec]));

    result.assert_success();
    let cast = result.callable("Cast3Smi");
    assert!(cast.body.is_none());
    assert!(cast.variant.is_external());
}

#[test]
fn test_deferred_drain_skips_explicitly_realized_keys() {
    let mut b = AstBuilder::new();
    let smi = smi(&mut b);
    let (id, _) = id_generic(&mut b);
    let smi_call = call_stmt(&mut b, "Id", &["Smi"]);
    let object_call = call_stmt(&mut b, "Id", &["Object"]);
    let caller = void_macro(&mut b, "Caller", vec![smi_call, object_call]);
    let sig = b.signature().param("x", "Smi").returns("Smi");
    let body = b.block(vec![]);
    let explicit = b.specialization("Id", &["Smi"], sig, Some(body));
    let ast = b.ast(vec![smi, id, caller, explicit]);

    let options = DeclarationOptions::new().drain_specializations(false);
    let (mut decls, output) = declare(&ast, options);

    assert_eq!(output.specializations_realized, 1);
    assert_eq!(output.pending_specializations.len(), 1);
    assert_eq!(
        decls.oracle().type_names(&output.pending_specializations[0].key.types),
        vec!["Object"]
    );

    let drained = DeclarationPass::new(&mut decls, options).drain(output.pending_specializations);

    assert!(drained.errors.is_empty(), "{:?}", drained.errors);
    assert_eq!(drained.specializations_realized, 1);
    assert!(decls.callables().any(|c| c.name == "Id6Object"));
}

// =============================================================================
// Explicit specialization matching
// =============================================================================

#[test]
fn test_explicit_match_ambiguous_single_and_none() {
    // Both bindings produce (Smi) -> Smi.
    let mut b = AstBuilder::new();
    let smi_decl = smi(&mut b);
    let first = convert_generic(&mut b, "T", "T");
    let second = convert_generic(&mut b, "U", "U");
    let spec = convert_specialization(&mut b, "Smi", "Smi");
    let result = Declared::run(&b.ast(vec![smi_decl, first, second, spec]));
    let DeclarationError::AmbiguousSpecialization { first, second, .. } = result.single_error()
    else {
        panic!("expected ambiguity, got {:?}", result.output.errors);
    };
    assert!(first.starts_with("Convert<T>"));
    assert!(second.starts_with("Convert<U>"));

    // Only the first binding produces (Smi) -> Object.
    let mut b = AstBuilder::new();
    let smi_decl = smi(&mut b);
    let first = convert_generic(&mut b, "T", "Object");
    let second = convert_generic(&mut b, "U", "U");
    let spec = convert_specialization(&mut b, "Smi", "Object");
    let result = Declared::run(&b.ast(vec![smi_decl, first, second, spec]));
    result.assert_success();
    let generics: Vec<_> = result.decls.generics().collect();
    assert_eq!(generics[0].specialization_count(), 1);
    assert_eq!(generics[1].specialization_count(), 0);

    // Neither binding produces (Object) -> Smi.
    let mut b = AstBuilder::new();
    let smi_decl = smi(&mut b);
    let first = convert_generic(&mut b, "T", "T");
    let second = convert_generic(&mut b, "U", "Object");
    let spec = convert_specialization(&mut b, "Object", "Smi");
    let result = Declared::run(&b.ast(vec![smi_decl, first, second, spec]));
    assert!(matches!(
        result.single_error(),
        DeclarationError::NoMatchingGeneric { name, .. } if name == "Convert"
    ));
}

#[test]
fn test_explicit_specialization_ignores_generics_of_other_arity() {
    let mut b = AstBuilder::new();
    let smi = smi(&mut b);
    let pair_sig = b.signature().param("x", "T").returns("U");
    let pair = b.macro_callable("Convert", pair_sig);
    let pair_body = b.block(vec![]);
    let pair = b.generic(pair, &["T", "U"], Some(pair_body));
    let single = convert_generic(&mut b, "T", "T");
    let spec = convert_specialization(&mut b, "Smi", "Smi");

    let result = Declared::run(&b.ast(vec![smi, pair, single, spec]));

    result.assert_success();
    let generics: Vec<_> = result.decls.generics().collect();
    assert_eq!(generics[0].specialization_count(), 0);
    assert_eq!(generics[1].specialization_count(), 1);
}

#[test]
fn test_failed_specialization_does_not_block_siblings() {
    let mut b = AstBuilder::new();
    let smi = smi(&mut b);
    let (id, _) = id_generic(&mut b);
    let sig = b.signature().param("x", "Object").returns("Smi");
    let body = b.block(vec![]);
    let bad = b.specialization("Id", &["Smi"], sig, Some(body));
    let call = call_stmt(&mut b, "Id", &["Smi"]);
    let caller = void_macro(&mut b, "Caller", vec![call]);

    let result = Declared::run(&b.ast(vec![smi, id, bad, caller]));

    assert!(matches!(
        result.single_error(),
        DeclarationError::NoMatchingGeneric { .. }
    ));
    assert_eq!(result.output.specializations_realized, 1);
    assert_eq!(result.decls.current_scope(), tern::ScopeId::new(0));
    assert!(result.decls.current_specialization().is_none());
}

#[test]
fn test_arity_mismatch_points_at_generic_declaration() {
    let mut b = AstBuilder::new();
    let smi = smi(&mut b);
    let (id, _) = id_generic(&mut b);
    let declared_at = id.span();
    let call = call_stmt(&mut b, "Id", &["Smi", "Object"]);
    let caller = void_macro(&mut b, "Caller", vec![call]);

    let result = Declared::run(&b.ast(vec![smi, id, caller]));

    let err = result.single_error();
    assert!(matches!(
        err,
        DeclarationError::GenericArityMismatch {
            expected: 1,
            got: 2,
            ..
        }
    ));
    assert_eq!(err.span(), declared_at);
    assert!(err.to_string().starts_with(&format!("at {}:", declared_at)));
}

// =============================================================================
// Control splits
// =============================================================================

#[test]
fn test_try_handler_scenario() {
    let mut b = AstBuilder::new();
    let smi = smi(&mut b);
    let x = zero_var(&mut b, "x", "Smi");
    let y = zero_var(&mut b, "y", "Smi");
    let assign_y = assign_one(&mut b, "y");
    let try_block = b.block(vec![]);
    let assign_x = assign_one(&mut b, "x");
    let handler_body = b.block(vec![assign_x]);
    let parameters = b.parameters(&[("reason", "Smi")]);
    let handler = b.label_block("Fail", parameters, handler_body);
    let try_stmt = b.try_label(try_block, vec![handler]);
    let try_id = stmt_id(&try_stmt);
    let guarded = void_macro(&mut b, "Guarded", vec![x, y, assign_y, try_stmt]);

    let result = Declared::run(&b.ast(vec![smi, guarded]));

    result.assert_success();
    assert_eq!(result.changed(try_id, None), vec!["x"]);
}

#[test]
fn test_nested_splits_all_record_the_assignment() {
    let mut b = AstBuilder::new();
    let smi = smi(&mut b);
    let x = zero_var(&mut b, "x", "Smi");
    let assign_x = assign_one(&mut b, "x");
    let inner_body = b.block(vec![assign_x]);
    let condition = b.number("1");
    let inner = b.while_loop(condition, inner_body);
    let inner_id = stmt_id(&inner);
    let try_block = b.block(vec![inner]);
    let try_stmt = b.try_label(try_block, vec![]);
    let try_id = stmt_id(&try_stmt);
    let nested = void_macro(&mut b, "Nested", vec![x, try_stmt]);

    let result = Declared::run(&b.ast(vec![smi, nested]));

    result.assert_success();
    assert_eq!(result.changed(inner_id, None), vec!["x"]);
    assert_eq!(result.changed(try_id, None), vec!["x"]);
}

#[test]
fn test_for_of_records_body_assignments_only() {
    let mut b = AstBuilder::new();
    let smi = smi(&mut b);
    let total = zero_var(&mut b, "total", "Smi");
    let element = b.var_declaration("element", "Object", None);
    let iterable = b.ident("items");
    let bump = b.increment("total");
    let bump = b.expr_stmt(bump);
    let body = b.block(vec![bump]);
    let for_of = b.for_of(element, iterable, body);
    let for_of_id = stmt_id(&for_of);
    let sum = void_macro(&mut b, "Sum", vec![total, for_of]);

    let result = Declared::run(&b.ast(vec![smi, sum]));

    result.assert_success();
    assert_eq!(result.changed(for_of_id, None), vec!["total"]);
}

#[test]
fn test_if_is_not_a_split() {
    let mut b = AstBuilder::new();
    let smi = smi(&mut b);
    let x = zero_var(&mut b, "x", "Smi");
    let assign = assign_one(&mut b, "x");
    let condition = b.number("1");
    let if_stmt = b.if_stmt(condition, assign, None);
    let branching = void_macro(&mut b, "Branching", vec![x, if_stmt]);

    let result = Declared::run(&b.ast(vec![smi, branching]));

    result.assert_success();
    // Only the macro body itself is a split.
    assert_eq!(result.output.control_splits.len(), 1);
}
