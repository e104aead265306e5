//! End-to-end tests: formula text in, JavaScript fragment out.

use spark_codegen::{compile, CodegenError, ExprCompiler, JsWriter, MAX_SUBEXPRESSION_DEPTH};
use spark_metadata::{MetadataRegistry, Scope};
use spark_types::{
    CompilationContext, Expression, ExprNode, ExprNodeKind, Grammar, ParsedExpression, Span,
};

fn scope() -> Scope {
    let mut scope = Scope::new();
    scope.declare_object("Hero", "Sprite");
    scope.declare_object("Ghost", "Sprite");
    scope.declare_object("Bat", "Sprite");
    scope.declare_group("Enemies", ["Ghost", "Bat"]);
    scope.declare_behavior("Physics", "PhysicsBehavior");
    scope
}

fn compile_one(text: &str, grammar: Grammar) -> Result<(String, JsWriter, CompilationContext), CodegenError> {
    let registry = MetadataRegistry::with_builtins();
    let scope = scope();
    let mut writer = JsWriter::new();
    let mut ctx = CompilationContext::new();
    let code = compile(text, grammar, &registry, &scope, &mut writer, &mut ctx)?;
    Ok((code, writer, ctx))
}

fn compile_num(text: &str) -> String {
    compile_one(text, Grammar::Number).expect("compilation failed").0
}

fn compile_str(text: &str) -> String {
    compile_one(text, Grammar::Text).expect("compilation failed").0
}

// ─────────────────────────────────────────────────────────────────────
// Constants & literals
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_constants_stream_in_source_order() {
    assert_eq!(compile_num("5 + 3 * 2"), "5+3*2");
    assert_eq!(compile_num("-1.5/2"), "-1.5/2");
}

#[test]
fn test_empty_input_compiles_to_neutral_literal() {
    assert_eq!(compile_num(""), "0");
    assert_eq!(compile_num("   "), "0");
    assert_eq!(compile_str(""), "\"\"");
}

#[test]
fn test_bare_string_literal() {
    assert_eq!(compile_str("\"hello\""), "\"hello\"");
}

#[test]
fn test_bare_string_escapes_survive_round_trip() {
    assert_eq!(compile_str("\"say \\\"hi\\\"\""), "\"say \\\"hi\\\"\"");
}

#[test]
fn test_string_concatenation() {
    let (code, writer, _) =
        compile_one("\"a\" + VariableString(msg)", Grammar::Text).unwrap();
    assert_eq!(
        code,
        "\"a\"+sparkrt.vars.getString(runtimeScene.getVariables().get(\"msg\"))"
    );
    assert_eq!(writer.includes().collect::<Vec<_>>(), ["vars.js"]);
}

// ─────────────────────────────────────────────────────────────────────
// Static calls
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_static_call_with_parameters() {
    let (code, writer, _) = compile_one("clamp(1, 2, 3)", Grammar::Number).unwrap();
    assert_eq!(code, "sparkrt.math.clamp(1, 2, 3)");
    assert_eq!(writer.includes().collect::<Vec<_>>(), ["math.js"]);
}

#[test]
fn test_nested_calls_compile_inside_out() {
    assert_eq!(compile_num("abs(min(1, 2))"), "Math.abs(Math.min(1, 2))");
}

#[test]
fn test_string_parameter_compiles_under_string_grammar() {
    assert_eq!(
        compile_num("ToNumber(\"12\")"),
        "sparkrt.str.toNumber(\"12\")"
    );
}

#[test]
fn test_variable_parameter() {
    assert_eq!(
        compile_num("Variable(score) + 2"),
        "sparkrt.vars.getNumber(runtimeScene.getVariables().get(\"score\"))+2"
    );
}

#[test]
fn test_override_output_is_taken_verbatim() {
    // The override decides everything, conversion wrapping included.
    assert_eq!(compile_str("NewLine()"), "\"\\n\"");
}

#[test]
fn test_non_utf8_string_value_gets_conversion_wrap() {
    assert_eq!(
        compile_str("LocaleDate(0)"),
        "sparkrt.str.fromLocale(sparkrt.time.localeDate(0))"
    );
}

#[test]
fn test_utf8_string_value_is_not_wrapped() {
    assert_eq!(
        compile_str("ToString(42)"),
        "sparkrt.str.toString(42)"
    );
}

// ─────────────────────────────────────────────────────────────────────
// Object & behavior calls
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_object_call_on_single_instance() {
    let (code, writer, ctx) = compile_one("Hero.X()", Grammar::Number).unwrap();
    assert_eq!(
        code,
        "(GDHeroObjects.length ? GDHeroObjects[0].getX() : 0)"
    );
    assert!(ctx.is_object_list_required("Hero"));
    assert_eq!(
        writer.includes().collect::<Vec<_>>(),
        ["runtimeobjects/sprite.js"]
    );
}

#[test]
fn test_group_call_folds_over_members_in_order() {
    let (code, _, ctx) = compile_one("Enemies.X()", Grammar::Number).unwrap();
    assert_eq!(
        code,
        "(GDBatObjects.length ? GDBatObjects[0].getX() : \
         (GDGhostObjects.length ? GDGhostObjects[0].getX() : 0))"
    );
    assert!(ctx.is_object_list_required("Ghost"));
    assert!(ctx.is_object_list_required("Bat"));
}

#[test]
fn test_unknown_object_expands_to_neutral_literal() {
    let (code, _, ctx) = compile_one("Nobody.X()", Grammar::Number).unwrap();
    assert_eq!(code, "0");
    assert_eq!(ctx.required_object_lists().count(), 0);
}

#[test]
fn test_string_object_call_under_string_grammar() {
    assert_eq!(
        compile_str("Hero.ObjectName()"),
        "(GDHeroObjects.length ? GDHeroObjects[0].getName() : \"\")"
    );
}

#[test]
fn test_behavior_call() {
    let (code, writer, ctx) = compile_one("Hero.Physics::Speed()", Grammar::Number).unwrap();
    assert_eq!(
        code,
        "(GDHeroObjects.length ? GDHeroObjects[0].getBehavior(\"Physics\").getSpeed() : 0)"
    );
    assert!(ctx.is_object_list_required("Hero"));
    assert_eq!(
        writer.includes().collect::<Vec<_>>(),
        ["behaviors/physics.js"]
    );
}

// ─────────────────────────────────────────────────────────────────────
// Sub-expressions
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_parenthesized_group_keeps_its_parentheses() {
    assert_eq!(compile_num("(1 + 2) * 3"), "(1+2)*3");
    assert_eq!(
        compile_num("2 * (Hero.X() + 1)"),
        "2*((GDHeroObjects.length ? GDHeroObjects[0].getX() : 0)+1)"
    );
}

#[test]
fn test_nested_parse_failure_is_forwarded() {
    let err = compile_one("(1 + \"x\")", Grammar::Number).unwrap_err();
    match err {
        CodegenError::Parse { position, .. } => assert_eq!(position, 4),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn test_depth_limit_stops_runaway_nesting() {
    let levels = (MAX_SUBEXPRESSION_DEPTH + 5) as usize;
    let text = format!("{}1{}", "(".repeat(levels), ")".repeat(levels));
    let err = compile_one(&text, Grammar::Number).unwrap_err();
    assert_eq!(err, CodegenError::DepthLimit);
}

// ─────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_first_error_wins_with_its_position() {
    let err = compile_one("1 + Unknown(2)", Grammar::Number).unwrap_err();
    match &err {
        CodegenError::Parse { position, message } => {
            assert_eq!(*position, 4);
            assert!(message.contains("Unknown"), "message: {message}");
        }
        other => panic!("expected parse error, got {other:?}"),
    }
    let diag = err.diagnostic().unwrap();
    assert_eq!(diag.position, 4);
}

#[test]
fn test_string_literal_rejected_under_numeric_grammar() {
    let err = compile_one("\"x\"", Grammar::Number).unwrap_err();
    assert!(matches!(err, CodegenError::Parse { position: 0, .. }));
}

// ─────────────────────────────────────────────────────────────────────
// Hand-built trees
// ─────────────────────────────────────────────────────────────────────

fn compile_nodes(nodes: Vec<ExprNode>, grammar: Grammar) -> (String, CompilationContext) {
    let registry = MetadataRegistry::with_builtins();
    let scope = scope();
    let mut writer = JsWriter::new();
    let mut ctx = CompilationContext::new();
    let code = ExprCompiler::new(&registry, &scope, grammar)
        .compile_parsed(&ParsedExpression { nodes }, &mut writer, &mut ctx)
        .expect("compilation failed");
    (code, ctx)
}

#[test]
fn test_object_call_without_object_slot_emits_nothing() {
    let node = ExprNode::new(
        ExprNodeKind::ObjectCall {
            name: "X".to_string(),
            params: Vec::new(),
        },
        Span::point(0),
    );
    let (code, ctx) = compile_nodes(vec![node], Grammar::Number);
    assert_eq!(code, "");
    assert_eq!(ctx.required_object_lists().count(), 0);
}

#[test]
fn test_behavior_call_without_both_slots_emits_nothing() {
    let node = ExprNode::new(
        ExprNodeKind::BehaviorCall {
            name: "Speed".to_string(),
            params: vec![Expression::new("Hero")],
        },
        Span::point(0),
    );
    let (code, _) = compile_nodes(vec![node], Grammar::Number);
    assert_eq!(code, "");
}

#[test]
fn test_bare_value_without_parameter_emits_nothing() {
    let node = ExprNode::new(
        ExprNodeKind::StaticCall {
            name: String::new(),
            params: Vec::new(),
        },
        Span::point(0),
    );
    let (code, _) = compile_nodes(vec![node], Grammar::Text);
    assert_eq!(code, "");
}

#[test]
fn test_unregistered_function_in_hand_built_tree() {
    let registry = MetadataRegistry::with_builtins();
    let scope = scope();
    let mut writer = JsWriter::new();
    let mut ctx = CompilationContext::new();
    let node = ExprNode::new(
        ExprNodeKind::StaticCall {
            name: "Nope".to_string(),
            params: Vec::new(),
        },
        Span::point(0),
    );
    let err = ExprCompiler::new(&registry, &scope, Grammar::Number)
        .compile_parsed(&ParsedExpression { nodes: vec![node] }, &mut writer, &mut ctx)
        .unwrap_err();
    assert_eq!(err, CodegenError::UnknownFunction("Nope".to_string()));
}

// ─────────────────────────────────────────────────────────────────────
// Accumulation & determinism
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_context_accumulates_across_compilations() {
    let registry = MetadataRegistry::with_builtins();
    let scope = scope();
    let mut writer = JsWriter::new();
    let mut ctx = CompilationContext::new();

    compile("Hero.X()", Grammar::Number, &registry, &scope, &mut writer, &mut ctx).unwrap();
    compile("Ghost.Y()", Grammar::Number, &registry, &scope, &mut writer, &mut ctx).unwrap();

    let lists: Vec<&str> = ctx.required_object_lists().collect();
    assert_eq!(lists, ["Ghost", "Hero"]);
}

#[test]
fn test_fragment_splices_into_an_action_template() {
    // A variable-set action compiles its right-hand side independently
    // and splices the fragment into its own statement.
    let rhs = compile_num("2 + 3");
    assert_eq!(rhs, "2+3");
    let statement = format!("runtimeScene.getVariables().get(\"X\").setNumber({rhs});");
    assert_eq!(
        statement,
        "runtimeScene.getVariables().get(\"X\").setNumber(2+3);"
    );
}

#[test]
fn test_output_is_deterministic() {
    let expected = compile_num("clamp(Hero.X(), 0, Enemies.X())");
    for _ in 0..50 {
        assert_eq!(compile_num("clamp(Hero.X(), 0, Enemies.X())"), expected);
    }
}
