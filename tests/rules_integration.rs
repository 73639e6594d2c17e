//! End-to-end rule behavior over parsed JavaScript.

#![cfg(feature = "tree-sitter")]

use mutcheck::config::ExceptionTemplate;
use mutcheck::parser::parse_source;
use mutcheck::{check_tree, RuleConfig, RuleKind, Violation};

fn check(source: &str) -> Vec<Violation> {
    check_with(source, &RuleConfig::default())
}

fn check_with(source: &str, config: &RuleConfig) -> Vec<Violation> {
    let tree = parse_source(source).unwrap();
    check_tree(&tree, config)
}

fn rules_of(violations: &[Violation]) -> Vec<RuleKind> {
    violations.iter().map(|v| v.rule).collect()
}

#[test]
fn locally_declared_bindings_may_be_mutated() {
    let valid = [
        "let a = 2; a = 3;",
        "let a; a = 1;",
        "let a, b = 0; b += 2;",
        "let {a, b} = {}; if (!a) { a = 1; }",
        "let {a: x} = {p: 1}; x = 1;",
        "const a = []; a[0] = 2;",
        "const [omitted, ...a] = []; a[0] = 2;",
        "const a = new Array(2); a[0] = 2;",
        "const o = structuredClone(x); o[\"name\"] = 2;",
        "const a = {}; a.b.c = 1;",
        "var counters = {}; counters.total = 0;",
    ];
    for source in valid {
        assert!(check(source).is_empty(), "expected no violations: {source}");
    }
}

#[test]
fn foreign_bindings_may_not_be_mutated() {
    let invalid = [
        "a = 2;",
        "a.b = 2;",
        "const a = new Object(x); a[0] = 2;",
        "let a = 1; function bar() { a = 2; }",
        "let a, b; b += 2;",
        "function f(value) { value.x = 1; }",
    ];
    for source in invalid {
        let violations = check(source);
        assert_eq!(
            rules_of(&violations),
            vec![RuleKind::Reassignment],
            "expected one reassignment violation: {source}"
        );
    }
}

#[test]
fn reducer_accumulators_are_exempt() {
    let valid = [
        "const r = xs.reduce((acc, x) => { acc.count = x; return acc; }, {});",
        "const r = xs.reduce((acc, x) => { acc.push(x); return acc; }, []);",
        "_.reduce((acc, x) => { acc.push(x); return acc; }, [], [1, 2, 3]);",
    ];
    for source in valid {
        assert!(check(source).is_empty(), "expected no violations: {source}");
    }

    // Other callbacks get no exemption.
    let violations = check("xs.map((acc) => { acc.count = 1; return acc; });");
    assert_eq!(rules_of(&violations), vec![RuleKind::Reassignment]);

    // Custom reducer names are honored; the defaults then stop applying.
    let config = RuleConfig {
        reducers: vec!["fold".into()],
        ..RuleConfig::default()
    };
    assert!(check_with(
        "xs.fold((acc, x) => { acc.count = x; return acc; }, {});",
        &config
    )
    .is_empty());
    assert_eq!(
        check_with(
            "xs.reduce((acc, x) => { acc.count = x; return acc; }, {});",
            &config
        )
        .len(),
        1
    );
}

#[test]
fn update_operators_are_reported_outside_for_headers() {
    assert_eq!(
        rules_of(&check("i++;")),
        vec![RuleKind::UnsafeUpdateOperator]
    );
    assert_eq!(
        rules_of(&check("for (let i = 0; i < 3; i++) {}")),
        vec![RuleKind::UnsafeUpdateOperator]
    );

    let config = RuleConfig {
        allow_unary_operator_in_for_loops: true,
        ..RuleConfig::default()
    };
    assert!(check_with("for (let i = 0; i < 3; i++) {}", &config).is_empty());
    assert!(check_with("for (let i = 0, j = 0; i < 3; i++, j--) {}", &config).is_empty());

    // The exemption is exact: an increment in the test clause still reports.
    assert_eq!(
        rules_of(&check_with("for (let i = 0; i++ < 3;) {}", &config)),
        vec![RuleKind::UnsafeUpdateOperator]
    );
    // And it never leaks to the loop body.
    assert_eq!(
        rules_of(&check_with("for (let i = 0; i < 3;) { i++; }", &config)),
        vec![RuleKind::UnsafeUpdateOperator]
    );
}

#[test]
fn compound_assignment_in_for_header_is_owned() {
    assert!(check("for (let i = 0; i < 3; i += 1) {}").is_empty());
}

#[test]
fn commonjs_exports_get_their_own_category() {
    for source in [
        "exports.foo = 1;",
        "module.exports = {};",
        "module.exports.bar = 1;",
        "exports.a.b = 1;",
    ] {
        assert_eq!(
            rules_of(&check(source)),
            vec![RuleKind::CommonJsAssignment],
            "expected commonjs category: {source}"
        );
    }

    let config = RuleConfig {
        commonjs: true,
        ..RuleConfig::default()
    };
    assert!(check_with("module.exports = {};", &config).is_empty());
    assert!(check_with("exports.foo = function() {};", &config).is_empty());
}

#[test]
fn prototype_assignment_gets_its_own_category() {
    let source = "function F() {}\nF.prototype.bar = function() {};";
    assert_eq!(rules_of(&check(source)), vec![RuleKind::PrototypeAssignment]);

    let config = RuleConfig {
        prototypes: true,
        ..RuleConfig::default()
    };
    assert!(check_with(source, &config).is_empty());
}

#[test]
fn function_props_option_permits_static_members() {
    let source = "function foo() {}\nfoo.bar = 1;";
    assert_eq!(rules_of(&check(source)), vec![RuleKind::Reassignment]);

    let config = RuleConfig {
        function_props: true,
        ..RuleConfig::default()
    };
    assert!(check_with(source, &config).is_empty());
}

#[test]
fn exception_templates_and_this_targets() {
    let config = RuleConfig {
        exceptions: vec![ExceptionTemplate {
            object: None,
            property: Some("propTypes".into()),
        }],
        ..RuleConfig::default()
    };
    assert!(check_with("Foo.propTypes = {};", &config).is_empty());
    assert_eq!(check_with("Foo.other = {};", &config).len(), 1);

    assert_eq!(rules_of(&check("this.x = 1;")), vec![RuleKind::Reassignment]);
    let config = RuleConfig {
        allow_this: true,
        ..RuleConfig::default()
    };
    assert!(check_with("this.x = 1;", &config).is_empty());
}

#[test]
fn mutating_methods_need_an_owned_receiver() {
    assert_eq!(
        rules_of(&check("value.push(1);")),
        vec![RuleKind::MutatingMethod]
    );
    assert_eq!(
        rules_of(&check("value[\"push\"](1);")),
        vec![RuleKind::MutatingMethod]
    );
    assert!(check("const a = []; a.push(1);").is_empty());
    assert!(check("value.concat([1]);").is_empty());
    assert!(check("const myObject = {a: 1}; Object.keys(myObject).sort(mySortFn);").is_empty());

    let config = RuleConfig {
        allowed_objects: vec!["_".into()],
        ..RuleConfig::default()
    };
    assert_eq!(
        rules_of(&check("_.sort(xs);")),
        vec![RuleKind::MutatingMethod]
    );
    assert!(check_with("_.sort(xs);", &config).is_empty());
}

#[test]
fn mutating_functions_need_an_owned_first_argument() {
    assert_eq!(
        rules_of(&check("Object.assign(a, b);")),
        vec![RuleKind::MutatingFunction]
    );
    assert_eq!(
        rules_of(&check("_.merge(a, b);")),
        vec![RuleKind::MutatingFunction]
    );
    assert!(check("Object.assign({}, b);").is_empty());
    assert!(check("const a = {}; Object.assign(a, b);").is_empty());

    let config = RuleConfig {
        use_lodash_function_imports: true,
        ..RuleConfig::default()
    };
    assert!(check("merge(a, b);").is_empty());
    assert_eq!(
        rules_of(&check_with("merge(a, b);", &config)),
        vec![RuleKind::MutatingFunction]
    );

    let config = RuleConfig {
        ignored_functions: vec!["assign".into()],
        ..RuleConfig::default()
    };
    assert!(check_with("Object.assign(a, b);", &config).is_empty());
}

#[test]
fn violations_carry_source_lines_in_order() {
    let source = "let ok = 1;\na = 2;\n\nvalue.push(3);\n";
    let violations = check(source);
    assert_eq!(violations.len(), 2);
    assert_eq!(violations[0].rule, RuleKind::Reassignment);
    assert_eq!(violations[0].line, 2);
    assert_eq!(violations[1].rule, RuleKind::MutatingMethod);
    assert_eq!(violations[1].line, 4);
}
