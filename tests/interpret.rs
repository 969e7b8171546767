//! Interpreter tests
//!
//! Tests whole block programs: declaration, assignment, calculation and
//! nested conditions, including where a run stops.

use blocklang::ast::{Block, BlockPath, Comparison};
use blocklang::{Environment, ExprError, Failure, Interpreter, RunError, run};
use pretty_assertions::assert_eq;

/// Helper to run a program that must succeed
fn run_ok(program: &[Block]) -> Environment {
    match run(program) {
        Ok(env) => env,
        Err(failure) => panic!("Run failed at block {}: {}", failure.path, failure.error),
    }
}

/// Helper to run a program that must fail
fn run_err(program: &[Block]) -> Failure {
    match run(program) {
        Ok(env) => panic!("Expected failure, got {:?}", env),
        Err(failure) => failure,
    }
}

fn vars(env: &Environment) -> Vec<(&str, i64)> {
    env.iter().collect()
}

// ==================== Declare ====================

#[test]
fn test_declare_initializes_to_zero() {
    let env = run_ok(&[Block::declare(["a", "b"])]);
    assert_eq!(vars(&env), vec![("a", 0), ("b", 0)]);
}

#[test]
fn test_declare_skips_empty_entries() {
    let env = run_ok(&[Block::declare(["x, , y"])]);
    assert_eq!(vars(&env), vec![("x", 0), ("y", 0)]);
}

#[test]
fn test_declare_only_blanks_is_a_no_op() {
    let env = run_ok(&[Block::declare([" , ,"])]);
    assert!(env.is_empty());
}

#[test]
fn test_declare_invalid_identifier() {
    let failure = run_err(&[Block::declare(["ok, 9lives"])]);
    assert_eq!(failure.path, BlockPath::from([0]));
    assert_eq!(
        failure.error,
        RunError::InvalidIdentifier {
            name: "9lives".into()
        }
    );
}

#[test]
fn test_redeclare_resets_to_zero() {
    let env = run_ok(&[
        Block::declare(["a"]),
        Block::assign("a", "5"),
        Block::declare(["a"]),
    ]);
    assert_eq!(env.get("a"), Some(0));
}

// ==================== Assign ====================

#[test]
fn test_assign_literal() {
    let env = run_ok(&[Block::declare(["a"]), Block::assign("a", "-42")]);
    assert_eq!(env.get("a"), Some(-42));
}

#[test]
fn test_assign_blank_target_is_skipped() {
    let env = run_ok(&[Block::declare(["a"]), Block::assign("  ", "not even a number")]);
    assert_eq!(vars(&env), vec![("a", 0)]);
}

#[test]
fn test_assign_undeclared() {
    let failure = run_err(&[Block::assign("a", "1")]);
    assert_eq!(
        failure.error,
        RunError::UndeclaredVariable { name: "a".into() }
    );
}

#[test]
fn test_assign_decimal_is_not_an_integer() {
    let failure = run_err(&[Block::declare(["a"]), Block::assign("a", "3.5")]);
    assert_eq!(failure.path, BlockPath::from([1]));
    assert_eq!(
        failure.error,
        RunError::NotAnInteger {
            literal: "3.5".into()
        }
    );
}

#[test]
fn test_assign_does_not_accept_expressions() {
    let failure = run_err(&[Block::declare(["a"]), Block::assign("a", "1+1")]);
    assert!(matches!(failure.error, RunError::NotAnInteger { .. }));
}

// ==================== Calculate ====================

#[test]
fn test_calculate_uses_current_values() {
    let env = run_ok(&[
        Block::declare(["a, b"]),
        Block::assign("a", "6"),
        Block::calculate("b", "a * 7"),
        Block::calculate("a", "a + b"),
    ]);
    assert_eq!(vars(&env), vec![("a", 48), ("b", 42)]);
}

#[test]
fn test_calculate_reproduces_smallest_integer() {
    let env = run_ok(&[
        Block::declare(["x", "y"]),
        Block::assign("x", "-9223372036854775808"),
        Block::calculate("x", "x"),
        Block::calculate("y", "-9223372036854775808"),
    ]);
    assert_eq!(vars(&env), vec![("x", i64::MIN), ("y", i64::MIN)]);
}

#[test]
fn test_calculate_missing_target() {
    let failure = run_err(&[Block::calculate("", "1 + 1")]);
    assert_eq!(
        failure.error,
        RunError::MissingOperand {
            operand: "target variable"
        }
    );
}

#[test]
fn test_calculate_missing_expression() {
    let failure = run_err(&[Block::declare(["a"]), Block::calculate("a", "   ")]);
    assert_eq!(
        failure.error,
        RunError::MissingOperand {
            operand: "expression"
        }
    );
}

#[test]
fn test_calculate_undeclared_target() {
    let failure = run_err(&[Block::calculate("z", "1")]);
    assert_eq!(
        failure.error,
        RunError::UndeclaredVariable { name: "z".into() }
    );
}

#[test]
fn test_calculate_expression_error_is_attributed_to_block() {
    let failure = run_err(&[
        Block::declare(["a"]),
        Block::calculate("a", "10 / a"),
    ]);
    assert_eq!(failure.path, BlockPath::from([1]));
    assert_eq!(
        failure.error,
        RunError::Expression(ExprError::DivisionByZero)
    );
    assert_eq!(failure.error.kind(), "division_by_zero");
}

#[test]
fn test_calculate_unknown_symbol() {
    let failure = run_err(&[Block::declare(["a"]), Block::calculate("a", "b + 1")]);
    assert_eq!(
        failure.error,
        RunError::Expression(ExprError::UnknownSymbol { name: "b".into() })
    );
}

// ==================== If ====================

fn counter_program(op: Comparison) -> Vec<Block> {
    vec![
        Block::declare(["x"]),
        Block::if_block("1", op, "0", vec![Block::calculate("x", "2+2")]),
    ]
}

#[test]
fn test_if_taken() {
    let env = run_ok(&counter_program(Comparison::Gt));
    assert_eq!(env.get("x"), Some(4));
}

#[test]
fn test_if_not_taken() {
    let env = run_ok(&counter_program(Comparison::Lt));
    assert_eq!(env.get("x"), Some(0));
}

#[test]
fn test_if_compares_expressions() {
    let env = run_ok(&[
        Block::declare(["a, hit"]),
        Block::assign("a", "7"),
        Block::if_block("a % 2", Comparison::Eq, "1", vec![Block::assign("hit", "1")]),
        Block::if_block("a * 2", Comparison::Le, "13", vec![Block::assign("hit", "99")]),
    ]);
    assert_eq!(env.get("hit"), Some(1));
}

#[test]
fn test_nested_if() {
    let env = run_ok(&[
        Block::declare(["depth"]),
        Block::if_block(
            "1",
            Comparison::Ne,
            "2",
            vec![
                Block::calculate("depth", "depth + 1"),
                Block::if_block(
                    "depth",
                    Comparison::Ge,
                    "1",
                    vec![Block::calculate("depth", "depth + 10")],
                ),
            ],
        ),
    ]);
    assert_eq!(env.get("depth"), Some(11));
}

#[test]
fn test_if_missing_operand() {
    let failure = run_err(&[Block::if_block("", Comparison::Eq, "1", vec![])]);
    assert_eq!(failure.path, BlockPath::from([0]));
    assert_eq!(
        failure.error,
        RunError::MissingOperand {
            operand: "left-hand side"
        }
    );
}

#[test]
fn test_if_condition_error_marks_if_block() {
    let failure = run_err(&[Block::if_block("x", Comparison::Eq, "1", vec![])]);
    assert_eq!(failure.path, BlockPath::from([0]));
    assert_eq!(
        failure.error,
        RunError::Expression(ExprError::UnknownSymbol { name: "x".into() })
    );
}

#[test]
fn test_if_with_false_condition_skips_broken_body() {
    let env = run_ok(&[Block::if_block(
        "0",
        Comparison::Gt,
        "1",
        vec![Block::assign("nobody", "1")],
    )]);
    assert!(env.is_empty());
}

// ==================== Halting ====================

#[test]
fn test_nested_failure_names_nested_block() {
    let failure = run_err(&[
        Block::declare(["a"]),
        Block::if_block(
            "1",
            Comparison::Eq,
            "1",
            vec![Block::assign("a", "1"), Block::assign("b", "2")],
        ),
    ]);
    assert_eq!(failure.path, BlockPath::from([1, 1]));
    assert_eq!(failure.path.to_string(), "2.2");
    assert_eq!(
        failure.error,
        RunError::UndeclaredVariable { name: "b".into() }
    );
}

#[test]
fn test_nested_failure_halts_everything() {
    let program = vec![
        Block::declare(["a"]),
        Block::if_block(
            "1",
            Comparison::Eq,
            "1",
            vec![
                Block::calculate("a", "1 / 0"),
                Block::assign("a", "5"),
            ],
        ),
        Block::assign("a", "6"),
    ];

    let mut interpreter = Interpreter::new();
    let failure = interpreter.run(&program).unwrap_err();
    assert_eq!(failure.path, BlockPath::from([1, 0]));
    assert_eq!(
        interpreter.executed(),
        &[
            BlockPath::from([0]),
            BlockPath::from([1]),
            BlockPath::from([1, 0]),
        ]
    );
}

#[test]
fn test_run_in_keeps_changes_before_failure() {
    let mut env = Environment::new();
    let program = vec![
        Block::declare(["a"]),
        Block::assign("a", "3"),
        Block::assign("b", "4"),
        Block::assign("a", "5"),
    ];
    let failure = Interpreter::new().run_in(&program, &mut env).unwrap_err();
    assert_eq!(failure.path, BlockPath::from([2]));
    assert_eq!(env.get("a"), Some(3));
}

#[test]
fn test_empty_program_succeeds() {
    let env = run_ok(&[]);
    assert!(env.is_empty());
}

#[test]
fn test_runs_are_independent() {
    let program = vec![
        Block::declare(["n"]),
        Block::calculate("n", "n + 1"),
    ];
    let mut interpreter = Interpreter::new();
    let first = interpreter.run(&program);
    let second = interpreter.run(&program);
    assert_eq!(first, second);
    assert_eq!(second.unwrap().get("n"), Some(1));
}

#[test]
fn test_declaration_order_is_preserved() {
    let env = run_ok(&[
        Block::declare(["zeta"]),
        Block::declare(["alpha, mid"]),
        Block::declare(["zeta"]),
    ]);
    let names: Vec<&str> = env.iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["zeta", "alpha", "mid"]);
}
