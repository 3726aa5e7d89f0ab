mod common;

use diagnostics::Located;
use memory::Value;
use proptest::prelude::*;
use vm::{Instruction, OpCode, RuntimeError, VM};

fn number(source: &str) -> f64 {
    let value = common::eval(source);
    value
        .as_number()
        .unwrap_or_else(|| panic!("expected number from {source}, got {value:?}"))
}

fn boolean(source: &str) -> bool {
    let value = common::eval(source);
    value
        .as_bool()
        .unwrap_or_else(|| panic!("expected bool from {source}, got {value:?}"))
}

fn fails(source: &str) -> RuntimeError {
    let lowered = common::lower(source);
    let mut vm = VM::new();
    let main = common::load(&mut vm, &lowered);
    vm.run(main).unwrap_err()
}

#[test]
fn test_execution_end_to_end() {
    assert_eq!(number("1 + 2 * 3"), 7.0);
}

#[test]
fn test_precedence_and_grouping() {
    assert_eq!(number("10 - 4 - 3"), 3.0);
    assert_eq!(number("(1 + 2) * 3"), 9.0);
    assert_eq!(number("-2 * 3"), -6.0);
    assert_eq!(number("7 / 2"), 3.5);
    assert_eq!(number("1_000 + 0.5"), 1000.5);
}

#[test]
fn test_comparisons() {
    assert!(boolean("1 + 1 == 2"));
    assert!(!boolean("3 != 3"));
    assert!(!boolean("2 >= 3"));
    assert!(boolean("2 <= 2"));
    assert!(boolean("1 < 2 && 2 > 1"));
}

#[test]
fn test_logic_on_booleans() {
    let value = common::eval("true && false");
    assert!(value.is_bool());
    assert_eq!(value.payload, 0);

    assert!(boolean("nil || 0"));
    assert!(boolean("!nil"));
    assert!(!boolean("!0"));
}

#[test]
fn test_equality_needs_same_kind() {
    assert!(!boolean("0 == false"));
    assert!(boolean("nil == nil"));
    assert!(boolean("'a' == \"a\""));
    assert!(!boolean("'a' == 'b'"));
}

#[test]
fn test_divide_by_zero_stops_execution() {
    let mut lowered = common::lower("3 / 0");
    // Write a marker after the division; it must never run.
    let halt = lowered.code.len() - 1;
    lowered
        .code
        .insert(halt, Instruction::new(OpCode::Mov, 99, 0, 0));

    let mut vm = VM::new();
    let main = common::load(&mut vm, &lowered);
    let err = vm.run(main).unwrap_err();

    assert_eq!(err, RuntimeError::DivideByZero { row: 1, col: 3 });
    assert_eq!(
        err.to_diagnostic().render("calc.vv"),
        "[calc.vv 1:3] Attempt to divide with 0"
    );
    assert!(vm.memory.get(99).is_nil());
    assert!(vm.memory.get(lowered.result).is_nil());
}

#[test]
fn test_arithmetic_on_non_numbers() {
    assert_eq!(
        fails("1 + true"),
        RuntimeError::NonNumericOperand { row: 1, col: 3 }
    );
    assert!(matches!(
        fails("-nil"),
        RuntimeError::NonNumericOperand { .. }
    ));
    assert_eq!(
        fails("'a' < 1").to_string(),
        "Attempt to perform arithmetic on non-numbers"
    );
}

#[test]
fn test_call_and_leave_preserve_order() {
    let mut vm = VM::new();
    vm.memory.set(3, Value::number(10.0)).unwrap();
    vm.memory.set(4, Value::number(4.0)).unwrap();

    // Callee: a - b, where a was pushed first.
    let sub = vm.add_function(vec![
        Instruction::new(OpCode::Pop, 2, 0, 0),
        Instruction::new(OpCode::Pop, 1, 0, 0),
        Instruction::new(OpCode::Sub, 0, 1, 2),
        Instruction::new(OpCode::Push, 0, 0, 0),
        Instruction::new(OpCode::Leav, 1, 0, 0),
    ]);
    let main = vm.add_function(vec![
        Instruction::new(OpCode::Push, 3, 0, 0),
        Instruction::new(OpCode::Push, 4, 0, 0),
        Instruction::new(OpCode::Call, sub, 2, 0),
        Instruction::new(OpCode::Pop, 5, 0, 0),
        Instruction::halt(),
    ]);

    vm.run(main).unwrap();
    assert_eq!(vm.memory.get(5).as_number(), Some(6.0));
    assert_eq!(vm.frames.depth(), 1);
    assert!(vm.frames.current().stack.is_empty());
    assert_eq!(vm.pc.function, main);
    assert_eq!(vm.pc.address, 4);
}

#[test]
fn test_nested_calls_return_to_their_callers() {
    let mut vm = VM::new();
    vm.memory.set(1, Value::number(1.0)).unwrap();

    // inner: push mem[1] and return it.
    let inner = vm.add_function(vec![
        Instruction::new(OpCode::Push, 1, 0, 0),
        Instruction::new(OpCode::Leav, 1, 0, 0),
    ]);
    // outer: call inner, double the result, return it.
    let outer = vm.add_function(vec![
        Instruction::new(OpCode::Call, inner, 0, 0),
        Instruction::new(OpCode::Pop, 2, 0, 0),
        Instruction::new(OpCode::Add, 2, 2, 2),
        Instruction::new(OpCode::Push, 2, 0, 0),
        Instruction::new(OpCode::Leav, 1, 0, 0),
    ]);
    let main = vm.add_function(vec![
        Instruction::new(OpCode::Call, outer, 0, 0),
        Instruction::new(OpCode::Pop, 0, 0, 0),
        Instruction::halt(),
    ]);

    vm.run(main).unwrap();
    assert_eq!(vm.memory.get(0).as_number(), Some(2.0));
    assert_eq!(vm.frames.depth(), 1);
}

#[test]
fn test_leave_in_entry_frame_halts() {
    let mut vm = VM::new();
    vm.memory.set(1, Value::bool(true)).unwrap();
    let main = vm.add_function(vec![
        Instruction::new(OpCode::Leav, 0, 0, 0),
        Instruction::new(OpCode::Mov, 0, 1, 0),
        Instruction::halt(),
    ]);
    vm.run(main).unwrap();
    assert!(vm.memory.get(0).is_nil());
}

#[test]
fn test_countdown_loop() {
    let mut vm = VM::new();
    vm.memory.set(0, Value::number(3.0)).unwrap();
    vm.memory.set(1, Value::number(1.0)).unwrap();
    vm.memory.set(2, Value::number(0.0)).unwrap();
    vm.memory.set(3, Value::number(0.0)).unwrap();

    let main = vm.add_function(vec![
        Instruction::new(OpCode::Gt, 4, 0, 2),
        Instruction::new(OpCode::Jmpf, 5, 4, 0),
        Instruction::new(OpCode::Sub, 0, 0, 1),
        Instruction::new(OpCode::Add, 3, 3, 1),
        Instruction::new(OpCode::Jmp, 0, 0, 0),
        Instruction::halt(),
    ]);

    vm.run(main).unwrap();
    assert_eq!(vm.memory.get(0).as_number(), Some(0.0));
    assert_eq!(vm.memory.get(3).as_number(), Some(3.0));
}

#[test]
fn test_jmpt_skips_when_truthy() {
    let mut vm = VM::new();
    vm.memory.set(1, Value::string(0)).unwrap();
    vm.memory.set(2, Value::number(5.0)).unwrap();
    let main = vm.add_function(vec![
        Instruction::new(OpCode::Jmpt, 2, 1, 0),
        Instruction::new(OpCode::Mov, 0, 2, 0),
        Instruction::halt(),
    ]);
    vm.run(main).unwrap();
    assert!(vm.memory.get(0).is_nil());
}

#[test]
fn test_call_errors() {
    let mut vm = VM::new();
    let main = vm.add_function(vec![
        Instruction::new(OpCode::Call, 7, 0, 0),
        Instruction::halt(),
    ]);
    assert_eq!(vm.run(main), Err(RuntimeError::FunctionNotFound(7)));

    let mut vm = VM::new();
    let callee = vm.add_function(vec![Instruction::new(OpCode::Leav, 0, 0, 0)]);
    let main = vm.add_function(vec![
        Instruction::new(OpCode::Call, callee, 1, 0).at(2, 5),
        Instruction::halt(),
    ]);
    assert_eq!(
        vm.run(main),
        Err(RuntimeError::StackUnderflow { row: 2, col: 5 })
    );
    assert_eq!(vm.frames.depth(), 1);
}

#[test]
fn test_leave_underflow_keeps_callee_frame() {
    let mut vm = VM::new();
    vm.memory.set(0, Value::number(1.0)).unwrap();
    let callee = vm.add_function(vec![
        Instruction::new(OpCode::Push, 0, 0, 0),
        Instruction::new(OpCode::Leav, 2, 0, 0).at(7, 3),
    ]);
    let main = vm.add_function(vec![
        Instruction::new(OpCode::Call, callee, 0, 0),
        Instruction::halt(),
    ]);

    assert_eq!(
        vm.run(main),
        Err(RuntimeError::StackUnderflow { row: 7, col: 3 })
    );
    assert_eq!(vm.frames.depth(), 2);
    let frame = vm.frames.current();
    assert_eq!(frame.to.function, callee);
    assert_eq!(frame.stack, vec![Value::number(1.0)]);
    assert_eq!(vm.pc.function, callee);
    assert_eq!(vm.pc.address, 1);
}

#[test]
fn test_missing_entry_function() {
    let mut vm = VM::new();
    let err = vm.run(3).unwrap_err();
    assert_eq!(err, RuntimeError::FunctionNotFound(3));
    assert_eq!(err.location(), diagnostics::Location::Compiler);
}

proptest! {
    #[test]
    fn mixed_arithmetic_matches_f64(a in 0u16..1000, b in 0u16..1000, c in 0u16..1000) {
        let source = format!("{a} + {b} * {c} - {a}");
        let expected = a as f64 + b as f64 * c as f64 - a as f64;
        prop_assert_eq!(number(&source), expected);
    }
}
