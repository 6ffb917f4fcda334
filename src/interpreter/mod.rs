//! The tree-walking evaluator.
//!
//! [`Interpreter`] bundles every piece of run state: parser, variable
//! environment, function registry, control-flow signal flags and
//! diagnostics, so independent runs are fully isolated from each other.
//! Top-level statements are parsed and evaluated one at a time; an
//! evaluation error yields `Int(0)` and execution continues until the
//! error budget is exhausted.

mod builtins;
mod environment;
mod http;
mod value;

pub use self::environment::*;
pub use self::value::*;

use std::io::BufRead;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, error};

use crate::ast::{
    ArrayAccess, ArrayAssignment, BinaryExpr, BinaryOp, Block, Call, Expression, FnDef, ForLoop,
    HttpRequest, Ident, If, Input, Statement, UnaryOp, WhileLoop,
};
use crate::diagnostics::Diagnostics;
use crate::lexer::Position;
use crate::limits::{MAX_ARRAY_SIZE, MAX_CALL_DEPTH, MAX_ERRORS, MAX_FUNCS};
use crate::parser::Parser;

/// A registered user-defined function. Registration happens when the `fn`
/// statement is evaluated, so calls ahead of the definition in execution
/// order do not resolve.
#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub params: Vec<String>,
    pub body: Block,
}

pub struct Interpreter {
    parser: Parser,
    diagnostics: Diagnostics,
    env: Environment,
    functions: Vec<Function>,
    breaking: bool,
    continuing: bool,
    returning: bool,
    return_value: Value,
}

impl Interpreter {
    pub fn new(source: &str) -> Self {
        let mut diagnostics = Diagnostics::new();
        let parser = Parser::new(source, &mut diagnostics);

        Self {
            parser,
            diagnostics,
            env: Environment::new(),
            functions: vec![],
            breaking: false,
            continuing: false,
            returning: false,
            return_value: Value::Int(0),
        }
    }

    /// Parse and evaluate the program one top-level statement at a time.
    /// Returns the number of errors reported over the whole run.
    pub fn run(&mut self) -> usize {
        while !self.parser.at_eof() {
            if let Some(statement) = self.parser.parse_statement(&mut self.diagnostics) {
                self.eval_statement(&statement);
            }

            if self.diagnostics.error_count() > MAX_ERRORS {
                error!("Too many errors, stopping execution.");
                break;
            }
        }
        self.diagnostics.error_count()
    }

    fn eval_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::FnDef(def) => self.register_function(def),
            Statement::Return(value) => {
                self.return_value = self.eval_expression(value);
                self.returning = true;
            }
            Statement::Break => self.breaking = true,
            Statement::Continue => self.continuing = true,
            Statement::Out(value) => {
                let value = self.eval_expression(value);
                println!("{value}");
            }
            Statement::In(input) => self.eval_input(input),
            Statement::If(if_statement) => self.eval_if(if_statement),
            Statement::For(for_loop) => self.eval_for(for_loop),
            Statement::While(while_loop) => self.eval_while(while_loop),
            Statement::Http(request) => self.eval_http(request),
            Statement::Assignment(assignment) => {
                let value = self.eval_expression(&assignment.value);
                self.env.set(&assignment.ident.value, value);
            }
            Statement::ArrayAssignment(assignment) => self.eval_array_assignment(assignment),
            Statement::Increment(ident) => self.step_variable(ident, 1),
            Statement::Decrement(ident) => self.step_variable(ident, -1),
            Statement::Call(call) => {
                self.eval_call(call);
            }
        }
    }

    fn register_function(&mut self, def: &FnDef) {
        if self.functions.len() >= MAX_FUNCS {
            self.diagnostics
                .report(def.ident.position, "Too many function definitions");
            return;
        }

        debug!("registering function '{}'", def.ident.value);
        self.functions.push(Function {
            name: def.ident.value.clone(),
            params: def.params.clone(),
            body: def.body.clone(),
        });
    }

    /// Evaluate statements until the end of the block or an active signal.
    /// Signals pass through unchanged; loops and calls consume them.
    fn eval_block(&mut self, block: &Block) {
        for statement in &block.statements {
            if self.breaking || self.continuing || self.returning {
                break;
            }
            self.eval_statement(statement);
        }
    }

    fn eval_if(&mut self, if_statement: &If) {
        if self.eval_expression(&if_statement.condition).truthy() {
            self.eval_block(&if_statement.then_block);
        } else if let Some(else_block) = &if_statement.else_block {
            self.eval_block(else_block);
        }
    }

    fn eval_for(&mut self, for_loop: &ForLoop) {
        if let Some(init) = &for_loop.init {
            self.eval_statement(init);
        }

        loop {
            if !self.eval_expression(&for_loop.condition).truthy() {
                break;
            }

            self.continuing = false;
            self.eval_block(&for_loop.body);

            if self.breaking {
                self.breaking = false;
                break;
            }
            if self.returning {
                break;
            }

            if let Some(step) = &for_loop.step {
                self.eval_statement(step);
            }
        }

        self.continuing = false;
    }

    fn eval_while(&mut self, while_loop: &WhileLoop) {
        loop {
            if !self.eval_expression(&while_loop.condition).truthy() {
                break;
            }

            self.continuing = false;
            self.eval_block(&while_loop.body);

            if self.breaking {
                self.breaking = false;
                break;
            }
            if self.returning {
                break;
            }
        }

        self.continuing = false;
    }

    fn eval_http(&mut self, request: &HttpRequest) {
        let method = self.eval_expression(&request.method);
        let url = self.eval_expression(&request.url);

        let (Value::Str(method), Value::Str(url)) = (&method, &url) else {
            self.diagnostics
                .report(request.position, "http() requires string arguments");
            return;
        };

        // The body expression is evaluated either way; it is only attached
        // when it yields a string.
        let body = request
            .body
            .as_ref()
            .map(|expression| self.eval_expression(expression));
        let body_text = match &body {
            Some(Value::Str(text)) => Some(text.as_str()),
            _ => None,
        };

        http::request(method, url, body_text, request.position, &mut self.diagnostics);
    }

    fn eval_input(&mut self, input: &Input) {
        match input {
            Input::Variable(ident) => {
                // On EOF the variable stays unbound.
                if let Some(value) = read_line_value() {
                    self.env.set(&ident.value, value);
                }
            }
            Input::Element { ident, index } => {
                let Some(slot) = self.array_slot(ident, index, ident.position) else {
                    return;
                };
                let value = read_line_value().unwrap_or(Value::Int(0));
                self.store_element(ident, slot, value);
            }
        }
    }

    fn eval_array_assignment(&mut self, assignment: &ArrayAssignment) {
        let Some(slot) =
            self.array_slot(&assignment.ident, &assignment.index, assignment.position)
        else {
            return;
        };
        let value = self.eval_expression(&assignment.value);
        self.store_element(&assignment.ident, slot, value);
    }

    /// Check that the target holds an array, then evaluate and bounds-check
    /// the index. `None` makes the surrounding store a no-op; the value
    /// expression of a failed store is never evaluated.
    fn array_slot(
        &mut self,
        ident: &Ident,
        index: &Expression,
        position: Position,
    ) -> Option<usize> {
        match self.env.get(&ident.value) {
            Some(Value::Array(_)) => {}
            _ => {
                self.diagnostics.report(position, "Variable is not an array");
                return None;
            }
        }

        let index = self.eval_expression(index).to_int();
        let len = match self.env.get(&ident.value) {
            Some(Value::Array(elements)) => elements.len(),
            _ => return None,
        };

        if index < 0 || index as usize >= len {
            self.diagnostics.report(position, "Array index out of bounds");
            return None;
        }
        Some(index as usize)
    }

    fn store_element(&mut self, ident: &Ident, slot: usize, value: Value) {
        if let Some(Value::Array(elements)) = self.env.get_mut(&ident.value) {
            if slot < elements.len() {
                elements[slot] = value;
            }
        }
    }

    fn step_variable(&mut self, ident: &Ident, delta: i32) {
        let Some(current) = self.env.get(&ident.value) else {
            self.diagnostics.report(ident.position, "Undefined variable");
            return;
        };

        let next = match current {
            Value::Float(value) => Value::Float(value + f64::from(delta)),
            other => Value::Int(other.to_int().wrapping_add(delta)),
        };
        self.env.set(&ident.value, next);
    }

    fn eval_expression(&mut self, expression: &Expression) -> Value {
        match expression {
            Expression::IntLiteral(value) => Value::Int(*value),
            Expression::FloatLiteral(value) => Value::Float(*value),
            Expression::StringLiteral(text) => Value::Str(text.clone()),
            Expression::Variable(ident) => match self.env.get(&ident.value) {
                Some(value) => value.clone(),
                None => {
                    self.diagnostics.report(
                        ident.position,
                        format!("Undefined variable: {}", ident.value),
                    );
                    Value::Int(0)
                }
            },
            Expression::ArrayAccess(access) => self.eval_array_access(access),
            Expression::ArrayLiteral(elements) => {
                let elements = elements
                    .iter()
                    .map(|element| self.eval_expression(element))
                    .collect();
                Value::Array(elements)
            }
            Expression::ArrayAlloc(alloc) => {
                let size = self.eval_expression(&alloc.size).to_int();
                if size < 0 || size as usize > MAX_ARRAY_SIZE {
                    self.diagnostics.report(alloc.position, "Invalid array size");
                    return Value::Int(0);
                }
                Value::Array(vec![Value::Int(0); size as usize])
            }
            Expression::Binary(binary) => self.eval_binary(binary),
            Expression::Unary(unary) => {
                let operand = self.eval_expression(&unary.operand);
                match unary.op {
                    UnaryOp::Neg => match operand {
                        Value::Float(value) => Value::Float(-value),
                        other => Value::Int(other.to_int().wrapping_neg()),
                    },
                    UnaryOp::Not => Value::Int(i32::from(!operand.truthy())),
                }
            }
            Expression::Call(call) => self.eval_call(call),
            Expression::Time => {
                let now = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|elapsed| elapsed.as_secs())
                    .unwrap_or(0);
                Value::Int(now as i32)
            }
        }
    }

    fn eval_array_access(&mut self, access: &ArrayAccess) -> Value {
        match self.env.get(&access.ident.value) {
            None => {
                self.diagnostics
                    .report(access.position, "Undefined array variable");
                return Value::Int(0);
            }
            Some(Value::Array(_)) => {}
            Some(_) => {
                self.diagnostics
                    .report(access.position, "Variable is not an array");
                return Value::Int(0);
            }
        }

        let index = self.eval_expression(&access.index).to_int();
        let Some(Value::Array(elements)) = self.env.get(&access.ident.value) else {
            return Value::Int(0);
        };

        if index < 0 || index as usize >= elements.len() {
            self.diagnostics
                .report(access.position, "Array index out of bounds");
            return Value::Int(0);
        }
        elements[index as usize].clone()
    }

    fn eval_binary(&mut self, binary: &BinaryExpr) -> Value {
        let lhs = self.eval_expression(&binary.lhs);
        let rhs = self.eval_expression(&binary.rhs);

        match binary.op {
            BinaryOp::Add => {
                if matches!(lhs, Value::Str(_)) || matches!(rhs, Value::Str(_)) {
                    let mut text = concat_operand(&lhs);
                    text.push_str(&concat_operand(&rhs));
                    return Value::string(text);
                }
                if float_wide(&lhs, &rhs) {
                    Value::Float(lhs.to_float() + rhs.to_float())
                } else {
                    Value::Int(lhs.to_int().wrapping_add(rhs.to_int()))
                }
            }
            BinaryOp::Sub => {
                if float_wide(&lhs, &rhs) {
                    Value::Float(lhs.to_float() - rhs.to_float())
                } else {
                    Value::Int(lhs.to_int().wrapping_sub(rhs.to_int()))
                }
            }
            BinaryOp::Mul => {
                if float_wide(&lhs, &rhs) {
                    Value::Float(lhs.to_float() * rhs.to_float())
                } else {
                    Value::Int(lhs.to_int().wrapping_mul(rhs.to_int()))
                }
            }
            BinaryOp::Div => {
                if rhs.to_float() == 0.0 {
                    self.diagnostics.report(binary.position, "Division by zero");
                    return Value::Int(0);
                }
                if float_wide(&lhs, &rhs) {
                    Value::Float(lhs.to_float() / rhs.to_float())
                } else {
                    let divisor = rhs.to_int();
                    if divisor == 0 {
                        self.diagnostics.report(binary.position, "Division by zero");
                        return Value::Int(0);
                    }
                    Value::Int(lhs.to_int().wrapping_div(divisor))
                }
            }
            BinaryOp::Mod => {
                let divisor = rhs.to_int();
                if divisor == 0 {
                    self.diagnostics.report(binary.position, "Modulo by zero");
                    return Value::Int(0);
                }
                Value::Int(lhs.to_int().wrapping_rem(divisor))
            }
            BinaryOp::Eq => Value::Int(i32::from(lhs.to_float() == rhs.to_float())),
            BinaryOp::NotEq => Value::Int(i32::from(lhs.to_float() != rhs.to_float())),
            BinaryOp::Lt => Value::Int(i32::from(lhs.to_float() < rhs.to_float())),
            BinaryOp::Gt => Value::Int(i32::from(lhs.to_float() > rhs.to_float())),
            BinaryOp::Le => Value::Int(i32::from(lhs.to_float() <= rhs.to_float())),
            BinaryOp::Ge => Value::Int(i32::from(lhs.to_float() >= rhs.to_float())),
            // Both operands are always evaluated: no short-circuiting.
            BinaryOp::And => Value::Int(i32::from(lhs.truthy() && rhs.truthy())),
            BinaryOp::Or => Value::Int(i32::from(lhs.truthy() || rhs.truthy())),
        }
    }

    fn eval_call(&mut self, call: &Call) -> Value {
        // Arguments are evaluated in the caller's environment, before any
        // frame exists for the callee.
        let args: Vec<Value> = call
            .args
            .iter()
            .map(|arg| self.eval_expression(arg))
            .collect();

        if let Some(builtin) = builtins::lookup(&call.ident.value) {
            return builtin(&args, call.position, &mut self.diagnostics);
        }

        let Some(function) = self
            .functions
            .iter()
            .find(|function| function.name == call.ident.value)
            .cloned()
        else {
            self.diagnostics.report(
                call.position,
                format!("Undefined function: {}", call.ident.value),
            );
            return Value::Int(0);
        };

        if args.len() != function.params.len() {
            self.diagnostics
                .report(call.position, "Argument count mismatch");
            return Value::Int(0);
        }

        if self.env.depth() >= MAX_CALL_DEPTH {
            self.diagnostics.report(call.position, "Stack overflow");
            return Value::Int(0);
        }

        debug!(
            "calling '{}' at depth {}",
            function.name,
            self.env.depth()
        );

        self.env.push_frame();
        for (param, value) in function.params.iter().zip(args) {
            self.env.set(param, value);
        }

        self.returning = false;
        self.eval_block(&function.body);

        let result = self.return_value.clone();
        self.returning = false;
        self.env.pop_frame();

        result
    }
}

fn float_wide(lhs: &Value, rhs: &Value) -> bool {
    matches!(lhs, Value::Float(_)) || matches!(rhs, Value::Float(_))
}

/// How a non-string operand of `+` joins a concatenation: ints print in
/// decimal, floats in `%g` form, arrays coerce to "0".
fn concat_operand(value: &Value) -> String {
    match value {
        Value::Int(value) => value.to_string(),
        Value::Float(value) => format_g(*value),
        Value::Str(text) => text.clone(),
        Value::Array(_) => "0".to_string(),
    }
}

fn read_line_value() -> Option<Value> {
    let mut line = String::new();
    match std::io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => {
            let text = line.trim_end_matches('\n').trim_end_matches('\r');
            Some(coerce_input(text))
        }
    }
}

/// Input coercion: full-string integer parse, then full-string float
/// parse, then the raw string. An empty line coerces to 0.
fn coerce_input(text: &str) -> Value {
    if text.is_empty() {
        return Value::Int(0);
    }
    if let Ok(value) = text.parse::<i64>() {
        return Value::Int(value as i32);
    }
    if let Ok(value) = text.parse::<f64>() {
        return Value::Float(value);
    }
    Value::string(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_program(source: &str) -> Interpreter {
        let mut interpreter = Interpreter::new(source);
        interpreter.run();
        interpreter
    }

    fn global(interpreter: &Interpreter, name: &str) -> Value {
        interpreter
            .env
            .get(name)
            .cloned()
            .expect("variable is bound")
    }

    #[test]
    fn test_arithmetic_precedence() {
        let interpreter = run_program("x = 1 + 2 * 3;");
        assert_eq!(Value::Int(7), global(&interpreter, "x"));
        assert_eq!(0, interpreter.diagnostics.error_count());
    }

    #[test]
    fn test_float_promotion() {
        let interpreter = run_program("x = 1 + 2.5; y = 7.0 / 2;");
        assert_eq!(Value::Float(3.5), global(&interpreter, "x"));
        assert_eq!(Value::Float(3.5), global(&interpreter, "y"));
    }

    #[test]
    fn test_int_division_truncates() {
        let interpreter = run_program("x = 7 / 2; y = 7 % 3;");
        assert_eq!(Value::Int(3), global(&interpreter, "x"));
        assert_eq!(Value::Int(1), global(&interpreter, "y"));
    }

    #[test]
    fn test_division_by_zero_yields_zero() {
        let interpreter = run_program("x = 1 / 0; y = 5 % 0;");
        assert_eq!(Value::Int(0), global(&interpreter, "x"));
        assert_eq!(Value::Int(0), global(&interpreter, "y"));
        assert_eq!(2, interpreter.diagnostics.error_count());
    }

    #[test]
    fn test_string_concatenation() {
        let interpreter = run_program(r#"x = "n=" + 42; y = "v=" + 2.5; z = 1 + "!";"#);
        assert_eq!(Value::string("n=42"), global(&interpreter, "x"));
        assert_eq!(Value::string("v=2.5"), global(&interpreter, "y"));
        assert_eq!(Value::string("1!"), global(&interpreter, "z"));
    }

    #[test]
    fn test_comparison_coerces_to_float() {
        let interpreter = run_program(r#"x = "5" == 5; y = 2 < 1.5;"#);
        assert_eq!(Value::Int(1), global(&interpreter, "x"));
        assert_eq!(Value::Int(0), global(&interpreter, "y"));
    }

    #[test]
    fn test_unary_operators() {
        let interpreter = run_program(r#"a = !0; b = !3; c = -"3"; d = -2.5;"#);
        assert_eq!(Value::Int(1), global(&interpreter, "a"));
        assert_eq!(Value::Int(0), global(&interpreter, "b"));
        assert_eq!(Value::Int(-3), global(&interpreter, "c"));
        assert_eq!(Value::Float(-2.5), global(&interpreter, "d"));
    }

    #[test]
    fn test_function_writes_stay_in_frame() {
        let interpreter = run_program("x = 1; fn g(){ x = 99; rn 0; }; g();");
        assert_eq!(Value::Int(1), global(&interpreter, "x"));
        assert_eq!(0, interpreter.diagnostics.error_count());
    }

    #[test]
    fn test_parameter_shadows_caller_binding() {
        let interpreter = run_program("n = 5; fn f(n){ rn n * 2; }; x = f(3);");
        assert_eq!(Value::Int(6), global(&interpreter, "x"));
        assert_eq!(Value::Int(5), global(&interpreter, "n"));
    }

    #[test]
    fn test_array_survives_frame_destruction() {
        let source = "fn f(n){ if (n == 0) { rn [1, 2, 3]; } : { }; rn f(n - 1); }; x = f(3);";
        let interpreter = run_program(source);
        assert_eq!(
            Value::Array(vec![Value::Int(1), Value::Int(2), Value::Int(3)]),
            global(&interpreter, "x")
        );
        assert_eq!(0, interpreter.diagnostics.error_count());
    }

    #[test]
    fn test_recursion() {
        let source = "fn fib(n){ if (n < 2) { rn n; } : { }; rn fib(n - 1) + fib(n - 2); }; x = fib(10);";
        let interpreter = run_program(source);
        assert_eq!(Value::Int(55), global(&interpreter, "x"));
    }

    #[test]
    fn test_break_exits_one_loop_level() {
        let source = "c = 0; for (i = 0; i < 3; i++) { for (j = 0; j < 10; j++) { if (j == 2) { break; } : { }; c = c + 1; }; };";
        let interpreter = run_program(source);
        assert_eq!(Value::Int(6), global(&interpreter, "c"));
    }

    #[test]
    fn test_continue_still_runs_increment() {
        let source = "c = 0; for (i = 0; i < 5; i++) { if (i == 2) { continue; } : { }; c = c + 1; };";
        let interpreter = run_program(source);
        assert_eq!(Value::Int(4), global(&interpreter, "c"));
        assert_eq!(Value::Int(5), global(&interpreter, "i"));
    }

    #[test]
    fn test_while_loop() {
        let source = "sum = 0; n = 5; while (n > 0) { sum = sum + n; n--; };";
        let interpreter = run_program(source);
        assert_eq!(Value::Int(15), global(&interpreter, "sum"));
    }

    #[test]
    fn test_logical_operators_evaluate_both_sides() {
        let interpreter = run_program("x = 0 && missing();");
        assert_eq!(Value::Int(0), global(&interpreter, "x"));
        // `missing()` was evaluated even though the left side is false.
        assert_eq!(1, interpreter.diagnostics.error_count());
    }

    #[test]
    fn test_undefined_variable_yields_zero() {
        let interpreter = run_program("x = y + 1;");
        assert_eq!(Value::Int(1), global(&interpreter, "x"));
        assert_eq!(1, interpreter.diagnostics.error_count());
    }

    #[test]
    fn test_arity_mismatch_yields_zero() {
        let interpreter = run_program("fn f(a){ rn a; }; x = f(1, 2);");
        assert_eq!(Value::Int(0), global(&interpreter, "x"));
        assert_eq!(1, interpreter.diagnostics.error_count());
    }

    #[test]
    fn test_call_before_definition_is_undefined() {
        let interpreter = run_program("x = f(); fn f(){ rn 1; }; y = f();");
        assert_eq!(Value::Int(0), global(&interpreter, "x"));
        assert_eq!(Value::Int(1), global(&interpreter, "y"));
        assert_eq!(1, interpreter.diagnostics.error_count());
    }

    #[test]
    fn test_stack_overflow_is_reported() {
        let interpreter = run_program("fn f(){ rn f(); }; x = f();");
        assert_eq!(Value::Int(0), global(&interpreter, "x"));
        assert_eq!(1, interpreter.diagnostics.error_count());
    }

    #[test]
    fn test_function_without_return_yields_previous_return_value() {
        let interpreter = run_program("fn f(){ rn 7; }; fn g(){ a = 1; }; x = f(); y = g();");
        assert_eq!(Value::Int(7), global(&interpreter, "x"));
        assert_eq!(Value::Int(7), global(&interpreter, "y"));
    }

    #[test]
    fn test_array_element_assignment() {
        let interpreter = run_program("a = array(3); a[1] = 42;");
        assert_eq!(
            Value::Array(vec![Value::Int(0), Value::Int(42), Value::Int(0)]),
            global(&interpreter, "a")
        );
    }

    #[test]
    fn test_out_of_bounds_store_is_a_noop() {
        let interpreter = run_program("a = [1, 2]; a[5] = 9; x = a[-1];");
        assert_eq!(
            Value::Array(vec![Value::Int(1), Value::Int(2)]),
            global(&interpreter, "a")
        );
        assert_eq!(Value::Int(0), global(&interpreter, "x"));
        assert_eq!(2, interpreter.diagnostics.error_count());
    }

    #[test]
    fn test_subscript_on_non_array_is_an_error() {
        let interpreter = run_program("x = 5; x[0] = 1;");
        assert_eq!(Value::Int(5), global(&interpreter, "x"));
        assert_eq!(1, interpreter.diagnostics.error_count());
    }

    #[test]
    fn test_invalid_array_size() {
        let interpreter = run_program("x = array(-1); y = array(20000);");
        assert_eq!(Value::Int(0), global(&interpreter, "x"));
        assert_eq!(Value::Int(0), global(&interpreter, "y"));
        assert_eq!(2, interpreter.diagnostics.error_count());
    }

    #[test]
    fn test_assignment_copies_arrays() {
        let interpreter = run_program("a = [1, 2]; b = a; b[0] = 9;");
        assert_eq!(
            Value::Array(vec![Value::Int(1), Value::Int(2)]),
            global(&interpreter, "a")
        );
        assert_eq!(
            Value::Array(vec![Value::Int(9), Value::Int(2)]),
            global(&interpreter, "b")
        );
    }

    #[test]
    fn test_increment_semantics() {
        let interpreter = run_program(r#"i = 1; i++; f = 1.5; f++; s = "41"; s++;"#);
        assert_eq!(Value::Int(2), global(&interpreter, "i"));
        assert_eq!(Value::Float(2.5), global(&interpreter, "f"));
        assert_eq!(Value::Int(42), global(&interpreter, "s"));
    }

    #[test]
    fn test_builtins_through_calls() {
        let interpreter = run_program(r#"x = length("abc") + first([7]); y = upper("hi");"#);
        assert_eq!(Value::Int(10), global(&interpreter, "x"));
        assert_eq!(Value::string("HI"), global(&interpreter, "y"));
    }

    #[test]
    fn test_push_does_not_mutate_the_callers_array() {
        let interpreter = run_program("a = [1, 2]; b = push(a, 3);");
        assert_eq!(
            Value::Array(vec![Value::Int(1), Value::Int(2)]),
            global(&interpreter, "a")
        );
        assert_eq!(Value::Int(2), global(&interpreter, "b"));
    }

    #[test]
    fn test_time_is_epoch_seconds() {
        let interpreter = run_program("x = time();");
        let Value::Int(now) = global(&interpreter, "x") else {
            panic!("expected an int")
        };
        assert!(now > 1_600_000_000);
    }

    #[test]
    fn test_execution_stops_after_error_budget() {
        let mut source = String::new();
        for i in 0..20 {
            source.push_str(&format!("x = missing{i};\n"));
        }
        source.push_str("z = 1;\n");

        let interpreter = run_program(&source);
        assert_eq!(MAX_ERRORS + 1, interpreter.diagnostics.error_count());
        assert_eq!(None, interpreter.env.get("z"));
    }

    #[test]
    fn test_function_registry_is_bounded() {
        let mut source = String::new();
        for i in 0..=MAX_FUNCS {
            source.push_str(&format!("fn f{i}() {{ rn 0; }};\n"));
        }

        let interpreter = run_program(&source);
        assert_eq!(MAX_FUNCS, interpreter.functions.len());
        assert_eq!(1, interpreter.diagnostics.error_count());
    }

    #[test]
    fn test_coerce_input() {
        assert_eq!(Value::Int(42), coerce_input("42"));
        assert_eq!(Value::Int(-7), coerce_input("-7"));
        assert_eq!(Value::Float(2.5), coerce_input("2.5"));
        assert_eq!(Value::string("2.5x"), coerce_input("2.5x"));
        assert_eq!(Value::string("hello"), coerce_input("hello"));
        assert_eq!(Value::Int(0), coerce_input(""));
    }
}
