use crate::ast::{BlockStatement, Expression, InfixOperator, PrefixOperator, Program, Statement};
use crate::object::builtins;
use crate::object::{
    assert_argument_count, Env, Environment, EvalError, EvalResult, Object,
};
use indexmap::IndexMap;
use std::rc::Rc;

/// Walks the program against `env`. A top-level `return` terminates the run
/// with its unwrapped value; runtime errors surface as the `Err` arm.
pub fn eval(program: &Program, env: Env) -> EvalResult {
    let mut result = Object::Null;

    for statement in &program.statements {
        match eval_statement(statement, &env)? {
            Object::Return(value) => return Ok(*value),
            obj => result = obj,
        }
    }

    Ok(result)
}

fn eval_statement(statement: &Statement, env: &Env) -> EvalResult {
    match statement {
        Statement::Let(name, value) => {
            let value = eval_expression(value, env)?;
            env.borrow_mut().set_local(name, value);
            Ok(Object::Null)
        }
        Statement::Return(value) => {
            let value = match value {
                Some(expression) => eval_expression(expression, env)?,
                None => Object::Null,
            };
            Ok(Object::Return(Box::new(value)))
        }
        Statement::Expression(expression) => eval_expression(expression, env),
    }
}

/// Block-level sequencing: a `return` passes through un-unwrapped so it
/// escapes nested blocks to the function call (or program) responsible for
/// unwrapping it.
fn eval_block_statement(block: &BlockStatement, env: &Env) -> EvalResult {
    let mut result = Object::Null;

    for statement in &block.statements {
        result = eval_statement(statement, env)?;
        if let Object::Return(_) = result {
            return Ok(result);
        }
    }

    Ok(result)
}

fn eval_expression(expression: &Expression, env: &Env) -> EvalResult {
    match expression {
        Expression::Identifier(name) => eval_identifier(name, env),
        Expression::Integer(value) => Ok(Object::Integer(*value)),
        Expression::String(value) => Ok(Object::String(value.clone())),
        Expression::Boolean(value) => Ok(Object::Boolean(*value)),
        Expression::Prefix(operator, right) => {
            let right = eval_expression(right, env)?;
            eval_prefix_expression(*operator, right)
        }
        Expression::Infix(operator, left, right) => {
            let left = eval_expression(left, env)?;
            let right = eval_expression(right, env)?;
            eval_infix_expression(*operator, left, right)
        }
        Expression::If(condition, consequence, alternative) => {
            let condition = eval_expression(condition, env)?;
            if condition.is_truthy() {
                eval_block_statement(consequence, &Environment::extend(env))
            } else {
                match alternative {
                    Some(block) => eval_block_statement(block, &Environment::extend(env)),
                    None => Ok(Object::Null),
                }
            }
        }
        Expression::Function(parameters, body) => Ok(Object::Function(
            parameters.clone(),
            body.clone(),
            Rc::clone(env),
        )),
        Expression::Call(function, arguments) => {
            let function = eval_expression(function, env)?;
            let arguments = eval_expressions(arguments, env)?;
            apply_function(function, arguments)
        }
        Expression::Array(elements) => Ok(Object::Array(eval_expressions(elements, env)?)),
        Expression::Index(left, index) => {
            let left = eval_expression(left, env)?;
            let index = eval_expression(index, env)?;
            eval_index_expression(left, index)
        }
        Expression::Assign(name, value) => {
            let value = eval_expression(value, env)?;
            env.borrow_mut().set(name, value.clone());
            Ok(value)
        }
        Expression::Hash(pairs) => eval_hash_literal(pairs, env),
        Expression::Block(block) => eval_block_statement(block, &Environment::extend(env)),
    }
}

fn eval_identifier(name: &str, env: &Env) -> EvalResult {
    if let Some(value) = env.borrow().get(name) {
        return Ok(value);
    }

    builtins::lookup(name).ok_or_else(|| EvalError::IdentifierNotFound(name.to_string()))
}

fn eval_expressions(expressions: &[Expression], env: &Env) -> Result<Vec<Object>, EvalError> {
    expressions
        .iter()
        .map(|expression| eval_expression(expression, env))
        .collect()
}

fn eval_prefix_expression(operator: PrefixOperator, right: Object) -> EvalResult {
    match operator {
        PrefixOperator::Bang => Ok(Object::Boolean(!right.is_truthy())),
        PrefixOperator::Minus => match right {
            // A fresh value, never a sign flip of the operand in place.
            Object::Integer(value) => Ok(Object::Integer(value.wrapping_neg())),
            obj => Err(EvalError::UnknownPrefixOperator(operator, obj)),
        },
        PrefixOperator::Plus => match right {
            Object::Integer(value) => Ok(Object::Integer(value)),
            obj => Err(EvalError::UnknownPrefixOperator(operator, obj)),
        },
    }
}

fn eval_infix_expression(operator: InfixOperator, left: Object, right: Object) -> EvalResult {
    match (left, right) {
        (Object::Integer(left), Object::Integer(right)) => {
            eval_integer_infix_expression(operator, left, right)
        }
        (Object::Boolean(left), Object::Boolean(right)) => {
            eval_boolean_infix_expression(operator, left, right)
        }
        (left, right) => {
            let has_string_operand =
                matches!(left, Object::String(_)) || matches!(right, Object::String(_));

            if has_string_operand && operator == InfixOperator::Plus {
                // Concatenates the rendering of both sides, so "x" + 1 is "x1".
                Ok(Object::String(format!("{}{}", left, right)))
            } else if left.type_name() != right.type_name() {
                Err(EvalError::TypeMismatch(operator, left, right))
            } else {
                Err(EvalError::UnknownInfixOperator(operator, left, right))
            }
        }
    }
}

fn eval_integer_infix_expression(operator: InfixOperator, left: i64, right: i64) -> EvalResult {
    match operator {
        InfixOperator::Plus => Ok(Object::Integer(left.wrapping_add(right))),
        InfixOperator::Minus => Ok(Object::Integer(left.wrapping_sub(right))),
        InfixOperator::Asterisk => Ok(Object::Integer(left.wrapping_mul(right))),
        InfixOperator::Slash if right == 0 => Err(EvalError::DivisionByZero),
        InfixOperator::Slash => match left.checked_div(right) {
            Some(value) => Ok(Object::Integer(value)),
            // The one remaining failure is i64::MIN / -1.
            None => Err(EvalError::IntegerOverflow),
        },
        InfixOperator::Lt => Ok(Object::Boolean(left < right)),
        InfixOperator::Gt => Ok(Object::Boolean(left > right)),
        InfixOperator::Le => Ok(Object::Boolean(left <= right)),
        InfixOperator::Ge => Ok(Object::Boolean(left >= right)),
        InfixOperator::Eq => Ok(Object::Boolean(left == right)),
        InfixOperator::Ne => Ok(Object::Boolean(left != right)),
    }
}

fn eval_boolean_infix_expression(operator: InfixOperator, left: bool, right: bool) -> EvalResult {
    match operator {
        InfixOperator::Eq => Ok(Object::Boolean(left == right)),
        InfixOperator::Ne => Ok(Object::Boolean(left != right)),
        _ => Err(EvalError::UnknownInfixOperator(
            operator,
            Object::Boolean(left),
            Object::Boolean(right),
        )),
    }
}

fn apply_function(function: Object, arguments: Vec<Object>) -> EvalResult {
    match function {
        Object::Function(parameters, body, env) => {
            assert_argument_count(parameters.len(), &arguments)?;

            // The frame wraps the captured defining environment, not the
            // caller's, which is what makes closures capture correctly.
            let scope = Environment::extend(&env);
            for (name, value) in parameters.iter().zip(arguments) {
                scope.borrow_mut().set_local(name, value);
            }

            match eval_block_statement(&body, &scope)? {
                Object::Return(value) => Ok(*value),
                value => Ok(value),
            }
        }
        Object::BuiltIn(function) => function(arguments),
        other => Err(EvalError::NotCallable(other)),
    }
}

fn eval_index_expression(left: Object, index: Object) -> EvalResult {
    match (left, index) {
        (Object::Array(elements), Object::Integer(index)) => {
            if index < 0 || index as usize >= elements.len() {
                return Ok(Object::Null);
            }
            Ok(elements[index as usize].clone())
        }
        (Object::Hash(pairs), key) => match key.hash_key() {
            Some(hash_key) => Ok(pairs
                .get(&hash_key)
                .map(|(_, value)| value.clone())
                .unwrap_or(Object::Null)),
            None => Err(EvalError::UnusableHashKey(key)),
        },
        (left, _) => Err(EvalError::UnsupportedIndexOperation(left)),
    }
}

fn eval_hash_literal(literal_pairs: &[(Expression, Expression)], env: &Env) -> EvalResult {
    let mut pairs = IndexMap::new();

    for (key_expression, value_expression) in literal_pairs {
        let key = eval_expression(key_expression, env)?;
        let hash_key = key
            .hash_key()
            .ok_or_else(|| EvalError::UnusableHashKey(key.clone()))?;

        let value = eval_expression(value_expression, env)?;

        pairs.insert(hash_key, (key, value));
    }

    Ok(Object::Hash(pairs))
}
