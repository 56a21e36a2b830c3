//! The AST interpreter.
//!
//! Walks the annotated tree the way the abstract machine would run it:
//! expression results pass through the accumulator, variables live in a
//! per-symbol store, and `inbox`/`outbox` talk to the machine queues.
//! Draining an empty inbox halts the program normally.

use std::collections::HashMap;

use hrlc_compiler::ast::{Ast, BinaryOp, NodeId, NodeKind};
use hrlc_compiler::sema::{ScopeId, SymbolId, SymbolKind, SymbolTable};
use hrlc_core::{DEFAULT_FLOOR_MAX, HrmValue, ValueError};

use crate::machine::Machine;
use crate::RuntimeError;

const DEFAULT_STEP_LIMIT: u64 = 1_000_000;

/// Why execution stopped flowing through the current statement list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Normal,
    Break,
    Continue,
    Return,
}

/// Non-local exits: a normal halt (empty inbox) or a runtime fault.
enum Interrupt {
    Halt,
    Error(RuntimeError),
}

impl From<RuntimeError> for Interrupt {
    fn from(error: RuntimeError) -> Self {
        Interrupt::Error(error)
    }
}

impl From<ValueError> for Interrupt {
    fn from(error: ValueError) -> Self {
        Interrupt::Error(error.into())
    }
}

type Exec<T> = Result<T, Interrupt>;

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub output: Vec<HrmValue>,
    pub steps: u64,
}

pub struct Interpreter<'p> {
    ast: &'p Ast,
    symbols: &'p SymbolTable,
    machine: Machine,
    vars: HashMap<SymbolId, HrmValue>,
    return_value: Option<HrmValue>,
    step_limit: u64,
    steps: u64,
}

impl<'p> Interpreter<'p> {
    pub fn new(ast: &'p Ast, symbols: &'p SymbolTable) -> Self {
        let floor_max = floor_max_of(ast);
        Self {
            ast,
            symbols,
            machine: Machine::new(floor_max),
            vars: HashMap::new(),
            return_value: None,
            step_limit: DEFAULT_STEP_LIMIT,
            steps: 0,
        }
    }

    pub fn with_input(mut self, values: impl IntoIterator<Item = HrmValue>) -> Self {
        self.machine.feed(values);
        self
    }

    pub fn with_step_limit(mut self, limit: u64) -> Self {
        self.step_limit = limit;
        self
    }

    /// Executes floor initializers, global declarations, and the `start`
    /// subprocedure.
    pub fn run(mut self) -> Result<RunReport, RuntimeError> {
        let result = self.run_inner();
        match result {
            Ok(()) | Err(Interrupt::Halt) => Ok(RunReport {
                output: self.machine.into_output(),
                steps: self.steps,
            }),
            Err(Interrupt::Error(error)) => Err(error),
        }
    }

    fn run_inner(&mut self) -> Exec<()> {
        let NodeKind::CompilationUnit {
            floor_inits,
            globals,
            subroutines,
            ..
        } = self.ast.kind(self.ast.root()).clone()
        else {
            return Err(RuntimeError::MissingStart.into());
        };

        for init in floor_inits {
            self.exec(init)?;
        }
        for global in globals {
            self.exec(global)?;
        }

        let start = subroutines
            .into_iter()
            .find(|&def| self.ast.kind(def).name() == Some("start"))
            .ok_or(RuntimeError::MissingStart)?;
        self.call_subroutine(start, None)?;
        Ok(())
    }

    fn step(&mut self) -> Exec<()> {
        self.steps += 1;
        if self.steps > self.step_limit {
            return Err(RuntimeError::StepLimitExceeded.into());
        }
        Ok(())
    }

    fn bound_symbol(&self, node: NodeId) -> Exec<SymbolId> {
        self.ast
            .symbol(node)
            .ok_or_else(|| RuntimeError::UnboundNode.into())
    }

    fn read_var(&self, symbol: SymbolId) -> Exec<HrmValue> {
        self.vars.get(&symbol).copied().ok_or_else(|| {
            RuntimeError::UnsetVariable {
                name: self.symbols.symbol(symbol).name.clone(),
            }
            .into()
        })
    }

    fn exec(&mut self, node: NodeId) -> Exec<Flow> {
        self.step()?;
        match self.ast.kind(node).clone() {
            NodeKind::Empty | NodeKind::Import { .. } | NodeKind::FloorMax { .. } => {
                Ok(Flow::Normal)
            }
            NodeKind::VariableDeclaration { assignment, .. } => {
                if let Some(assignment) = assignment {
                    self.exec(assignment)?;
                }
                Ok(Flow::Normal)
            }
            NodeKind::VariableAssignment { value, .. } => {
                let symbol = self.bound_symbol(node)?;
                let value = self.eval(value)?;
                self.vars.insert(symbol, value);
                Ok(Flow::Normal)
            }
            NodeKind::FloorBoxInit { assignment } => self.exec(assignment),
            NodeKind::FloorAssignment { index, value } => {
                let value = self.eval(value)?;
                let index = self.eval(index)?;
                self.machine.floor.store(index.raw(), value)?;
                Ok(Flow::Normal)
            }
            NodeKind::Invocation { .. } => {
                self.call_invocation(node)?;
                Ok(Flow::Normal)
            }
            NodeKind::Block { statements } => {
                for statement in statements {
                    let flow = self.exec(statement)?;
                    if flow != Flow::Normal {
                        return Ok(flow);
                    }
                }
                Ok(Flow::Normal)
            }
            NodeKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.eval(condition)?.is_truthy() {
                    self.exec(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.exec(else_branch)
                } else {
                    Ok(Flow::Normal)
                }
            }
            NodeKind::While { condition, body } => {
                loop {
                    self.step()?;
                    if !self.eval(condition)?.is_truthy() {
                        break;
                    }
                    match self.exec(body)? {
                        Flow::Normal | Flow::Continue => {}
                        Flow::Break => break,
                        Flow::Return => return Ok(Flow::Return),
                    }
                }
                Ok(Flow::Normal)
            }
            NodeKind::For {
                init,
                condition,
                update,
                body,
            } => {
                if let Some(init) = init {
                    self.exec(init)?;
                }
                loop {
                    self.step()?;
                    if let Some(condition) = condition
                        && !self.eval(condition)?.is_truthy()
                    {
                        break;
                    }
                    match self.exec(body)? {
                        Flow::Normal | Flow::Continue => {}
                        Flow::Break => break,
                        Flow::Return => return Ok(Flow::Return),
                    }
                    if let Some(update) = update {
                        self.eval(update)?;
                    }
                }
                Ok(Flow::Normal)
            }
            NodeKind::Return { value } => {
                self.return_value = match value {
                    Some(value) => Some(self.eval(value)?),
                    None => None,
                };
                Ok(Flow::Return)
            }
            NodeKind::Break => Ok(Flow::Break),
            NodeKind::Continue => Ok(Flow::Continue),
            // Expressions in statement position only appear through
            // `Invocation`, handled above.
            _ => Ok(Flow::Normal),
        }
    }

    fn eval(&mut self, node: NodeId) -> Exec<HrmValue> {
        self.step()?;
        let value = match self.ast.kind(node).clone() {
            NodeKind::Integer { value, is_char } => HrmValue::from_raw(value, is_char)?,
            NodeKind::Boolean { value } => HrmValue::bool(value),
            NodeKind::VariableAccess { .. } => {
                let symbol = self.bound_symbol(node)?;
                self.read_var(symbol)?
            }
            NodeKind::Increment { .. } => {
                let symbol = self.bound_symbol(node)?;
                let next = self.read_var(symbol)?.increment()?;
                self.vars.insert(symbol, next);
                next
            }
            NodeKind::Decrement { .. } => {
                let symbol = self.bound_symbol(node)?;
                let next = self.read_var(symbol)?.decrement()?;
                self.vars.insert(symbol, next);
                next
            }
            NodeKind::FloorAccess { index } => {
                let index = self.eval(index)?;
                self.machine.floor.load(index.raw())?
            }
            NodeKind::Negative { operand } => self.eval(operand)?.negate()?,
            NodeKind::Not { operand } => HrmValue::bool(!self.eval(operand)?.is_truthy()),
            NodeKind::Binary { op, lhs, rhs } => {
                let left = self.eval(lhs)?;
                let right = self.eval(rhs)?;
                apply_binary(op, &left, &right)?
            }
            NodeKind::Invocation { callee, .. } => {
                self.call_invocation(node)?
                    .ok_or(RuntimeError::MissingReturnValue { name: callee })?
            }
            _ => return Err(RuntimeError::UnboundNode.into()),
        };
        self.machine.accumulator = Some(value);
        Ok(value)
    }

    /// Invokes a builtin or user subroutine; `None` when it produced no value.
    fn call_invocation(&mut self, node: NodeId) -> Exec<Option<HrmValue>> {
        let NodeKind::Invocation { argument, .. } = self.ast.kind(node).clone() else {
            return Err(RuntimeError::UnboundNode.into());
        };
        let symbol_id = self.bound_symbol(node)?;
        let symbol = self.symbols.symbol(symbol_id);

        if symbol.is_builtin() {
            return match symbol.name.as_str() {
                "inbox" => match self.machine.pop_input() {
                    Some(value) => {
                        self.machine.accumulator = Some(value);
                        Ok(Some(value))
                    }
                    // Empty inbox: the machine walks off the job.
                    None => Err(Interrupt::Halt),
                },
                "outbox" => {
                    let argument = argument.ok_or(RuntimeError::UnboundNode)?;
                    let value = self.eval(argument)?;
                    self.machine.push_output(value);
                    Ok(None)
                }
                _ => Err(RuntimeError::NotCallable {
                    name: symbol.name.clone(),
                }
                .into()),
            };
        }

        if symbol.kind != SymbolKind::Subroutine {
            return Err(RuntimeError::NotCallable {
                name: symbol.name.clone(),
            }
            .into());
        }
        let def = symbol.def_site.ok_or(RuntimeError::UnboundNode)?;
        let argument = match argument {
            Some(argument) => Some(self.eval(argument)?),
            None => None,
        };
        self.call_subroutine(def, argument)
    }

    fn call_subroutine(
        &mut self,
        def: NodeId,
        argument: Option<HrmValue>,
    ) -> Exec<Option<HrmValue>> {
        let (name, parameter, body, has_return) = match self.ast.kind(def).clone() {
            NodeKind::Subprocedure {
                name,
                parameter,
                body,
            } => (name, parameter, body, false),
            NodeKind::Function {
                name,
                parameter,
                body,
            } => (name, parameter, body, true),
            _ => return Err(RuntimeError::UnboundNode.into()),
        };

        if let (Some(parameter), Some(value)) = (parameter, argument) {
            let scope = ScopeId::root().child(&name);
            if let Some(symbol) = self.symbols.lookup(&scope, &parameter) {
                self.vars.insert(symbol, value);
            }
        }

        let saved = self.return_value.take();
        let flow = self.exec(body)?;
        let produced = match flow {
            Flow::Return => self.return_value.take(),
            _ => None,
        };
        self.return_value = saved;

        if has_return && produced.is_none() {
            return Err(RuntimeError::MissingReturnValue { name }.into());
        }
        Ok(produced)
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }
}

fn apply_binary(op: BinaryOp, left: &HrmValue, right: &HrmValue) -> Result<HrmValue, ValueError> {
    match op {
        BinaryOp::Add => left.checked_add(right),
        BinaryOp::Sub => left.checked_sub(right),
        BinaryOp::Mul => left.checked_mul(right),
        BinaryOp::Div => left.checked_div(right),
        BinaryOp::Mod => left.checked_rem(right),
        BinaryOp::And => Ok(HrmValue::bool(left.is_truthy() && right.is_truthy())),
        BinaryOp::Or => Ok(HrmValue::bool(left.is_truthy() || right.is_truthy())),
        BinaryOp::Eq => left.compare(right, |a, b| a == b),
        BinaryOp::Ne => left.compare(right, |a, b| a != b),
        BinaryOp::Gt => left.compare(right, |a, b| a > b),
        BinaryOp::Ge => left.compare(right, |a, b| a >= b),
        BinaryOp::Lt => left.compare(right, |a, b| a < b),
        BinaryOp::Le => left.compare(right, |a, b| a <= b),
    }
}

/// The program's floor bound: `init floor_max` when present, 63 otherwise.
fn floor_max_of(ast: &Ast) -> u32 {
    let NodeKind::CompilationUnit { floor_max, .. } = ast.kind(ast.root()) else {
        return DEFAULT_FLOOR_MAX;
    };
    let Some(node) = floor_max else {
        return DEFAULT_FLOOR_MAX;
    };
    match ast.kind(*node) {
        NodeKind::FloorMax { value } => match ast.kind(*value) {
            NodeKind::Integer { value, .. } if *value >= 0 => *value as u32,
            _ => DEFAULT_FLOOR_MAX,
        },
        _ => DEFAULT_FLOOR_MAX,
    }
}
