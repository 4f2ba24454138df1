//! Text emitter for flat programs.

use qrew_ir::{Declaration, GateApplication, Instruction, Program, QubitRef};

/// Emit a program, one line per instruction.
///
/// Guarded gates are written as `negctrl(k) @ ctrl(m) @ name guards, targets;`
/// with the negated guards first. A modifier whose count is zero is left out.
pub fn emit(program: &Program) -> String {
    let mut emitter = Emitter::new();
    emitter.emit_program(program);
    emitter.output
}

/// Like [`emit`], with an `OPENQASM 3.0;` header line.
pub fn emit_with_header(program: &Program) -> String {
    let mut emitter = Emitter::new();
    emitter.writeln("OPENQASM 3.0;");
    emitter.emit_program(program);
    emitter.output
}

struct Emitter {
    output: String,
}

impl Emitter {
    fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    fn emit_program(&mut self, program: &Program) {
        for instruction in program {
            match instruction {
                Instruction::Declare(decl) => self.emit_declaration(decl),
                Instruction::Apply(app) => self.emit_gate(app),
            }
        }
    }

    fn emit_declaration(&mut self, decl: &Declaration) {
        let line = match decl.size {
            Some(n) => format!("qubit[{n}] {};", decl.name),
            None => format!("qubit {};", decl.name),
        };
        self.writeln(&line);
    }

    fn emit_gate(&mut self, app: &GateApplication) {
        let mut line = String::new();

        let (negated, positive): (Vec<_>, Vec<_>) = app.guards.iter().partition(|g| g.negated);
        if !negated.is_empty() {
            line.push_str(&format!("negctrl({}) @ ", negated.len()));
        }
        if !positive.is_empty() {
            line.push_str(&format!("ctrl({}) @ ", positive.len()));
        }

        line.push_str(app.gate.name());
        let params = app.gate.parameters();
        if !params.is_empty() {
            let params: Vec<String> = params.iter().map(ToString::to_string).collect();
            line.push_str(&format!("({})", params.join(", ")));
        }

        let operands: Vec<String> = negated
            .iter()
            .chain(&positive)
            .map(|g| &g.qubit)
            .chain(&app.targets)
            .map(QubitRef::to_string)
            .collect();
        line.push(' ');
        line.push_str(&operands.join(", "));
        line.push(';');

        self.writeln(&line);
    }

    fn writeln(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }
}
