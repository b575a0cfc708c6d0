//! Structured C statements and their rendering.
//!
//! Generators build statement trees and leave indentation to [`render`], so
//! nested blocks never need to be re-indented as text.

/// Width of one indentation level.
pub const INDENT: &str = "    ";

/// A generated C statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// `function(argument);`
    Call {
        /// Function name.
        function: String,
        /// Argument expression.
        argument: String,
    },
    /// `if (guard) { body }`
    If {
        /// Condition expression.
        guard: String,
        /// Statements executed when the guard holds.
        body: Vec<Stmt>,
    },
}

impl Stmt {
    /// Creates a call statement.
    #[must_use]
    pub fn call(function: impl Into<String>, argument: impl Into<String>) -> Self {
        Self::Call {
            function: function.into(),
            argument: argument.into(),
        }
    }
}

/// Renders `stmts` with every line indented `depth` levels.
#[must_use]
pub fn render(stmts: &[Stmt], depth: usize) -> String {
    let mut output = String::new();
    render_into(&mut output, stmts, depth);
    output
}

fn render_into(output: &mut String, stmts: &[Stmt], depth: usize) {
    let indent = INDENT.repeat(depth);

    for stmt in stmts {
        match stmt {
            Stmt::Call { function, argument } => {
                output.push_str(&format!("{}{}({});\n", indent, function, argument));
            }
            Stmt::If { guard, body } => {
                output.push_str(&format!("{}if ({}) {{\n", indent, guard));
                render_into(output, body, depth + 1);
                output.push_str(&format!("{}}}\n", indent));
            }
        }
    }
}
