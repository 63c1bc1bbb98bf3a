//! Emitter
//!
//! Line-and-indent buffer the component code is printed into, plus the
//! string-literal helpers generated code needs.

const INDENT_WITH: &str = "  ";

#[derive(Debug, Clone)]
struct EmittedLine {
    parts: Vec<String>,
    indent: usize,
}

impl EmittedLine {
    fn new(indent: usize) -> Self {
        EmittedLine {
            parts: Vec::new(),
            indent,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EmitterContext {
    lines: Vec<EmittedLine>,
    indent: usize,
}

impl Default for EmitterContext {
    fn default() -> Self {
        Self::create_root()
    }
}

impl EmitterContext {
    pub fn create_root() -> Self {
        EmitterContext::new(0)
    }

    pub fn new(indent: usize) -> Self {
        EmitterContext {
            lines: vec![EmittedLine::new(indent)],
            indent,
        }
    }

    pub fn line_is_empty(&self) -> bool {
        self.lines.last().map_or(true, |line| line.parts.is_empty())
    }

    pub fn print(&mut self, part: &str, new_line: bool) {
        if !part.is_empty() {
            if let Some(line) = self.lines.last_mut() {
                line.parts.push(part.to_string());
            }
        }
        if new_line {
            self.lines.push(EmittedLine::new(self.indent));
        }
    }

    pub fn println(&mut self, last_part: &str) {
        self.print(last_part, true);
    }

    /// Prints one source statement. The first line lands at the current
    /// indent; continuation lines are kept byte for byte, blank ones included,
    /// since they may sit inside a template literal.
    pub fn print_statement(&mut self, text: &str) {
        let mut lines = text.trim().split('\n');
        if let Some(first) = lines.next() {
            self.println(first.trim_end_matches('\r'));
        }
        for line in lines {
            if let Some(last) = self.lines.last_mut() {
                last.indent = 0;
                last.parts.push(line.to_string());
            }
            self.lines.push(EmittedLine::new(self.indent));
        }
    }

    pub fn inc_indent(&mut self) {
        self.indent += 1;
        if self.line_is_empty() {
            if let Some(line) = self.lines.last_mut() {
                line.indent = self.indent;
            }
        }
    }

    pub fn dec_indent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        if self.line_is_empty() {
            if let Some(line) = self.lines.last_mut() {
                line.indent = self.indent;
            }
        }
    }

    pub fn to_source(&self) -> String {
        let lines: Vec<String> = self
            .lines
            .iter()
            .filter(|line| !line.parts.is_empty())
            .map(|line| format!("{}{}", INDENT_WITH.repeat(line.indent), line.parts.concat()))
            .collect();
        lines.join("\n")
    }
}

/// Double-quoted JS string literal.
pub fn quote_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{}\"", value))
}

/// Escapes text for the inside of a JS template literal.
pub fn escape_template_literal(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}

/// Escapes a static attribute value for a double-quoted HTML attribute.
pub fn escape_attribute(value: &str) -> String {
    value.replace('"', "&quot;")
}

/// Object-literal key: bare when it is an identifier, quoted otherwise.
pub fn property_key(name: &str) -> String {
    if crate::chars::is_identifier(name) {
        name.to_string()
    } else {
        quote_string(name)
    }
}
