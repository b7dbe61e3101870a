//! Protobuf text rendering
//!
//! Turns a [`FileSchema`] into `.proto` source. Rendering never fails: the
//! schema is structurally valid once assembled.

use crate::annotations::{
    DEFAULT_HOST_EXTENSION_NAME, FIELD_BEHAVIOR_EXTENSION_NAME, HTTP_EXTENSION_NAME,
    METHOD_SIGNATURE_EXTENSION_NAME, RESOURCE_EXTENSION_NAME, quoted,
};
use crate::config::Syntax;
use crate::ir::{FieldShape, FieldType, FileSchema, MessageShape, MethodShape, ServiceShape};

/// Rendering options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Omit blank lines inside message and service bodies
    pub compact: bool,
}

/// Render a schema as `.proto` source
pub fn render(file: &FileSchema, options: RenderOptions) -> String {
    let mut printer = Printer::new(options.compact);

    printer.line(format!("syntax = {};", quoted(file.syntax.as_str())));
    printer.blank();
    printer.line(format!("package {};", file.package));

    let imports = file.imports();
    if !imports.is_empty() {
        printer.blank();
        for import in &imports {
            printer.line(format!("import {};", quoted(import)));
        }
    }

    for message in &file.messages {
        printer.blank();
        render_message(&mut printer, file.syntax, message);
    }

    if let Some(service) = &file.service {
        printer.blank();
        render_service(&mut printer, service);
    }

    printer.finish()
}

fn render_message(printer: &mut Printer, syntax: Syntax, message: &MessageShape) {
    printer.comment(&message.comment);
    printer.line(format!("message {} {{", message.name));
    printer.indent += 1;

    if let Some(resource) = &message.options.resource {
        printer.aggregate_option(RESOURCE_EXTENSION_NAME, &resource.fields());
    }

    for (index, field) in message.fields.iter().enumerate() {
        if index > 0 || message.options.resource.is_some() {
            printer.body_gap();
        }
        printer.comment(&field.comment);
        printer.line(field_declaration(syntax, field, index + 1));
    }

    printer.indent -= 1;
    printer.line("}");
}

fn field_declaration(syntax: Syntax, field: &FieldShape, number: usize) -> String {
    let label = if field.repeated {
        "repeated "
    } else if syntax == Syntax::Proto2 && !field.is_map() {
        "optional "
    } else {
        ""
    };

    let mut decl = format!(
        "{label}{} {} = {number}",
        field_type_name(&field.field_type),
        field.name
    );
    if let Some(behavior) = field.behavior() {
        decl.push_str(&format!(" [({FIELD_BEHAVIOR_EXTENSION_NAME}) = {behavior}]"));
    }
    decl.push(';');
    decl
}

fn field_type_name(field_type: &FieldType) -> String {
    match field_type {
        FieldType::Scalar(scalar) => scalar.as_str().to_string(),
        FieldType::Message(type_ref) => type_ref.name().to_string(),
        FieldType::Map { key, value } => format!("map<{}, {}>", key.as_str(), value.as_str()),
    }
}

fn render_service(printer: &mut Printer, service: &ServiceShape) {
    printer.comment(&service.comment);
    printer.line(format!("service {} {{", service.name));
    printer.indent += 1;

    let has_host = match &service.options.default_host {
        Some(host) => {
            printer.line(format!(
                "option ({DEFAULT_HOST_EXTENSION_NAME}) = {};",
                quoted(host)
            ));
            true
        }
        None => false,
    };

    for (index, method) in service.methods.iter().enumerate() {
        if index > 0 || has_host {
            printer.body_gap();
        }
        render_method(printer, method);
    }

    printer.indent -= 1;
    printer.line("}");
}

fn render_method(printer: &mut Printer, method: &MethodShape) {
    printer.comment(&method.comment);
    let signature = format!(
        "rpc {}({}) returns ({})",
        method.name,
        method.input.name(),
        method.output.name()
    );

    let Some(options) = &method.options else {
        printer.line(format!("{signature};"));
        return;
    };

    printer.line(format!("{signature} {{"));
    printer.indent += 1;
    if let Some(http) = &options.http {
        printer.aggregate_option(HTTP_EXTENSION_NAME, &http.fields());
    }
    if let Some(value) = options.signature_value() {
        printer.line(format!(
            "option ({METHOD_SIGNATURE_EXTENSION_NAME}) = {};",
            quoted(&value)
        ));
    }
    printer.indent -= 1;
    printer.line("}");
}

/// Line oriented writer with two-space indentation
struct Printer {
    lines: Vec<String>,
    indent: usize,
    compact: bool,
}

impl Printer {
    fn new(compact: bool) -> Self {
        Self {
            lines: Vec::new(),
            indent: 0,
            compact,
        }
    }

    fn line(&mut self, text: impl AsRef<str>) {
        self.lines
            .push(format!("{}{}", "  ".repeat(self.indent), text.as_ref()));
    }

    /// Blank line, never doubled and never at the start
    fn blank(&mut self) {
        if self.lines.last().is_some_and(|l| !l.is_empty()) {
            self.lines.push(String::new());
        }
    }

    /// Blank line between body elements, unless compact
    fn body_gap(&mut self) {
        if !self.compact {
            self.blank();
        }
    }

    fn comment(&mut self, comment: &str) {
        for line in comment.lines() {
            if line.is_empty() {
                self.line("//");
            } else {
                self.line(format!("// {line}"));
            }
        }
    }

    /// `option (name) = { key: "value" ... };`
    fn aggregate_option(&mut self, name: &str, fields: &[(&str, &str)]) {
        if self.compact {
            let body = fields
                .iter()
                .map(|(key, value)| format!("{key}: {}", quoted(value)))
                .collect::<Vec<_>>()
                .join(" ");
            self.line(format!("option ({name}) = {{ {body} }};"));
            return;
        }

        self.line(format!("option ({name}) = {{"));
        self.indent += 1;
        for (key, value) in fields {
            self.line(format!("{key}: {}", quoted(value)));
        }
        self.indent -= 1;
        self.line("};");
    }

    fn finish(mut self) -> String {
        while self.lines.last().is_some_and(|l| l.is_empty()) {
            self.lines.pop();
        }
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}
