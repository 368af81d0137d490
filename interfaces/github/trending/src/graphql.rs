//! A small typed model of a GraphQL query document and its printer.
//!
//! Only the subset needed to talk to GitHub's search endpoint is modelled:
//! one anonymous query operation, fields with arguments, nested selection
//! sets, named fragments, fragment spreads and inline fragments.

/// Meta fields the printer adds to typed selection sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrinterConfig {
    /// Add `__typename` to every selection set except the root `Query`.
    pub include_typename: bool,
    /// Add `id` to every selection set whose type implements `Node`.
    pub include_id: bool,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            include_typename: false,
            include_id: true,
        }
    }
}

/// A composite schema type a selection set is typed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectType {
    pub name: &'static str,
    /// Whether the type implements the `Node` interface and so exposes `id`.
    pub node: bool,
}

impl ObjectType {
    pub const fn new(name: &'static str) -> Self {
        Self { name, node: false }
    }

    pub const fn node(name: &'static str) -> Self {
        Self { name, node: true }
    }
}

pub const QUERY: ObjectType = ObjectType::new("Query");

/// An argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    String(String),
    Enum(String),
    Object(Vec<(String, Value)>),
}

impl Value {
    fn print(&self, out: &mut String) {
        match self {
            Value::Int(value) => out.push_str(&value.to_string()),
            Value::String(value) => print_string(value, out),
            Value::Enum(value) => out.push_str(value),
            Value::Object(entries) => {
                out.push('{');
                print_pairs(entries, out);
                out.push('}');
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSet {
    pub on: ObjectType,
    pub selections: Vec<Selection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Field(Field),
    FragmentSpread(String),
    /// `... on Type { ... }`, for fields typed on an interface or union.
    InlineFragment(SelectionSet),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub arguments: Vec<(String, Value)>,
    pub selection_set: Option<SelectionSet>,
}

impl Field {
    /// A leaf field without arguments.
    pub fn scalar(name: &str) -> Selection {
        Selection::Field(Self {
            name: name.to_owned(),
            arguments: Vec::new(),
            selection_set: None,
        })
    }

    /// A composite field selecting `selections` on `on`.
    pub fn object(name: &str, on: ObjectType, selections: Vec<Selection>) -> Self {
        Self {
            name: name.to_owned(),
            arguments: Vec::new(),
            selection_set: Some(SelectionSet { on, selections }),
        }
    }

    pub fn with_arguments(mut self, arguments: Vec<(String, Value)>) -> Self {
        self.arguments = arguments;
        self
    }
}

impl From<Field> for Selection {
    fn from(field: Field) -> Self {
        Selection::Field(field)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub name: String,
    pub selection_set: SelectionSet,
}

/// An anonymous query operation plus the fragments it spreads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub operation: SelectionSet,
    pub fragments: Vec<Fragment>,
}

impl Document {
    pub fn query(selections: Vec<Selection>) -> Self {
        Self {
            operation: SelectionSet {
                on: QUERY,
                selections,
            },
            fragments: Vec::new(),
        }
    }

    pub fn with_fragment(mut self, fragment: Fragment) -> Self {
        self.fragments.push(fragment);
        self
    }

    /// Renders the document on a single line.
    pub fn print(&self, config: &PrinterConfig) -> String {
        let mut out = String::from("query ");
        print_selection_set(&self.operation, config, &mut out);
        for fragment in &self.fragments {
            out.push_str(" fragment ");
            out.push_str(&fragment.name);
            out.push_str(" on ");
            out.push_str(fragment.selection_set.on.name);
            out.push(' ');
            print_selection_set(&fragment.selection_set, config, &mut out);
        }
        out
    }
}

fn print_selection_set(set: &SelectionSet, config: &PrinterConfig, out: &mut String) {
    let mut entries: Vec<String> = Vec::new();
    if set.on != QUERY {
        if config.include_typename && !selects(set, "__typename") {
            entries.push("__typename".to_owned());
        }
        if config.include_id && set.on.node && !selects(set, "id") {
            entries.push("id".to_owned());
        }
    }

    for selection in &set.selections {
        let mut entry = String::new();
        match selection {
            Selection::Field(field) => print_field(field, config, &mut entry),
            Selection::FragmentSpread(name) => {
                entry.push_str("...");
                entry.push_str(name);
            }
            Selection::InlineFragment(set) => {
                entry.push_str("... on ");
                entry.push_str(set.on.name);
                entry.push(' ');
                print_selection_set(set, config, &mut entry);
            }
        }
        entries.push(entry);
    }

    out.push_str("{ ");
    out.push_str(&entries.join(" "));
    out.push_str(" }");
}

fn print_field(field: &Field, config: &PrinterConfig, out: &mut String) {
    out.push_str(&field.name);
    if !field.arguments.is_empty() {
        out.push('(');
        print_pairs(&field.arguments, out);
        out.push(')');
    }
    if let Some(set) = &field.selection_set {
        out.push(' ');
        print_selection_set(set, config, out);
    }
}

fn print_pairs(pairs: &[(String, Value)], out: &mut String) {
    for (index, (name, value)) in pairs.iter().enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        out.push_str(name);
        out.push_str(": ");
        value.print(out);
    }
}

fn selects(set: &SelectionSet, name: &str) -> bool {
    set.selections
        .iter()
        .any(|selection| matches!(selection, Selection::Field(field) if field.name == name))
}

fn print_string(value: &str, out: &mut String) {
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}
