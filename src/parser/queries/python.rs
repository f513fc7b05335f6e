//! Python API endpoint detection via AST traversal.
//!
//! Detects:
//!   @app.route("/api/users", methods=["GET", "POST"])   (Flask)
//!   @router.get("/api/users/{id}")                      (FastAPI, or Flask 2.x)
//!   urlpatterns = [path("users/", views.user_list)]     (Django)

use tree_sitter::Node;

use super::{line_of, named_children, node_text};
use crate::endpoint::{standard_method, EndpointRecord};

const DJANGO_ROUTE_FUNCTIONS: [&str; 3] = ["path", "url", "re_path"];

/// Extract API endpoints from a Python AST, in source order.
pub fn extract_python_endpoints(root: Node, source: &[u8], file: &str) -> Vec<EndpointRecord> {
    let ctx = Context {
        source,
        file,
        verb_framework: if imports_flask(root, source) {
            "Flask"
        } else {
            "FastAPI"
        },
    };
    let mut endpoints = Vec::new();
    extract_from_node(root, &ctx, &mut endpoints);
    endpoints
}

struct Context<'a> {
    source: &'a [u8],
    file: &'a str,
    /// Label for verb decorators (`@app.get`), which both Flask 2.x and
    /// FastAPI accept.
    verb_framework: &'static str,
}

/// Recursively walk the AST and collect routes from every idiom.
fn extract_from_node(node: Node, ctx: &Context, endpoints: &mut Vec<EndpointRecord>) {
    match node.kind() {
        "decorated_definition" => extract_decorated_routes(node, ctx, endpoints),
        "assignment" | "augmented_assignment" => extract_urlpatterns(node, ctx, endpoints),
        _ => {}
    }

    for child in named_children(node) {
        extract_from_node(child, ctx, endpoints);
    }
}

/// Whether the module imports Flask at its top level.
fn imports_flask(root: Node, source: &[u8]) -> bool {
    named_children(root).into_iter().any(|stmt| match stmt.kind() {
        "import_from_statement" => stmt
            .child_by_field_name("module_name")
            .map(|m| is_flask_module(node_text(m, source)))
            .unwrap_or(false),
        "import_statement" => named_children(stmt).into_iter().any(|name| {
            let target = name.child_by_field_name("name").unwrap_or(name);
            is_flask_module(node_text(target, source))
        }),
        _ => false,
    })
}

fn is_flask_module(module: &str) -> bool {
    module == "flask" || module.starts_with("flask.")
}

// ─── Decorator routes (Flask / FastAPI) ─────────────────────────

/// A route found on one decorator.
struct DecoratorRoute {
    path: String,
    methods: Vec<String>,
    framework: &'static str,
}

fn extract_decorated_routes(node: Node, ctx: &Context, endpoints: &mut Vec<EndpointRecord>) {
    let Some(func) = node.child_by_field_name("definition") else {
        return;
    };
    if func.kind() != "function_definition" {
        return;
    }

    let name = func
        .child_by_field_name("name")
        .map(|n| node_text(n, ctx.source))
        .unwrap_or("unknown");
    let description = docstring(func, ctx.source).unwrap_or_default();
    let line = line_of(func);

    for decorator in named_children(node)
        .into_iter()
        .filter(|c| c.kind() == "decorator")
    {
        let Some(route) = route_from_decorator(decorator, ctx) else {
            continue;
        };
        for method in route.methods {
            endpoints.push(
                EndpointRecord::new(
                    route.path.clone(),
                    method,
                    route.framework,
                    ctx.file,
                    line,
                    name,
                )
                .with_description(description.clone()),
            );
        }
    }
}

/// Route info from a decorator like `@app.route("/x")` or `@app.post("/x")`.
fn route_from_decorator(decorator: Node, ctx: &Context) -> Option<DecoratorRoute> {
    let call = named_children(decorator)
        .into_iter()
        .find(|c| c.kind() == "call")?;
    let func = call.child_by_field_name("function")?;
    let args = call.child_by_field_name("arguments")?;
    if func.kind() != "attribute" {
        return None;
    }
    let attr = node_text(func.child_by_field_name("attribute")?, ctx.source);

    if attr == "route" {
        let path = string_value(*positional_args(args).first()?, ctx.source)?;
        let methods = methods_keyword(args, ctx.source).unwrap_or_else(|| vec!["GET".to_string()]);
        return Some(DecoratorRoute {
            path,
            methods,
            framework: "Flask",
        });
    }

    let method = standard_method(attr)?;
    let path = string_value(*positional_args(args).first()?, ctx.source)?;
    Some(DecoratorRoute {
        path,
        methods: vec![method.to_string()],
        framework: ctx.verb_framework,
    })
}

/// Standard verbs listed in a `methods=[...]` keyword. `None` when absent.
fn methods_keyword(args: Node, source: &[u8]) -> Option<Vec<String>> {
    let keyword = named_children(args).into_iter().find(|c| {
        c.kind() == "keyword_argument"
            && c.child_by_field_name("name")
                .map(|n| node_text(n, source) == "methods")
                .unwrap_or(false)
    })?;
    let value = keyword.child_by_field_name("value")?;
    if !matches!(value.kind(), "list" | "tuple") {
        return None;
    }
    Some(
        named_children(value)
            .into_iter()
            .filter_map(|elt| string_value(elt, source))
            .filter_map(|m| standard_method(&m))
            .map(str::to_string)
            .collect(),
    )
}

// ─── Django urlpatterns ─────────────────────────────────────────

fn extract_urlpatterns(node: Node, ctx: &Context, endpoints: &mut Vec<EndpointRecord>) {
    let (Some(left), Some(right)) = (
        node.child_by_field_name("left"),
        node.child_by_field_name("right"),
    ) else {
        return;
    };
    if left.kind() != "identifier" || node_text(left, ctx.source) != "urlpatterns" {
        return;
    }
    if right.kind() != "list" {
        return;
    }

    for element in named_children(right) {
        if let Some(endpoint) = django_route(element, ctx) {
            endpoints.push(endpoint);
        }
    }
}

/// A `path("users/", views.user_list)` entry. Django routes carry no verb.
fn django_route(node: Node, ctx: &Context) -> Option<EndpointRecord> {
    if node.kind() != "call" {
        return None;
    }
    let func = node.child_by_field_name("function")?;
    let func_name = match func.kind() {
        "identifier" => node_text(func, ctx.source),
        "attribute" => node_text(func.child_by_field_name("attribute")?, ctx.source),
        _ => return None,
    };
    if !DJANGO_ROUTE_FUNCTIONS.contains(&func_name) {
        return None;
    }

    let args = positional_args(node.child_by_field_name("arguments")?);
    if args.len() < 2 {
        return None;
    }
    let path = string_value(args[0], ctx.source)?;
    let view = match args[1].kind() {
        "identifier" => Some(node_text(args[1], ctx.source)),
        "attribute" => args[1]
            .child_by_field_name("attribute")
            .map(|a| node_text(a, ctx.source)),
        _ => None,
    };

    Some(EndpointRecord::new(
        path,
        "",
        "Django",
        ctx.file,
        line_of(node),
        view.unwrap_or("unknown"),
    ))
}

// ─── Literals ───────────────────────────────────────────────────

/// Positional arguments of an `argument_list`.
fn positional_args(args: Node) -> Vec<Node> {
    named_children(args)
        .into_iter()
        .filter(|c| !matches!(c.kind(), "keyword_argument" | "dictionary_splat" | "comment"))
        .collect()
}

/// Value of a plain string literal. f-strings and bytes are not plain strings.
fn string_value(node: Node, source: &[u8]) -> Option<String> {
    match node.kind() {
        "string" => {
            let text = node_text(node, source);
            let prefix_len = text.find(&['"', '\''][..]).unwrap_or(0);
            let prefix = text[..prefix_len].to_ascii_lowercase();
            if prefix.contains('f') || prefix.contains('b') {
                return None;
            }
            Some(strip_quotes(&text[prefix_len..]))
        }
        "concatenated_string" => named_children(node)
            .into_iter()
            .map(|part| string_value(part, source))
            .collect(),
        _ => None,
    }
}

/// Strip quotes from a string literal body.
fn strip_quotes(s: &str) -> String {
    let s = s.trim();
    for quote in ["\"\"\"", "'''"] {
        if s.len() >= 6 && s.starts_with(quote) && s.ends_with(quote) {
            return s[3..s.len() - 3].to_string();
        }
    }
    for quote in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return s[1..s.len() - 1].to_string();
        }
    }
    s.to_string()
}

/// The function's docstring, cleaned the way `inspect.cleandoc` does.
fn docstring(func: Node, source: &[u8]) -> Option<String> {
    let body = func.child_by_field_name("body")?;
    let first = named_children(body).into_iter().next()?;
    if first.kind() != "expression_statement" {
        return None;
    }
    let literal = named_children(first).into_iter().next()?;
    string_value(literal, source).map(|doc| clean_doc(&doc))
}

fn clean_doc(doc: &str) -> String {
    let mut lines = doc.lines();
    let first = lines.next().unwrap_or("").trim().to_string();
    let rest: Vec<&str> = lines.collect();

    let indent = rest
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut cleaned = vec![first];
    cleaned.extend(
        rest.iter()
            .map(|l| l.get(indent..).unwrap_or("").trim_end().to_string()),
    );

    while cleaned.first().is_some_and(|l| l.is_empty()) {
        cleaned.remove(0);
    }
    while cleaned.last().is_some_and(|l| l.is_empty()) {
        cleaned.pop();
    }
    cleaned.join("\n")
}
