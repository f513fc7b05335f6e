//! JavaScript/TypeScript API endpoint detection via AST traversal.
//!
//! Detects Express.js routes declared as statements:
//!   app.get("/api/users", handler)
//!   router.post("/items", ...)
//!   const api = express.Router(); api.delete("/items/:id", ...)
//!   app.use("/api", router)        -> method "USE"

use tree_sitter::Node;

use super::{clean_comment, line_of, named_children, node_text};
use crate::endpoint::{EndpointRecord, MOUNT_METHOD, STANDARD_METHODS};

const FRAMEWORK: &str = "Express.js";

/// Receivers that are always treated as Express apps/routers.
const ROUTE_OBJECTS: [&str; 2] = ["app", "router"];

const ROUTE_METHODS: [&str; 9] = [
    "get", "post", "put", "delete", "patch", "options", "head", "all", "use",
];

/// Extract Express.js endpoints from a JavaScript or TypeScript AST.
pub fn extract_express_endpoints(root: Node, source: &[u8], file: &str) -> Vec<EndpointRecord> {
    let mut endpoints = Vec::new();
    walk_statements(&named_children(root), source, file, None, &mut endpoints);
    endpoints
}

/// Walk a statement list in order.
///
/// `router` is the name of the most recent `express.Router()` binding
/// visible here. A declaration updates it for the following siblings and
/// for nested blocks, never for the enclosing scope.
fn walk_statements<'a>(
    statements: &[Node],
    source: &'a [u8],
    file: &str,
    router: Option<&'a str>,
    endpoints: &mut Vec<EndpointRecord>,
) {
    let mut router = router;

    for &stmt in statements {
        match stmt.kind() {
            "expression_statement" => {
                endpoints.extend(routes_from_statement(stmt, source, file, router));
            }
            "lexical_declaration" | "variable_declaration" => {
                if let Some(alias) = router_alias(stmt, source) {
                    router = Some(alias);
                }
            }
            "statement_block" => {
                walk_statements(&named_children(stmt), source, file, router, endpoints);
            }
            _ => {}
        }

        if let Some(body) = stmt.child_by_field_name("body") {
            if body.kind() == "statement_block" {
                walk_statements(&named_children(body), source, file, router, endpoints);
            }
        }
    }
}

/// `const api = express.Router()` binds `api`.
fn router_alias<'a>(declaration: Node, source: &'a [u8]) -> Option<&'a str> {
    let mut alias = None;
    for declarator in named_children(declaration)
        .into_iter()
        .filter(|d| d.kind() == "variable_declarator")
    {
        let (Some(name), Some(value)) = (
            declarator.child_by_field_name("name"),
            declarator.child_by_field_name("value"),
        ) else {
            continue;
        };
        if name.kind() == "identifier" && is_router_factory(value, source) {
            alias = Some(node_text(name, source));
        }
    }
    alias
}

fn is_router_factory(value: Node, source: &[u8]) -> bool {
    if value.kind() != "call_expression" {
        return false;
    }
    let Some(callee) = value.child_by_field_name("function") else {
        return false;
    };
    if callee.kind() != "member_expression" {
        return false;
    }
    let object = callee.child_by_field_name("object");
    let property = callee.child_by_field_name("property");
    matches!(
        (object, property),
        (Some(o), Some(p)) if node_text(o, source) == "express" && node_text(p, source) == "Router"
    )
}

/// Records for a `<receiver>.<verb>("<path>", ...)` statement.
fn routes_from_statement(
    stmt: Node,
    source: &[u8],
    file: &str,
    router: Option<&str>,
) -> Vec<EndpointRecord> {
    let Some(call) = stmt.named_child(0).filter(|c| c.kind() == "call_expression") else {
        return Vec::new();
    };
    let (Some(callee), Some(args)) = (
        call.child_by_field_name("function"),
        call.child_by_field_name("arguments"),
    ) else {
        return Vec::new();
    };
    if callee.kind() != "member_expression" {
        return Vec::new();
    }
    let (Some(object), Some(property)) = (
        callee.child_by_field_name("object"),
        callee.child_by_field_name("property"),
    ) else {
        return Vec::new();
    };

    let verb = node_text(property, source).to_ascii_lowercase();
    if !ROUTE_METHODS.contains(&verb.as_str()) {
        return Vec::new();
    }
    let receiver = node_text(object, source);
    if object.kind() != "identifier"
        || !(ROUTE_OBJECTS.contains(&receiver) || Some(receiver) == router)
    {
        return Vec::new();
    }

    let args: Vec<Node> = named_children(args)
        .into_iter()
        .filter(|a| a.kind() != "comment")
        .collect();
    let Some(path) = args.first().and_then(|a| string_literal(*a, source)) else {
        return Vec::new();
    };
    let handler = args
        .last()
        .filter(|a| args.len() > 1 && matches!(a.kind(), "identifier" | "member_expression"))
        .map(|a| node_text(*a, source))
        .unwrap_or("anonymous");
    let description = leading_comment(stmt, source);
    let line = line_of(stmt);

    let methods: Vec<&str> = match verb.as_str() {
        "use" => vec![MOUNT_METHOD],
        "all" => STANDARD_METHODS.to_vec(),
        _ => vec![match verb.as_str() {
            "get" => "GET",
            "post" => "POST",
            "put" => "PUT",
            "delete" => "DELETE",
            "patch" => "PATCH",
            "options" => "OPTIONS",
            _ => "HEAD",
        }],
    };

    methods
        .into_iter()
        .map(|method| {
            EndpointRecord::new(path.clone(), method, FRAMEWORK, file, line, handler)
                .with_description(description.clone())
        })
        .collect()
}

/// Value of a quoted string literal; template literals are not accepted.
fn string_literal(node: Node, source: &[u8]) -> Option<String> {
    if node.kind() != "string" {
        return None;
    }
    let text = node_text(node, source);
    if text.len() < 2 {
        return None;
    }
    Some(text[1..text.len() - 1].to_string())
}

/// Comments directly above a statement, joined top to bottom.
fn leading_comment(stmt: Node, source: &[u8]) -> String {
    let mut lines = Vec::new();
    let mut next_row = stmt.start_position().row;
    let mut current = stmt.prev_named_sibling();

    while let Some(comment) = current.filter(|c| c.kind() == "comment") {
        if comment.end_position().row + 1 != next_row {
            break;
        }
        lines.push(clean_comment(node_text(comment, source)));
        next_row = comment.start_position().row;
        current = comment.prev_named_sibling();
    }

    lines.reverse();
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::queries::parse_tree;

    fn extract(source: &str) -> Vec<EndpointRecord> {
        let grammar = tree_sitter_javascript::LANGUAGE.into();
        let tree = parse_tree(&grammar, "JavaScript", source, "app.js").unwrap();
        extract_express_endpoints(tree.root_node(), source.as_bytes(), "app.js")
    }

    fn pairs(endpoints: &[EndpointRecord]) -> Vec<(String, String)> {
        endpoints
            .iter()
            .map(|e| (e.path.clone(), e.method.clone()))
            .collect()
    }

    #[test]
    fn test_app_and_router_routes() {
        let endpoints = extract(
            r#"
const express = require('express');
const app = express();

// List users
app.get('/api/users', (req, res) => res.json([]));
app.post('/api/users', users.create);

const router = express.Router();
router.get('/products', listProducts);
app.use('/api', router);
app.listen(3000, () => {});
"#,
        );
        assert_eq!(
            pairs(&endpoints),
            vec![
                ("/api/users".into(), "GET".into()),
                ("/api/users".into(), "POST".into()),
                ("/products".into(), "GET".into()),
                ("/api".into(), "USE".into()),
            ]
        );
        assert_eq!(endpoints[0].description, "List users");
        assert_eq!(endpoints[0].function, "anonymous");
        assert_eq!(endpoints[0].line, 6);
        assert_eq!(endpoints[1].function, "users.create");
        assert_eq!(endpoints[2].function, "listProducts");
        assert!(endpoints.iter().all(|e| e.framework == "Express.js"));
    }

    #[test]
    fn test_custom_router_alias() {
        let endpoints = extract(
            "const express = require('express');\nconst api = express.Router();\napi.delete('/items/:id', remove);\nother.get('/ignored', x);\n",
        );
        assert_eq!(pairs(&endpoints), vec![("/items/:id".into(), "DELETE".into())]);
    }

    #[test]
    fn test_alias_threads_into_nested_blocks_only() {
        let endpoints = extract(
            r#"
function mount() {
    const v2 = express.Router();
    v2.get('/inside', a);
    if (ready) {
        v2.post('/not-a-body-field', b);
    }
    {
        v2.put('/block', c);
    }
}
v2.get('/outside', d);
"#,
        );
        assert_eq!(
            pairs(&endpoints),
            vec![
                ("/inside".into(), "GET".into()),
                ("/block".into(), "PUT".into()),
            ]
        );
    }

    #[test]
    fn test_all_expands_to_standard_verbs() {
        let endpoints = extract("app.all('/any', h);\n");
        assert_eq!(endpoints.len(), 7);
        assert!(endpoints.iter().all(|e| e.path == "/any"));
    }

    #[test]
    fn test_non_literal_paths_are_skipped() {
        let endpoints = extract("app.use((req, res, next) => next());\napp.get(`/t/${id}`, h);\napp.get(PATH, h);\n");
        assert!(endpoints.is_empty());
    }
}
