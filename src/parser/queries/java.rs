//! Java API endpoint detection via AST traversal.
//!
//! Detects Spring MVC / Spring Boot controllers:
//!   @RestController @RequestMapping("/api") class UserController { ... }
//!   @GetMapping("/{id}") User get(@PathVariable Long id)
//!   @RequestMapping(value = "/new", method = RequestMethod.POST)
//!
//! Parameter annotations fill the record's parameter buckets.

use tree_sitter::Node;

use super::{clean_comment, line_of, named_children, node_text};
use crate::endpoint::{standard_method, EndpointRecord};
use crate::parser::paths::join_paths;

const FRAMEWORK: &str = "Spring Boot";

const CONTROLLER_ANNOTATIONS: [&str; 2] = ["RestController", "Controller"];

/// Verb-specific mapping annotations and the verb each one implies.
const VERB_MAPPINGS: [(&str, &str); 5] = [
    ("GetMapping", "GET"),
    ("PostMapping", "POST"),
    ("PutMapping", "PUT"),
    ("DeleteMapping", "DELETE"),
    ("PatchMapping", "PATCH"),
];

const REQUEST_MAPPING: &str = "RequestMapping";

/// Extract endpoints from every controller class in a Java AST.
///
/// A file without controller classes yields nothing.
pub fn extract_spring_endpoints(root: Node, source: &[u8], file: &str) -> Vec<EndpointRecord> {
    let mut endpoints = Vec::new();
    visit_classes(root, source, file, &mut endpoints);
    endpoints
}

fn visit_classes(node: Node, source: &[u8], file: &str, endpoints: &mut Vec<EndpointRecord>) {
    if node.kind() == "class_declaration" {
        extract_controller(node, source, file, endpoints);
    }
    for child in named_children(node) {
        visit_classes(child, source, file, endpoints);
    }
}

fn extract_controller(class: Node, source: &[u8], file: &str, endpoints: &mut Vec<EndpointRecord>) {
    let class_annotations = annotations(class);
    let is_controller = class_annotations
        .iter()
        .any(|a| CONTROLLER_ANNOTATIONS.contains(&annotation_name(*a, source)));
    if !is_controller {
        return;
    }

    let base_path = class_annotations
        .iter()
        .find(|a| annotation_name(**a, source) == REQUEST_MAPPING)
        .and_then(|a| mapping_path(*a, source))
        .unwrap_or_else(|| "/".to_string());

    let Some(body) = class.child_by_field_name("body") else {
        return;
    };
    for method in named_children(body)
        .into_iter()
        .filter(|m| m.kind() == "method_declaration")
    {
        extract_method(method, &base_path, source, file, endpoints);
    }
}

fn extract_method(
    method: Node,
    base_path: &str,
    source: &[u8],
    file: &str,
    endpoints: &mut Vec<EndpointRecord>,
) {
    let mappings: Vec<(String, Vec<&'static str>)> = annotations(method)
        .into_iter()
        .filter_map(|a| mapping_info(a, source))
        .collect();
    if mappings.is_empty() {
        return;
    }

    let name = method
        .child_by_field_name("name")
        .map(|n| node_text(n, source))
        .unwrap_or("unknown");
    let description = javadoc(method, source);
    let params = method
        .child_by_field_name("parameters")
        .map(|p| parameter_buckets(p, source))
        .unwrap_or_default();
    let line = line_of(method);

    for (path, methods) in mappings {
        let full_path = join_paths(base_path, &path);
        for verb in methods {
            let mut record = EndpointRecord::new(full_path.clone(), verb, FRAMEWORK, file, line, name)
                .with_description(description.clone());
            params.apply(&mut record);
            endpoints.push(record);
        }
    }
}

// ─── Mapping annotations ────────────────────────────────────────

/// Path and verbs declared by a mapping annotation, or `None` if the
/// annotation is not a mapping.
fn mapping_info(annotation: Node, source: &[u8]) -> Option<(String, Vec<&'static str>)> {
    let name = annotation_name(annotation, source);
    let path = mapping_path(annotation, source).unwrap_or_else(|| "/".to_string());

    if let Some((_, verb)) = VERB_MAPPINGS.iter().find(|(n, _)| *n == name) {
        return Some((path, vec![*verb]));
    }
    if name != REQUEST_MAPPING {
        return None;
    }

    // Without `method` the mapping serves GET; with only unknown verbs it
    // serves nothing we can describe.
    let Some(value) = annotation_argument(annotation, &["method"], false, source) else {
        return Some((path, vec!["GET"]));
    };
    let mut methods = Vec::new();
    collect_request_methods(value, source, &mut methods);
    Some((path, methods))
}

/// First string in a mapping's `value`/`path` attribute.
fn mapping_path(annotation: Node, source: &[u8]) -> Option<String> {
    let value = annotation_argument(annotation, &["value", "path"], true, source)?;
    first_string(value, source)
}

/// `RequestMethod.POST`, `POST`, or `{RequestMethod.GET, RequestMethod.HEAD}`.
fn collect_request_methods(value: Node, source: &[u8], methods: &mut Vec<&'static str>) {
    match value.kind() {
        "field_access" => {
            if let Some(field) = value.child_by_field_name("field") {
                methods.extend(standard_method(node_text(field, source)));
            }
        }
        "identifier" => methods.extend(standard_method(node_text(value, source))),
        "element_value_array_initializer" => {
            for element in named_children(value) {
                collect_request_methods(element, source, methods);
            }
        }
        _ => {}
    }
}

// ─── Parameter annotations ──────────────────────────────────────

#[derive(Debug, Default, Clone)]
struct ParamBuckets {
    path: Vec<String>,
    query: Vec<String>,
    header: Vec<String>,
    cookie: Vec<String>,
    body: bool,
}

impl ParamBuckets {
    fn apply(&self, record: &mut EndpointRecord) {
        record.path_params = self.path.clone();
        record.query_params = self.query.clone();
        record.header_params = self.header.clone();
        record.cookie_params = self.cookie.clone();
        record.has_request_body = self.body;
    }
}

fn parameter_buckets(parameters: Node, source: &[u8]) -> ParamBuckets {
    let mut buckets = ParamBuckets::default();

    for param in named_children(parameters)
        .into_iter()
        .filter(|p| p.kind() == "formal_parameter")
    {
        let var_name = param
            .child_by_field_name("name")
            .map(|n| node_text(n, source))
            .unwrap_or_default();

        for annotation in annotations(param) {
            let explicit = annotation_argument(annotation, &["value", "name"], true, source)
                .and_then(|v| string_literal(v, source))
                .filter(|s| !s.is_empty() && s != "/");
            let name = explicit.unwrap_or_else(|| var_name.to_string());

            match annotation_name(annotation, source) {
                "PathVariable" => buckets.path.push(name),
                "RequestParam" => buckets.query.push(name),
                "RequestHeader" => {
                    if name.eq_ignore_ascii_case("authorization") {
                        buckets.header.push("Authorization".to_string());
                    } else {
                        buckets.header.push(name);
                    }
                }
                "CookieValue" => buckets.cookie.push(name),
                "RequestBody" => buckets.body = true,
                _ => {}
            }
        }
    }
    buckets
}

// ─── Annotation helpers ─────────────────────────────────────────

/// Annotations in a declaration's `modifiers`.
fn annotations(declaration: Node) -> Vec<Node> {
    named_children(declaration)
        .into_iter()
        .filter(|c| c.kind() == "modifiers")
        .flat_map(named_children)
        .filter(|m| matches!(m.kind(), "annotation" | "marker_annotation"))
        .collect()
}

/// Simple name of an annotation (`GetMapping` for `@org.x.GetMapping`).
fn annotation_name<'a>(annotation: Node, source: &'a [u8]) -> &'a str {
    let full = annotation
        .child_by_field_name("name")
        .map(|n| node_text(n, source))
        .unwrap_or_default();
    full.rsplit('.').next().unwrap_or(full)
}

/// Value of the first argument whose key is in `keys`. With
/// `allow_unnamed`, a bare `@X("...")` argument matches as well.
fn annotation_argument<'t>(
    annotation: Node<'t>,
    keys: &[&str],
    allow_unnamed: bool,
    source: &[u8],
) -> Option<Node<'t>> {
    let args = annotation.child_by_field_name("arguments")?;
    named_children(args).into_iter().find_map(|arg| {
        if arg.kind() == "element_value_pair" {
            let key = arg.child_by_field_name("key")?;
            if keys.contains(&node_text(key, source)) {
                return arg.child_by_field_name("value");
            }
            None
        } else if allow_unnamed && !matches!(arg.kind(), "line_comment" | "block_comment") {
            Some(arg)
        } else {
            None
        }
    })
}

/// The string itself, or the first string of an array initializer.
fn first_string(value: Node, source: &[u8]) -> Option<String> {
    match value.kind() {
        "element_value_array_initializer" => named_children(value)
            .into_iter()
            .find_map(|v| string_literal(v, source)),
        _ => string_literal(value, source),
    }
}

fn string_literal(node: Node, source: &[u8]) -> Option<String> {
    if node.kind() != "string_literal" {
        return None;
    }
    let text = node_text(node, source);
    let inner = text
        .strip_prefix("\"\"\"")
        .and_then(|t| t.strip_suffix("\"\"\""))
        .or_else(|| text.strip_prefix('"').and_then(|t| t.strip_suffix('"')))?;
    Some(inner.trim_matches(|c| c == '\n' || c == '\r').to_string())
}

/// Javadoc comment directly preceding a method.
fn javadoc(method: Node, source: &[u8]) -> String {
    method
        .prev_named_sibling()
        .filter(|c| c.kind() == "block_comment")
        .map(|c| node_text(c, source))
        .filter(|text| text.starts_with("/**"))
        .map(clean_comment)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::queries::parse_tree;

    fn extract(source: &str) -> Vec<EndpointRecord> {
        let grammar = tree_sitter_java::LANGUAGE.into();
        let tree = parse_tree(&grammar, "Java", source, "Api.java").unwrap();
        extract_spring_endpoints(tree.root_node(), source.as_bytes(), "Api.java")
    }

    #[test]
    fn test_class_base_path_and_path_variable() {
        let endpoints = extract(
            r#"
@RestController
@RequestMapping("/api/items")
public class ItemController {
    /**
     * Fetch one item.
     */
    @GetMapping("/{id}")
    public Item get(@PathVariable Long id) {
        return service.find(id);
    }
}
"#,
        );
        assert_eq!(endpoints.len(), 1);
        let e = &endpoints[0];
        assert_eq!(e.path, "/api/items/{id}");
        assert_eq!(e.method, "GET");
        assert_eq!(e.function, "get");
        assert_eq!(e.path_params, vec!["id"]);
        assert_eq!(e.description, "Fetch one item.");
        assert_eq!(e.framework, "Spring Boot");
    }

    #[test]
    fn test_marker_and_verb_mappings() {
        let endpoints = extract(
            r#"
@RestController
@RequestMapping(path = {"/api/items", "/legacy"})
public class ItemController {
    @GetMapping
    public List<Item> all() { return null; }

    @PostMapping
    public Item create(@RequestBody Item item) { return item; }

    @DeleteMapping(value = "/{id}")
    public void delete(@PathVariable("id") Long itemId) {}

    public void helper() {}
}
"#,
        );
        let pairs: Vec<_> = endpoints
            .iter()
            .map(|e| (e.path.as_str(), e.method.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("/api/items", "GET"),
                ("/api/items", "POST"),
                ("/api/items/{id}", "DELETE"),
            ]
        );
        assert!(endpoints[1].has_request_body);
        assert!(!endpoints[0].has_request_body);
        assert_eq!(endpoints[2].path_params, vec!["id"]);
    }

    #[test]
    fn test_request_mapping_methods() {
        let endpoints = extract(
            r#"
@Controller
@RequestMapping("/products")
public class ProductController {
    @RequestMapping(method = RequestMethod.GET)
    public String list(Model model) { return "list"; }

    @RequestMapping(value = "/new", method = {RequestMethod.GET, RequestMethod.POST})
    public String form(@RequestParam String name) { return "form"; }

    @RequestMapping("/legacy")
    public String legacy() { return "legacy"; }

    @RequestMapping(value = "/trace", method = RequestMethod.TRACE)
    public String trace() { return "trace"; }

    @RequestMapping(value = "/mixed", method = {RequestMethod.TRACE, RequestMethod.PUT})
    public String mixed() { return "mixed"; }
}
"#,
        );
        let pairs: Vec<_> = endpoints
            .iter()
            .map(|e| (e.path.as_str(), e.method.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("/products", "GET"),
                ("/products/new", "GET"),
                ("/products/new", "POST"),
                ("/products/legacy", "GET"),
                ("/products/mixed", "PUT"),
            ]
        );
        assert_eq!(endpoints[1].query_params, vec!["name"]);
    }

    #[test]
    fn test_parameter_buckets() {
        let endpoints = extract(
            r#"
@RestController
@RequestMapping("/api/patients")
public class PatientController {
    @GetMapping("/search")
    public ResponseEntity<List<PatientSearchDTO>> search(
            @RequestHeader(value = "authorization") String accessToken,
            @RequestParam("org_id") Long orgId,
            @RequestParam(name = "status", required = false) String status,
            @RequestHeader("X-Trace") String trace,
            @CookieValue("session") String session,
            @CookieValue String theme,
            @RequestParam("org_id") Long duplicate) {
        return null;
    }
}
"#,
        );
        let e = &endpoints[0];
        assert_eq!(e.path, "/api/patients/search");
        assert_eq!(e.header_params, vec!["Authorization", "X-Trace"]);
        assert_eq!(e.query_params, vec!["org_id", "status", "org_id"]);
        assert_eq!(e.cookie_params, vec!["session", "theme"]);
        assert!(e.path_params.is_empty());
        assert!(!e.has_request_body);
    }

    #[test]
    fn test_non_controller_yields_nothing() {
        let endpoints = extract(
            "@Service\npublic class Worker {\n    @GetMapping(\"/x\")\n    public void run() {}\n}\n",
        );
        assert!(endpoints.is_empty());
    }

    #[test]
    fn test_nested_controller() {
        let endpoints = extract(
            "public class Outer {\n    @RestController\n    static class Inner {\n        @PutMapping(\"items\")\n        public void put() {}\n    }\n}\n",
        );
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].path, "/items");
        assert_eq!(endpoints[0].method, "PUT");
    }
}
