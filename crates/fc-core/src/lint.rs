//! Structural lint for externally loaded documents.
//!
//! The reducers keep the graph consistent by construction and never validate
//! after the fact. Documents arriving from storage or an import pipeline can
//! still be malformed; these rules report the problems without modifying
//! anything.

use crate::document::Document;
use crate::id::NodeId;
use crate::model::NodeKind;
use crate::template::TemplateRegistry;
use petgraph::algo::is_cyclic_directed;
use petgraph::graphmap::DiGraphMap;
use std::collections::{HashMap, HashSet};

// ─── Diagnostic types ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// The document violates a structural invariant.
    Error,
    /// Likely a mistake, but the editor can still operate.
    Warning,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LintDiagnostic {
    pub node_id: NodeId,
    pub message: String,
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "dangling-child", "cycle").
    pub rule: &'static str,
}

// ─── Public API ───────────────────────────────────────────────────────────

/// Run every rule and return the diagnostics, sorted by node id then rule.
#[must_use]
pub fn lint_document(document: &Document, templates: &TemplateRegistry) -> Vec<LintDiagnostic> {
    let mut diags = Vec::new();
    lint_dangling_children(document, &mut diags);
    lint_multiple_parents(document, &mut diags);
    lint_cycles(document, &mut diags);
    lint_unreachable(document, &mut diags);
    lint_overrides(document, templates, &mut diags);
    diags.sort_by(|a, b| {
        a.node_id
            .as_str()
            .cmp(b.node_id.as_str())
            .then(a.rule.cmp(b.rule))
    });
    diags
}

// ─── Rules ────────────────────────────────────────────────────────────────

fn lint_dangling_children(document: &Document, diags: &mut Vec<LintDiagnostic>) {
    for node in document.nodes.values() {
        for child in node.children() {
            if !document.contains(*child) {
                diags.push(LintDiagnostic {
                    node_id: node.id,
                    message: format!("child `{child}` of `{}` is not in the document", node.id),
                    severity: LintSeverity::Error,
                    rule: "dangling-child",
                });
            }
        }
    }
}

fn lint_multiple_parents(document: &Document, diags: &mut Vec<LintDiagnostic>) {
    let mut parents: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
    for node in document.nodes.values() {
        for child in node.children() {
            parents.entry(*child).or_default().push(node.id);
        }
    }
    for (child, mut owners) in parents {
        if owners.len() > 1 {
            owners.sort_by(|a, b| a.as_str().cmp(b.as_str()));
            let names: Vec<&str> = owners.iter().map(|o| o.as_str()).collect();
            diags.push(LintDiagnostic {
                node_id: child,
                message: format!("`{child}` is a child of several nodes: {}", names.join(", ")),
                severity: LintSeverity::Error,
                rule: "multiple-parents",
            });
        }
    }
}

fn child_graph(document: &Document) -> DiGraphMap<NodeId, ()> {
    let mut graph = DiGraphMap::new();
    for node in document.nodes.values() {
        graph.add_node(node.id);
        for child in node.children() {
            if document.contains(*child) {
                graph.add_edge(node.id, *child, ());
            }
        }
    }
    graph
}

fn lint_cycles(document: &Document, diags: &mut Vec<LintDiagnostic>) {
    let graph = child_graph(document);
    if !is_cyclic_directed(&graph) {
        return;
    }
    // Report every node that can reach itself.
    for start in graph.nodes() {
        let mut dfs = petgraph::visit::Dfs::new(&graph, start);
        dfs.next(&graph); // skip the start itself
        while let Some(reached) = dfs.next(&graph) {
            if graph.contains_edge(reached, start) {
                diags.push(LintDiagnostic {
                    node_id: start,
                    message: format!("`{start}` is its own ancestor"),
                    severity: LintSeverity::Error,
                    rule: "cycle",
                });
                break;
            }
        }
        if graph.contains_edge(start, start) {
            diags.push(LintDiagnostic {
                node_id: start,
                message: format!("`{start}` lists itself as a child"),
                severity: LintSeverity::Error,
                rule: "cycle",
            });
        }
    }
}

fn lint_unreachable(document: &Document, diags: &mut Vec<LintDiagnostic>) {
    let reachable: HashSet<NodeId> = document.subtree(document.root_id).into_iter().collect();
    for id in document.nodes.keys() {
        if !reachable.contains(id) {
            diags.push(LintDiagnostic {
                node_id: *id,
                message: format!("`{id}` is not reachable from the root"),
                severity: LintSeverity::Warning,
                rule: "unreachable",
            });
        }
    }
}

fn lint_overrides(document: &Document, templates: &TemplateRegistry, diags: &mut Vec<LintDiagnostic>) {
    for node in document.nodes.values() {
        let NodeKind::TemplateInstance(instance) = &node.kind else {
            continue;
        };
        let Some(template) = templates.get(instance.template_id) else {
            diags.push(LintDiagnostic {
                node_id: node.id,
                message: format!("template `{}` is not registered", instance.template_id),
                severity: LintSeverity::Error,
                rule: "unknown-template",
            });
            continue;
        };
        for target in instance.overrides.keys() {
            if !template.contains(*target) {
                diags.push(LintDiagnostic {
                    node_id: node.id,
                    message: format!(
                        "override for `{target}` does not match any node of template `{}`",
                        template.id
                    ),
                    severity: LintSeverity::Warning,
                    rule: "unknown-override-node",
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(diags: &[LintDiagnostic]) -> Vec<(&str, &'static str)> {
        diags.iter().map(|d| (d.node_id.as_str(), d.rule)).collect()
    }

    #[test]
    fn clean_document_has_no_findings() {
        let doc = Document::from_json(
            r#"{
            "root_id": "ln_root",
            "nodes": {
                "ln_root": { "id": "ln_root", "type": "container", "children": ["ln_a"] },
                "ln_a": { "id": "ln_a", "type": "rectangle" }
            }
        }"#,
        )
        .unwrap();
        assert!(lint_document(&doc, &TemplateRegistry::new()).is_empty());
    }

    #[test]
    fn structural_problems() {
        let doc = Document::from_json(
            r#"{
            "root_id": "lx_root",
            "nodes": {
                "lx_root": { "id": "lx_root", "type": "container", "children": ["lx_a", "lx_b", "lx_ghost"] },
                "lx_a": { "id": "lx_a", "type": "container", "children": ["lx_shared"] },
                "lx_b": { "id": "lx_b", "type": "container", "children": ["lx_shared"] },
                "lx_shared": { "id": "lx_shared", "type": "ellipse" },
                "lx_orphan": { "id": "lx_orphan", "type": "ellipse" }
            }
        }"#,
        )
        .unwrap();
        let diags = lint_document(&doc, &TemplateRegistry::new());
        assert_eq!(
            rules(&diags),
            vec![
                ("lx_orphan", "unreachable"),
                ("lx_root", "dangling-child"),
                ("lx_shared", "multiple-parents"),
            ]
        );
    }

    #[test]
    fn cycles_are_reported() {
        let doc = Document::from_json(
            r#"{
            "root_id": "lc_root",
            "nodes": {
                "lc_root": { "id": "lc_root", "type": "container", "children": ["lc_a"] },
                "lc_a": { "id": "lc_a", "type": "container", "children": ["lc_b"] },
                "lc_b": { "id": "lc_b", "type": "container", "children": ["lc_a"] }
            }
        }"#,
        )
        .unwrap();
        let diags = lint_document(&doc, &TemplateRegistry::new());
        let cycles: Vec<&str> = diags
            .iter()
            .filter(|d| d.rule == "cycle")
            .map(|d| d.node_id.as_str())
            .collect();
        assert_eq!(cycles, vec!["lc_a", "lc_b"]);
    }

    #[test]
    fn overrides_must_target_template_nodes() {
        let doc = Document::from_json(
            r#"{
            "root_id": "lo_root",
            "nodes": {
                "lo_root": { "id": "lo_root", "type": "container", "children": ["lo_inst", "lo_missing"] },
                "lo_inst": {
                    "id": "lo_inst", "type": "template_instance", "template_id": "tpl-lo",
                    "overrides": { "lo_nope": { "name": "x" }, "lo_dot": { "name": "y" } }
                },
                "lo_missing": { "id": "lo_missing", "type": "template_instance", "template_id": "tpl-gone" }
            }
        }"#,
        )
        .unwrap();
        let templates = TemplateRegistry::from_json(
            r#"[{ "id": "tpl-lo", "nodes": { "lo_dot": { "id": "lo_dot", "type": "ellipse" } } }]"#,
        )
        .unwrap();
        let diags = lint_document(&doc, &templates);
        assert_eq!(
            rules(&diags),
            vec![
                ("lo_inst", "unknown-override-node"),
                ("lo_missing", "unknown-template"),
            ]
        );
    }
}
