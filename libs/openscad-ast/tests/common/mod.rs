//! CST fixture builders shared by the integration suites. These mirror
//! the shapes the external parser serializes, built by hand so each test
//! controls exactly the tree it feeds in.

#![allow(dead_code)]

use openscad_cst::CstNode;

pub fn source(children: Vec<CstNode>) -> CstNode {
    CstNode::leaf("source_file", "", 0, 0).with_children(children)
}

pub fn statement(inner: CstNode) -> CstNode {
    CstNode::leaf("statement", "", 0, 0).with_children(vec![inner])
}

pub fn number(text: &str) -> CstNode {
    CstNode::leaf("number", text, 0, text.len())
}

pub fn identifier(text: &str) -> CstNode {
    CstNode::leaf("identifier", text, 0, text.len())
}

pub fn token(text: &str) -> CstNode {
    CstNode::leaf(text, text, 0, text.len()).anonymous()
}

/// `name(args...)` as a statement-level instantiation.
pub fn call(name: &str, arguments: Vec<CstNode>) -> CstNode {
    CstNode::leaf("module_instantiation", &format!("{name}(...)"), 0, name.len() + 5)
        .with_children(vec![
            identifier(name).with_field("name"),
            CstNode::leaf("arguments", "(...)", 0, 5)
                .with_field("arguments")
                .with_children(arguments),
        ])
}

pub fn call_statement(name: &str) -> CstNode {
    statement(call(name, Vec::new()))
}

/// `name(args...) child` — instantiation wrapping a single child.
pub fn call_with_child(name: &str, child: CstNode) -> CstNode {
    CstNode::leaf("module_instantiation", &format!("{name}(...) ..."), 0, 15).with_children(vec![
        identifier(name).with_field("name"),
        CstNode::leaf("arguments", "(...)", 0, 5).with_field("arguments"),
        child,
    ])
}

pub fn block(statements: Vec<CstNode>) -> CstNode {
    let mut children = vec![token("{")];
    children.extend(statements);
    children.push(token("}"));
    CstNode::leaf("block", "{ ... }", 0, 7).with_children(children)
}

/// `name = value` with structured fields.
pub fn assignment(name: &str, value: CstNode) -> CstNode {
    CstNode::leaf("assignment", &format!("{name} = ..."), 0, name.len() + 6).with_children(vec![
        identifier(name).with_field("name"),
        value.with_field("value"),
    ])
}

/// A positional `[a:b]` or `[a:b:c]` range from segment nodes; `None`
/// leaves that segment empty.
pub fn range(parts: Vec<Option<CstNode>>) -> CstNode {
    let mut children = vec![token("[")];
    for (i, part) in parts.into_iter().enumerate() {
        if i > 0 {
            children.push(token(":"));
        }
        if let Some(part) = part {
            children.push(part);
        }
    }
    children.push(token("]"));
    CstNode::leaf("range_expression", "[...]", 0, 5).with_children(children)
}

pub fn condition(text: &str) -> CstNode {
    CstNode::leaf("parenthesized_expression", &format!("({text})"), 0, text.len() + 2)
        .with_children(vec![
            token("("),
            CstNode::leaf("boolean", text, 1, text.len() + 1),
            token(")"),
        ])
}

pub fn if_statement(cond: &str, then: CstNode, alternative: Option<CstNode>) -> CstNode {
    let mut children = vec![token("if"), condition(cond), then];
    if let Some(alt) = alternative {
        children.push(token("else"));
        children.push(alt);
    }
    CstNode::leaf("if_statement", "if (...) ...", 0, 12).with_children(children)
}

pub fn for_statement(bindings: Vec<CstNode>, body: CstNode) -> CstNode {
    let container = CstNode::leaf("assignments", "(...)", 0, 5).with_children(bindings);
    CstNode::leaf("for_statement", "for (...) ...", 0, 13).with_children(vec![
        token("for"),
        container,
        body,
    ])
}

pub fn module_definition(name: &str, params: Vec<CstNode>, body: CstNode) -> CstNode {
    CstNode::leaf("module_definition", &format!("module {name}(...) ..."), 0, 20).with_children(
        vec![
            token("module"),
            identifier(name).with_field("name"),
            CstNode::leaf("parameters", "(...)", 0, 5)
                .with_field("parameters")
                .with_children(params),
            body.with_field("body"),
        ],
    )
}

pub fn function_definition(name: &str, params: Vec<CstNode>, body: CstNode) -> CstNode {
    CstNode::leaf("function_definition", &format!("function {name}(...) = ..."), 0, 25)
        .with_children(vec![
            token("function"),
            identifier(name).with_field("name"),
            CstNode::leaf("parameters", "(...)", 0, 5)
                .with_field("parameters")
                .with_children(params),
            token("="),
            body.with_field("value"),
        ])
}
