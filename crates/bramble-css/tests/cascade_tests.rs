//! Integration tests for cascade resolution.

use bramble_css::{Rule, extract_style_content, parse_stylesheet, resolve, ua_stylesheet};
use bramble_dom::{DomTree, NodeId};
use bramble_html::parse_html;

/// Parse markup and CSS, resolve, and return the tree.
fn styled(html: &str, css: &str) -> DomTree {
    let mut tree = parse_html(html);
    resolve(&mut tree, &parse_stylesheet(css));
    tree
}

fn find(tree: &DomTree, tag: &str) -> NodeId {
    tree.find_element(tree.root(), tag)
        .unwrap_or_else(|| panic!("no <{tag}> in tree"))
}

fn prop<'a>(tree: &'a DomTree, id: NodeId, name: &str) -> Option<&'a str> {
    tree.style(id)
        .and_then(|style| style.get(name))
        .map(String::as_str)
}

#[test]
fn test_end_to_end_class_rule() {
    let tree = styled(r#"<p class="title">Hi</p>"#, ".title{color:blue;}");
    let body = tree.find_child_element(NodeId::ROOT, "body").unwrap();
    let p = tree.children(body)[0];
    assert_eq!(tree.tag_name(p), Some("p"));
    assert_eq!(tree.as_element(p).unwrap().class(), Some(".title"));
    assert_eq!(prop(&tree, p, "color"), Some("blue"));
    assert_eq!(prop(&tree, p, "font-size"), Some("16px"));
}

#[test]
fn test_root_gets_defaults() {
    let tree = styled("", "");
    let style = tree.style(NodeId::ROOT).unwrap();
    assert_eq!(style.len(), 5);
    assert_eq!(style["font-size"], "16px");
    assert_eq!(style["font-style"], "normal");
    assert_eq!(style["font-weight"], "normal");
    assert_eq!(style["font-family"], "roman");
    assert_eq!(style["color"], "black");
}

#[test]
fn test_every_node_gets_a_style_map() {
    let tree = styled("<div><p>a<br>b</p></div>", "");
    for id in tree.iter_all() {
        assert!(tree.style(id).is_some(), "node {id:?} has no style");
    }
}

#[test]
fn test_inheritance_from_parent() {
    let tree = styled("<div><p><span>x</span></p></div>", "div{color:green;}");
    let span = find(&tree, "span");
    assert_eq!(prop(&tree, span, "color"), Some("green"));
    let body = tree.find_child_element(NodeId::ROOT, "body").unwrap();
    assert_eq!(prop(&tree, body, "color"), Some("black"));
}

#[test]
fn test_non_inherited_properties_stay_put() {
    let tree = styled("<div><p>x</p></div>", "div{background-color:gray;}");
    let div = find(&tree, "div");
    let p = find(&tree, "p");
    assert_eq!(prop(&tree, div, "background-color"), Some("gray"));
    assert_eq!(prop(&tree, p, "background-color"), None);
}

#[test]
fn test_text_nodes_only_inherit() {
    let tree = styled("<p>x</p>", "p{color:red;background-color:gray;}");
    let p = find(&tree, "p");
    let text = tree.children(p)[0];
    assert_eq!(tree.as_text(text), Some("x"));
    assert_eq!(prop(&tree, text, "color"), Some("red"));
    assert_eq!(prop(&tree, text, "background-color"), None);
}

#[test]
fn test_percentage_font_size() {
    let tree = styled("<div><p>x</p></div>", "div{font-size:20px;} p{font-size:50%;}");
    let p = find(&tree, "p");
    assert_eq!(prop(&tree, p, "font-size"), Some("10.0px"));
    let text = tree.children(p)[0];
    assert_eq!(prop(&tree, text, "font-size"), Some("10.0px"));
}

#[test]
fn test_nested_percentages_compound() {
    let tree = styled(
        "<div><section><p>x</p></section></div>",
        "div{font-size:50%;} section{font-size:50%;} p{font-size:150%;}",
    );
    assert_eq!(prop(&tree, find(&tree, "div"), "font-size"), Some("8.0px"));
    assert_eq!(prop(&tree, find(&tree, "section"), "font-size"), Some("4.0px"));
    assert_eq!(prop(&tree, find(&tree, "p"), "font-size"), Some("6.0px"));
}

#[test]
fn test_uncomputable_font_size_keeps_inherited() {
    let tree = styled(
        "<div><p>x</p></div>",
        "div{font-size:20px;} p{font-size:2em;}",
    );
    assert_eq!(prop(&tree, find(&tree, "p"), "font-size"), Some("20px"));
}

#[test]
fn test_uncomputable_value_keeps_lower_specificity_value() {
    let tree = styled(
        r#"<p class="x">y</p>"#,
        "p{font-size:12px;} .x{font-size:large;}",
    );
    assert_eq!(prop(&tree, find(&tree, "p"), "font-size"), Some("12px"));
}

#[test]
fn test_class_beats_tag_regardless_of_order() {
    let tree = styled(r#"<p class="x">y</p>"#, ".x{color:red;} p{color:blue;}");
    assert_eq!(prop(&tree, find(&tree, "p"), "color"), Some("red"));
}

#[test]
fn test_descendant_beats_class() {
    let tree = styled(
        r#"<div><p class="x">y</p></div>"#,
        "div .x{color:green;} .x{color:red;}",
    );
    assert_eq!(prop(&tree, find(&tree, "p"), "color"), Some("green"));
}

#[test]
fn test_equal_specificity_later_rule_wins() {
    let tree = styled(r#"<p class="x">y</p>"#, "p{color:red;} p{color:blue;}");
    assert_eq!(prop(&tree, find(&tree, "p"), "color"), Some("blue"));

    // body p and div p both score 2.
    let tree = styled(
        "<div><p>y</p></div>",
        "div p{color:red;} body p{color:blue;}",
    );
    assert_eq!(prop(&tree, find(&tree, "p"), "color"), Some("blue"));
}

#[test]
fn test_inline_style_wins() {
    let tree = styled(
        r#"<div><p class="x" style="color:green;font-weight:bold">y</p></div>"#,
        "div .x{color:red;}",
    );
    let p = find(&tree, "p");
    assert_eq!(prop(&tree, p, "color"), Some("green"));
    assert_eq!(prop(&tree, p, "font-weight"), Some("bold"));
}

#[test]
fn test_inline_font_size_percentage_uses_parent() {
    let tree = styled(
        r#"<div><p style="font-size:25%">y</p></div>"#,
        "div{font-size:40px;}",
    );
    assert_eq!(prop(&tree, find(&tree, "p"), "font-size"), Some("10.0px"));
}

#[test]
fn test_inline_uncomputable_value_is_ignored() {
    let tree = styled(r#"<p style="font-size:big">y</p>"#, "p{font-size:12px;}");
    assert_eq!(prop(&tree, find(&tree, "p"), "font-size"), Some("12px"));
}

#[test]
fn test_pre_forces_monospace() {
    let tree = styled(
        r#"<div><pre class="code">x</pre></div>"#,
        "div .code{font-family:helvetica;}",
    );
    let pre = find(&tree, "pre");
    assert_eq!(prop(&tree, pre, "font-family"), Some("Courier"));
    let text = tree.children(pre)[0];
    assert_eq!(prop(&tree, text, "font-family"), Some("Courier"));
}

#[test]
fn test_pre_override_beats_inline_style() {
    let tree = styled(r#"<pre style="font-family:serif">x</pre>"#, "");
    assert_eq!(prop(&tree, find(&tree, "pre"), "font-family"), Some("Courier"));
}

#[test]
fn test_restyle_replaces_maps() {
    let mut tree = parse_html(r#"<p class="a">x</p>"#);
    let rules = parse_stylesheet(".a{color:red;background-color:gray;} .b{color:blue;}");
    resolve(&mut tree, &rules);
    let p = find(&tree, "p");
    assert_eq!(prop(&tree, p, "color"), Some("red"));

    assert!(tree.set_attribute(p, "class", "b"));
    // Nothing changes until the cascade runs again.
    assert_eq!(prop(&tree, p, "color"), Some("red"));

    resolve(&mut tree, &rules);
    assert_eq!(prop(&tree, p, "color"), Some("blue"));
    assert_eq!(prop(&tree, p, "background-color"), None);
}

#[test]
fn test_user_agent_rules() {
    let mut tree = parse_html("<p><small>s</small><a>l</a><big>b</big><i>i</i></p>");
    let mut rules: Vec<Rule> = ua_stylesheet().to_vec();
    rules.extend(parse_stylesheet("a{color:red;}"));
    resolve(&mut tree, &rules);

    assert_eq!(prop(&tree, find(&tree, "small"), "font-size"), Some("14.4px"));
    assert_eq!(prop(&tree, find(&tree, "big"), "font-size"), Some("17.6px"));
    assert_eq!(prop(&tree, find(&tree, "i"), "font-style"), Some("italic"));
    // Same specificity as the built-in rule, later in source order.
    assert_eq!(prop(&tree, find(&tree, "a"), "color"), Some("red"));
}

#[test]
fn test_deep_nesting() {
    let depth = 20_000;
    let markup = "<div>".repeat(depth) + "x";
    let mut tree = parse_html(&markup);
    resolve(&mut tree, &parse_stylesheet("div div{color:red;}"));
    let text = tree.iter_all().find(|&id| tree.as_text(id).is_some()).unwrap();
    assert_eq!(prop(&tree, text, "color"), Some("red"));
}

#[test]
fn test_extract_style_content() {
    let tree = parse_html(
        "<style>p{color:red;}</style><title>t</title><style>a{color:blue;}</style><p>x</p>",
    );
    assert_eq!(
        extract_style_content(&tree),
        "p{color:red;}\na{color:blue;}\n"
    );
}
