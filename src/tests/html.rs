use super::{decode_entities, HtmlFormat};
use crate::formats::Format;
use crate::locate::locate;
use crate::table::parse_table_text;

fn load(source: &str) -> crate::node::Page {
    HtmlFormat.load(source).unwrap()
}

#[test]
fn test_document_root_is_html_element() {
    let page = load("<!DOCTYPE html><html lang=\"en\"><body><p>Hi</p></body></html>");

    assert_eq!(page.tag(page.root()), Some("html"));
    assert_eq!(page.tag(page.body()), Some("body"));
    assert_eq!(page.inner_text(page.body()), "Hi");
}

#[test]
fn test_fragment_gets_synthetic_root() {
    let page = load("<h1>Title</h1><p>Body</p>");

    assert_eq!(page.tag(page.root()), Some("html"));
    assert_eq!(page.child_count(page.root()), 2);
    assert_eq!(page.inner_text(page.root()), "Title\nBody");
}

#[test]
fn test_attributes_are_read() {
    let page = load(r#"<div id="main" class=" listing  wide "><span>x</span></div>"#);
    let div = page.find_by_element_id("main").unwrap();

    assert_eq!(page.describe(div), "div#main.listing.wide");
    assert_eq!(page.element(div).unwrap().class, "listing wide");
}

#[test]
fn test_table_renders_tab_separated() {
    let page = load(
        "<table>
           <tr><th>Name</th> <th>Qty</th></tr>
           <tr><td>Pear</td> <td>3</td></tr>
         </table>",
    );
    let table = page.children(page.root())[0];

    assert_eq!(page.inner_text(table), "Name\tQty\nPear\t3");
}

#[test]
fn test_inline_spacing_is_kept() {
    let page = load("<p>Salt &amp; <b>pepper</b> mill</p>");

    assert_eq!(page.inner_text(page.root()), "Salt & pepper mill");
}

#[test]
fn test_hidden_markup_is_not_rendered() {
    let page = load(
        r#"<div>
             <p id="shown">Visible</p>
             <p id="gone" hidden>Hidden</p>
             <p id="styled" style="display: none">Styled</p>
             <input id="secret" type="hidden">
             <script>var x = 1;</script>
           </div>"#,
    );
    let div = page.children(page.root())[0];

    assert!(page.is_rendered(page.find_by_element_id("shown").unwrap()));
    assert!(!page.is_rendered(page.find_by_element_id("gone").unwrap()));
    assert!(!page.is_rendered(page.find_by_element_id("styled").unwrap()));
    assert!(!page.is_rendered(page.find_by_element_id("secret").unwrap()));
    assert_eq!(page.inner_text(div), "Visible");
}

#[test]
fn test_script_body_is_text_child() {
    let page = load("<script>let a = 1 < 2;</script>");
    let script = page.children(page.root())[0];

    assert_eq!(page.tag(script), Some("script"));
    assert_eq!(page.get(script).unwrap().children.len(), 1);
    assert_eq!(page.child_count(script), 0);
}

#[test]
fn test_locate_climbs_parsed_list() {
    let page = load(
        "<body><section><ul><li id=\"a\">One</li><li>Two</li><li>Three</li></ul></section></body>",
    );
    let first = page.find_by_element_id("a").unwrap();

    assert_eq!(page.tag(locate(&page, first)), Some("ul"));
}

#[test]
fn test_decode_entities() {
    assert_eq!(
        decode_entities("a &lt;b&gt; &#65;&#x42; &nbsp;z"),
        "a <b> AB  z"
    );
    assert_eq!(
        decode_entities("fish & chips &bogus;"),
        "fish & chips &bogus;"
    );
}

#[test]
fn test_preformatted_text_keeps_rows() {
    let page = load("<html><body><pre id=\"d\">a\tb\nc\td</pre></body></html>");
    let pre = page.find_by_element_id("d").unwrap();

    let text = page.inner_text(pre);
    assert_eq!(text, "a\tb\nc\td");

    let table = parse_table_text(&text);
    assert_eq!(table.len(), 2);
    assert!(table.rows[0].is_header());
    assert_eq!(table.rows[1].fields(), ["c", "d"]);
}

#[test]
fn test_preformatted_spacing_survives_around_children() {
    let page = load("<pre id=\"p\">\n  <b>x</b>\ty\n</pre><p id=\"q\">  spaced   out  </p>");

    assert_eq!(
        page.inner_text(page.find_by_element_id("p").unwrap()),
        "  x\ty"
    );
    assert_eq!(
        page.inner_text(page.find_by_element_id("q").unwrap()),
        "spaced out"
    );
}

#[test]
fn test_white_space_style_preserves_text() {
    let page = load(
        "<div id=\"kept\" style=\"white-space: pre-wrap\">1\t2\n3\t4</div>\
         <div id=\"collapsed\">1\t2\n3\t4</div>",
    );

    assert_eq!(
        page.inner_text(page.find_by_element_id("kept").unwrap()),
        "1\t2\n3\t4"
    );
    assert_eq!(
        page.inner_text(page.find_by_element_id("collapsed").unwrap()),
        "1 2 3 4"
    );
}
