use xmlindent::{
    break_lines, format_document, normalize, reflow, render, Config, LeveledBlock, Node,
    TagTable, Warning,
};

#[test]
fn balanced_wrap_beats_greedy() {
    assert_eq!(
        break_lines("alpha beta gamma delta", 11),
        ["alpha beta", "gamma delta"]
    );
}

#[test]
fn level_zero_block_renders_without_indent() {
    let lines = break_lines("Hello world", 80);
    assert_eq!(render(0, &lines, 2), ["Hello world"]);

    let out = format_document(&Node::new("p").with_text("Hello world"), &Config::default());
    assert_eq!(out.text, "<p>\n  Hello world\n</p>\n");
}

#[test]
fn inline_inside_block_adds_no_breaks() {
    let p = Node::new("p")
        .with_text("plain ")
        .with_child(Node::new("b").with_text("bold").with_tail(" plain"));
    let out = reflow(&p, 0, &TagTable::default());
    assert_eq!(
        out.blocks,
        [
            LeveledBlock {
                level: 0,
                paragraph: "<p>".into()
            },
            LeveledBlock {
                level: 1,
                paragraph: "plain <b>bold</b> plain".into()
            },
            LeveledBlock {
                level: 0,
                paragraph: "</p>".into()
            },
        ]
    );
}

#[test]
fn unknown_tag_warns_and_flows_inline() {
    let config = Config::default();
    let unknown = Node::new("p")
        .with_text("a ")
        .with_child(Node::new("mystery").with_text("b").with_tail(" c"));
    let inline = Node::new("p")
        .with_text("a ")
        .with_child(Node::new("b").with_text("b").with_tail(" c"));

    let out = format_document(&unknown, &config);
    assert_eq!(
        out.warnings,
        [Warning::UnclassifiedTag {
            tag: "mystery".into()
        }]
    );
    assert_eq!(
        out.text.replace("mystery", "b"),
        format_document(&inline, &config).text
    );
}

#[test]
fn normalize_is_stable() {
    for s in ["", "  ", " a\tb \n c ", "x", "a  b"] {
        let once = normalize(s);
        assert_eq!(once.as_deref().and_then(normalize), once);
    }
}

#[test]
fn documents_are_independent() {
    let config = Config::default();
    let first = Node::new("mystery").with_text("x");
    let second = Node::new("p").with_text("y");

    let a = format_document(&first, &config);
    let b = format_document(&second, &config);
    assert_eq!(a.warnings.len(), 2);
    assert!(b.warnings.is_empty());
    assert_eq!(b.text, "<p>\n  y\n</p>\n");
}
