use rs_readable::{simplify_html, simplify_html_with_options, Options};

#[test]
fn simplify_is_idempotent_on_real_markup() {
    let html = r#"<html><head><title>T</title><style>p{}</style></head><body>
        <div class="wrap">
            <!-- advert slot -->
            <h1>A <em>Heading</em></h1>
            loose text before
            <p>First line<br><br>Second line</p>
            <ul><li><p>only item</p></li></ul>
            <p>Before <q>quoted</q> after</p>
        </div>
    </body></html>"#;
    let once = simplify_html(html).expect("first pass");
    let twice = simplify_html(&once).expect("second pass");
    assert_eq!(once, twice);
}

#[test]
fn paragraph_repair_promotes_nested_blocks() {
    let html = "<p>Before <div>Inside</div> After</p>";
    let out = simplify_html(html).expect("simplify");
    assert!(out.contains("<p>Before</p>"));
    assert!(out.contains("<div><p>Inside</p></div>") || out.contains("<div>Inside</div>"));
    assert!(out.contains("<p>After</p>"));
    // A div never remains nested inside a paragraph.
    assert!(!out.contains("<p>Before <div>"));
}

#[test]
fn break_splitting_yields_two_paragraphs() {
    let out = simplify_html("<p>First<br><br>Second</p>").expect("simplify");
    assert!(out.contains("<p>First</p>"));
    assert!(out.contains("<p>Second</p>"));
    assert!(!out.contains("<br"));
}

#[test]
fn single_break_is_a_soft_wrap() {
    let out = simplify_html("<p>line one<br>line two</p>").expect("simplify");
    assert!(out.contains("<p>line one line two</p>"));
}

#[test]
fn single_container_break_is_a_soft_wrap_too() {
    let out = simplify_html("<div>line one<br>line two</div>").expect("simplify");
    assert!(out.contains("<p>line one line two</p>"));
}

#[test]
fn double_container_break_separates_paragraphs() {
    let out = simplify_html("<div>first<br><br>second</div>").expect("simplify");
    assert!(out.contains("<p>first</p>"));
    assert!(out.contains("<p>second</p>"));
    assert!(!out.contains("<br"));
}

#[test]
fn digest_of_hello_paragraph_is_stable() {
    let opts = Options {
        add_content_digests: true,
        ..Options::default()
    };
    let a = simplify_html_with_options("<p>Hello</p>", &opts).expect("simplify");
    let b = simplify_html_with_options("<p> Hello </p>", &opts).expect("simplify");
    // Normalization happens before digesting, so both spellings agree.
    let digest_of = |out: &str| {
        let marker = "<p data-content-digest=\"";
        let start = out.find(marker).expect("digest attr") + marker.len();
        out[start..start + 64].to_string()
    };
    assert_eq!(digest_of(&a), digest_of(&b));
    // SHA-256 of the exact string "Hello".
    assert_eq!(
        digest_of(&a),
        "185f8db32271fe25f561a6fc938b2e264306ec304eda518007d1764826381969"
    );
}

#[test]
fn node_indexes_form_dot_paths() {
    let opts = Options {
        add_node_indexes: true,
        ..Options::default()
    };
    let out = simplify_html_with_options("<div><p>a</p><p>b</p></div>", &opts).expect("simplify");
    assert!(out.contains("data-node-index=\"0.1\""));
    assert!(out.contains("data-node-index=\"0.1.1\""));
    assert!(out.contains("data-node-index=\"0.1.2\""));
}

#[test]
fn inline_markup_and_unknown_tags_flatten_to_text() {
    let html = "<div><p>Keep <b>bold</b> and <custom-el>custom</custom-el> text</p></div>";
    let out = simplify_html(html).expect("simplify");
    assert!(out.contains("<p>Keep bold and custom text</p>"));
}

#[test]
fn scripts_forms_and_navigation_are_removed() {
    let html = r#"<div>
        <script>alert(1)</script>
        <form><input name="q"></form>
        <nav><a href="/">Home</a></nav>
        <p>Article text.</p>
    </div>"#;
    let out = simplify_html(html).expect("simplify");
    assert!(out.contains("<p>Article text.</p>"));
    assert!(!out.contains("script"));
    assert!(!out.contains("form"));
    assert!(!out.contains("nav"));
}

#[test]
fn attributes_are_reduced_to_the_allow_list() {
    let html = r#"<p id="a" class="b" style="c" onclick="d">text</p>
                  <img src="pic.jpg" alt="pic" width="10">"#;
    let out = simplify_html(html).expect("simplify");
    assert!(out.contains("<p>text</p>"));
    assert!(out.contains(r#"src="pic.jpg""#));
    assert!(out.contains(r#"alt="pic""#));
    assert!(!out.contains("class="));
    assert!(!out.contains("onclick"));
    assert!(!out.contains("width"));
}

#[test]
fn smart_punctuation_is_folded_to_ascii() {
    let out = simplify_html("<p>\u{201c}Hi\u{201d}\u{a0}\u{2014}\u{a0}it\u{2019}s</p>")
        .expect("simplify");
    assert!(out.contains("<p>\"Hi\" - it's</p>"));
}

#[test]
fn disabled_unnesting_leaves_breaks_handling_intact() {
    let opts = Options {
        unnest_paragraphs: false,
        ..Options::default()
    };
    let out = simplify_html_with_options("<p>a<br><br>b</p>", &opts).expect("simplify");
    assert!(out.contains("<p>a</p>"));
    assert!(out.contains("<p>b</p>"));
}
